//! Cycle-safe serialization of a resource graph to JSON-shaped text.
//!
//! Each call builds a fresh `SerializationContext` holding the
//! sink, the traversal stack and the seen-set. A resource is inlined at most
//! once per call; later encounters render as reference strings, which is
//! what makes cyclic graphs terminate.
//!
//! Relationship properties follow [`SerializeOptions`]:
//!
//! - pointers render as reference text (bare id inside the property's target
//!   namespace, `namespace.Type#id` outside it);
//! - a materialized resource is inlined when
//!   `permit_resources_for_relationships` is set, converted to reference
//!   text when `convert_resources_to_relationships` is set, and rejected
//!   otherwise.

mod composite;
mod context;
mod dispatch;
mod options;
mod relationship;

use tracing::debug;

use crate::error::SerializeError;
use crate::schema::SchemaRegistry;
use crate::sink::{JsonWriter, TextSink};
use crate::value::{Graph, NodeId};

use context::SerializationContext;

pub use composite::CLASS_PROPERTY;
pub use options::{SerializeOptions, DEFAULT_MAX_DEPTH};
pub use relationship::{reference_text, relationship_text};

/// Serialize the resource at `root` to compact JSON text.
pub fn serialize(
    graph: &Graph,
    root: NodeId,
    schema: &dyn SchemaRegistry,
    options: &SerializeOptions,
) -> Result<String, SerializeError> {
    let mut writer = JsonWriter::new();
    serialize_into(graph, root, schema, options, &mut writer)?;
    Ok(writer.into_string())
}

/// Serialize the resource at `root` into `sink`.
///
/// On error the sink may hold a partial document.
pub fn serialize_into<S: TextSink + ?Sized>(
    graph: &Graph,
    root: NodeId,
    schema: &dyn SchemaRegistry,
    options: &SerializeOptions,
    sink: &mut S,
) -> Result<(), SerializeError> {
    let span = tracing::debug_span!("serialize", root = root.0, nodes = graph.len());
    let _guard = span.enter();

    let mut ctx = SerializationContext::new(graph, schema, options, sink);
    composite::inline(&mut ctx, root, None)?;
    debug!(inlined = ctx.seen_count(), "serialized graph");
    Ok(())
}

/// A schema paired with options, for serializing many graphs the same way.
pub struct Serializer<'s> {
    schema: &'s dyn SchemaRegistry,
    options: SerializeOptions,
}

impl<'s> Serializer<'s> {
    pub fn new(schema: &'s dyn SchemaRegistry) -> Self {
        Serializer {
            schema,
            options: SerializeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SerializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    pub fn to_json(&self, graph: &Graph, root: NodeId) -> Result<String, SerializeError> {
        serialize(graph, root, self.schema, &self.options)
    }

    pub fn write_to<S: TextSink + ?Sized>(
        &self,
        graph: &Graph,
        root: NodeId,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        serialize_into(graph, root, self.schema, &self.options, sink)
    }
}
