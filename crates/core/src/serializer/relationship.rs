//! Relationship properties: reference text and the array separator rule.

use tracing::trace;

use crate::error::SerializeError;
use crate::schema::PropertyDeclaration;
use crate::sink::TextSink;
use crate::value::{Graph, Identifier, Value};

use super::composite;
use super::context::SerializationContext;
use super::options::SerializeOptions;

/// Reference text for an identity seen through `property`: the bare id when
/// the identity lives in the property's target namespace, otherwise
/// `namespace.TypeName#id`. Without a declaring property the text is always
/// fully qualified.
pub fn reference_text(property: Option<&PropertyDeclaration>, identifier: &Identifier) -> String {
    match property {
        Some(p) if p.target_namespace == identifier.namespace => identifier.id.clone(),
        _ => identifier.fully_qualified(),
    }
}

/// Resolve a relationship property value to its reference text.
///
/// Pointers always resolve. A materialized resource resolves only when
/// `convert_resources_to_relationships` is set; otherwise it is a
/// [`SerializeError::RelationshipType`]. Any other shape is unrecognised.
pub fn relationship_text(
    property: &PropertyDeclaration,
    value: &Value,
    graph: &Graph,
    options: &SerializeOptions,
) -> Result<String, SerializeError> {
    match value {
        Value::Relationship(identifier) => Ok(reference_text(Some(property), identifier)),
        Value::Resource(node) => {
            let resource = graph
                .resource(*node)
                .ok_or_else(|| SerializeError::UnrecognisedValue {
                    property: property.name.clone(),
                    found: value.describe(graph),
                })?;
            if !options.convert_resources_to_relationships {
                return Err(SerializeError::RelationshipType {
                    property: property.name.clone(),
                    found: resource.identifier.fully_qualified(),
                });
            }
            Ok(reference_text(Some(property), &resource.identifier))
        }
        Value::Scalar(_) | Value::Array(_) => Err(SerializeError::UnrecognisedValue {
            property: property.name.clone(),
            found: value.describe(graph),
        }),
    }
}

/// What an element of a relationship array will render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emitted {
    Reference,
    Inlined,
    BackReference,
}

fn classify<S: TextSink + ?Sized>(ctx: &SerializationContext<'_, S>, item: &Value) -> Emitted {
    match item {
        Value::Resource(node) if ctx.options.permit_resources_for_relationships => {
            match ctx.graph.resource(*node) {
                Some(r) if ctx.is_seen(&r.identifier.fully_qualified()) => Emitted::BackReference,
                _ => Emitted::Inlined,
            }
        }
        _ => Emitted::Reference,
    }
}

/// Write the value of a relationship property, singular or array.
pub(crate) fn visit_relationship_property<S: TextSink + ?Sized>(
    ctx: &mut SerializationContext<'_, S>,
    value: &Value,
    property: &PropertyDeclaration,
) -> Result<(), SerializeError> {
    match value {
        Value::Array(items) if property.is_array => {
            ctx.sink.open_array();
            let mut previous: Option<Emitted> = None;
            for item in items {
                let emitted = classify(ctx, item);
                if let Some(prev) = previous {
                    let omit = ctx.options.legacy_cycle_separators
                        && emitted == Emitted::BackReference
                        && matches!(prev, Emitted::BackReference | Emitted::Inlined);
                    if omit {
                        trace!(property = %property.name, "omitting legacy separator");
                    } else {
                        ctx.sink.separator();
                    }
                }
                visit_element(ctx, item, property)?;
                previous = Some(emitted);
            }
            ctx.sink.close_array();
            Ok(())
        }
        Value::Array(_) => Err(ctx.unrecognised(property, value)),
        _ if property.is_array => Err(ctx.unrecognised(property, value)),
        single => visit_element(ctx, single, property),
    }
}

fn visit_element<S: TextSink + ?Sized>(
    ctx: &mut SerializationContext<'_, S>,
    item: &Value,
    property: &PropertyDeclaration,
) -> Result<(), SerializeError> {
    match item {
        Value::Resource(node) if ctx.options.permit_resources_for_relationships => {
            composite::inline(ctx, *node, Some(property))
        }
        Value::Relationship(_) | Value::Resource(_) => {
            let text = relationship_text(property, item, ctx.graph, ctx.options).map_err(|e| {
                match e {
                    SerializeError::RelationshipType { found, .. } => {
                        SerializeError::RelationshipType {
                            property: ctx.qualify(&property.name),
                            found,
                        }
                    }
                    SerializeError::UnrecognisedValue { found, .. } => {
                        SerializeError::UnrecognisedValue {
                            property: ctx.qualify(&property.name),
                            found,
                        }
                    }
                    other => other,
                }
            })?;
            ctx.sink.string(&text);
            Ok(())
        }
        Value::Scalar(_) | Value::Array(_) => Err(ctx.unrecognised(property, item)),
    }
}
