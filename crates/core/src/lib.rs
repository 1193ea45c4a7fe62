//! graphtext-core: cycle-safe, schema-driven object graph serializer.
//!
//! Given a resource graph (records linked by identifier-based
//! relationships, possibly cyclic) and a registry of type declarations,
//! produces deterministic JSON-shaped text.
//!
//! # Public API
//!
//! - [`serialize()`] / [`serialize_into()`] -- run one serialize call
//! - [`Serializer`] -- schema + options bundle for repeated calls
//! - [`SerializeOptions`] -- relationship inlining policy
//! - [`ModelRegistry`] / [`SchemaRegistry`] -- type declarations
//! - [`Graph`], [`Resource`], [`Value`] -- the runtime value model
//! - [`TextSink`] / [`JsonWriter`] -- structural text emission
//! - [`SerializeError`], [`SchemaError`] -- error types

pub mod error;
pub mod schema;
pub mod serializer;
pub mod sink;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use error::{SchemaError, SerializeError};
pub use schema::{
    DeclarationKind, ModelRegistry, PropertyDeclaration, SchemaRegistry, TypeDeclaration,
};
pub use serializer::{serialize, serialize_into, SerializeOptions, Serializer};
pub use sink::{JsonWriter, TextSink};
pub use value::{Graph, Identifier, NodeId, Resource, Scalar, Value};
