/// Errors raised by a [`SchemaRegistry`](crate::schema::SchemaRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No declaration is registered under the fully qualified name.
    #[error("unknown type: {fqn}")]
    UnknownType { fqn: String },

    /// A declaration with the same fully qualified name already exists.
    #[error("duplicate type declaration: {fqn}")]
    DuplicateType { fqn: String },
}

/// All errors that can abort a serialize call.
///
/// Every variant is fatal: the call stops at the first error and any text
/// already written to the sink must be discarded by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    /// The value does not match any shape the declared property accepts.
    #[error("unrecognised value for property '{property}': {found}")]
    UnrecognisedValue { property: String, found: String },

    /// A materialized resource appeared under a relationship property and
    /// the options do not permit converting or inlining it.
    #[error(
        "expected a relationship pointer for property '{property}', found a materialized resource {found}"
    )]
    RelationshipType { property: String, found: String },

    /// Propagated unchanged from the schema registry.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Object nesting exceeded `max_depth`.
    #[error("maximum nesting depth of {limit} exceeded at {path}")]
    DepthExceeded { limit: usize, path: String },
}
