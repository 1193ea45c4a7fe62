//! Typed structs for model documents.
//!
//! Graph documents have open-ended field sets and are walked as
//! `serde_json::Value` instead; see [`crate::deserialize`].

use graphtext_core::DeclarationKind;
use serde::{Deserialize, Serialize};

/// Member carrying a resource's fully qualified type.
pub const CLASS_KEY: &str = "$class";
/// Member carrying a resource's identifier.
pub const IDENTIFIER_KEY: &str = "$identifier";
/// Object form of a reference-only pointer: `{"$relationship": "ns.Type#id"}`.
pub const RELATIONSHIP_KEY: &str = "$relationship";
/// Object form of a link to another listed resource: `{"$resource": "ns.Type#id"}`.
pub const RESOURCE_KEY: &str = "$resource";

/// Top-level model document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelDocument {
    pub namespaces: Vec<NamespaceDocument>,
}

/// One namespace and its declarations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceDocument {
    pub namespace: String,
    #[serde(default)]
    pub declarations: Vec<DeclarationDocument>,
}

/// A type declaration as written in a model document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeclarationDocument {
    pub name: String,
    pub kind: DeclarationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identified_by: Option<String>,
    /// Enum symbols. Informational; serialization does not check them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDocument>,
}

/// A property as written in a model document.
///
/// `type` is a primitive name, a simple name resolved in the declaring
/// namespace, or a fully qualified `namespace.Type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub relationship: bool,
}
