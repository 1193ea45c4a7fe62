//! Type declarations and the registry the serializer resolves them from.
//!
//! The registry is consumed read-only: the serializer asks it for the
//! declaration of a resource's type and walks the declared properties in
//! order. [`ModelRegistry`] is the in-memory implementation used by the
//! interchange loader and the tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Primitive type names. Properties targeting one of these carry an
/// empty target namespace.
pub const PRIMITIVE_TYPES: &[&str] = &["String", "Integer", "Long", "Double", "Boolean", "DateTime"];

/// Returns true if `type_name` names a primitive type.
pub fn is_primitive_type(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&type_name)
}

/// The kind of a declared type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Asset,
    Participant,
    Transaction,
    Event,
    Concept,
    Enum,
}

impl DeclarationKind {
    /// Asset, participant, transaction and event declarations carry an identity.
    pub fn is_identified(self) -> bool {
        !matches!(self, DeclarationKind::Concept | DeclarationKind::Enum)
    }
}

/// A single declared property of a type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub name: String,
    pub is_array: bool,
    pub is_relationship: bool,
    /// Empty for primitive targets.
    pub target_namespace: String,
    pub target_type_name: String,
}

impl PropertyDeclaration {
    /// A singular primitive property (`String`, `Integer`, ...).
    pub fn primitive(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        PropertyDeclaration {
            name: name.into(),
            is_array: false,
            is_relationship: false,
            target_namespace: String::new(),
            target_type_name: type_name.into(),
        }
    }

    /// A singular property whose value is an instance of a declared type.
    pub fn field(
        name: impl Into<String>,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        PropertyDeclaration {
            name: name.into(),
            is_array: false,
            is_relationship: false,
            target_namespace: namespace.into(),
            target_type_name: type_name.into(),
        }
    }

    /// A singular relationship (`-->`) property.
    pub fn relationship(
        name: impl Into<String>,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        PropertyDeclaration {
            is_relationship: true,
            ..PropertyDeclaration::field(name, namespace, type_name)
        }
    }

    /// Mark the property as array-valued.
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn is_primitive(&self) -> bool {
        self.target_namespace.is_empty() && is_primitive_type(&self.target_type_name)
    }

    /// `namespace.TypeName` of the target, or the bare primitive name.
    pub fn target_fqn(&self) -> String {
        if self.target_namespace.is_empty() {
            self.target_type_name.clone()
        } else {
            format!("{}.{}", self.target_namespace, self.target_type_name)
        }
    }
}

/// A declared type: its namespace, name, kind and ordered properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub namespace: String,
    pub name: String,
    pub kind: DeclarationKind,
    /// Name of the identifying property for identified kinds.
    pub identified_by: Option<String>,
    pub properties: Vec<PropertyDeclaration>,
}

impl TypeDeclaration {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: DeclarationKind) -> Self {
        TypeDeclaration {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            identified_by: None,
            properties: Vec::new(),
        }
    }

    pub fn identified_by(mut self, property: impl Into<String>) -> Self {
        self.identified_by = Some(property.into());
        self
    }

    pub fn property(mut self, property: PropertyDeclaration) -> Self {
        self.properties.push(property);
        self
    }

    pub fn fully_qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDeclaration> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Read-only source of type declarations.
pub trait SchemaRegistry {
    /// Resolve a type by namespace and simple name.
    fn type_declaration(&self, namespace: &str, name: &str) -> Result<&TypeDeclaration, SchemaError>;
}

/// In-memory registry keyed by fully qualified type name.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    declarations: HashMap<String, TypeDeclaration>,
    /// Fully qualified names in registration order.
    order: Vec<String>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration. Registering the same fully qualified name
    /// twice is an error.
    pub fn add_type(&mut self, declaration: TypeDeclaration) -> Result<(), SchemaError> {
        let fqn = declaration.fully_qualified_name();
        if self.declarations.contains_key(&fqn) {
            return Err(SchemaError::DuplicateType { fqn });
        }
        self.order.push(fqn.clone());
        self.declarations.insert(fqn, declaration);
        Ok(())
    }

    /// Declarations in registration order.
    pub fn declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.order.iter().filter_map(|fqn| self.declarations.get(fqn))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl SchemaRegistry for ModelRegistry {
    fn type_declaration(&self, namespace: &str, name: &str) -> Result<&TypeDeclaration, SchemaError> {
        let fqn = format!("{}.{}", namespace, name);
        self.declarations
            .get(&fqn)
            .ok_or(SchemaError::UnknownType { fqn })
    }
}
