//! Runtime values: the object graph handed to the serializer.
//!
//! Resources live in a [`Graph`] arena and refer to each other by
//! [`NodeId`], so a cyclic graph never forms an ownership cycle.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identity of a resource or the target of a relationship pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    pub namespace: String,
    pub type_name: String,
    pub id: String,
}

impl Identifier {
    pub fn new(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Identifier {
            namespace: namespace.into(),
            type_name: type_name.into(),
            id: id.into(),
        }
    }

    /// `namespace.TypeName`
    pub fn type_fqn(&self) -> String {
        format!("{}.{}", self.namespace, self.type_name)
    }

    /// `namespace.TypeName#id`
    pub fn fully_qualified(&self) -> String {
        format!("{}.{}#{}", self.namespace, self.type_name, self.id)
    }

    /// Parse `namespace.TypeName#id`. The namespace must be non-empty and
    /// the id may itself contain `#`.
    pub fn parse(s: &str) -> Option<Identifier> {
        let (fqn, id) = s.split_once('#')?;
        let (namespace, type_name) = fqn.rsplit_once('.')?;
        if namespace.is_empty() || type_name.is_empty() || id.is_empty() {
            return None;
        }
        Some(Identifier::new(namespace, type_name, id))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}#{}", self.namespace, self.type_name, self.id)
    }
}

/// Leaf values. `Enum` holds the symbol of an enumerated type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Enum(String),
}

/// Index of a resource in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// The closed set of value shapes the serializer dispatches over.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    /// Reference-only pointer; carries no field data.
    Relationship(Identifier),
    /// A materialized node in the same graph.
    Resource(NodeId),
    Array(Vec<Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::Scalar(Scalar::String(s.into()))
    }

    pub fn integer(n: i64) -> Value {
        Value::Scalar(Scalar::Integer(n))
    }

    pub fn double(n: f64) -> Value {
        Value::Scalar(Scalar::Double(n))
    }

    pub fn boolean(b: bool) -> Value {
        Value::Scalar(Scalar::Boolean(b))
    }

    pub fn symbol(s: impl Into<String>) -> Value {
        Value::Scalar(Scalar::Enum(s.into()))
    }

    pub fn relationship(namespace: &str, type_name: &str, id: &str) -> Value {
        Value::Relationship(Identifier::new(namespace, type_name, id))
    }

    /// Short description used in error messages.
    pub fn describe(&self, graph: &Graph) -> String {
        match self {
            Value::Scalar(Scalar::Null) => "null".to_string(),
            Value::Scalar(Scalar::Boolean(b)) => format!("boolean {}", b),
            Value::Scalar(Scalar::Integer(n)) => format!("integer {}", n),
            Value::Scalar(Scalar::Double(n)) => format!("double {}", n),
            Value::Scalar(Scalar::String(s)) => format!("string {:?}", s),
            Value::Scalar(Scalar::Enum(s)) => format!("enum symbol {}", s),
            Value::Relationship(ident) => format!("relationship {}", ident),
            Value::Resource(node) => match graph.resource(*node) {
                Some(resource) => format!("resource {}", resource.identifier),
                None => format!("dangling node #{}", node.0),
            },
            Value::Array(items) => format!("array of {} elements", items.len()),
        }
    }
}

/// A fully materialized node.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub identifier: Identifier,
    pub fields: BTreeMap<String, Value>,
}

impl Resource {
    pub fn new(identifier: Identifier) -> Self {
        Resource {
            identifier,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// Arena of resources, indexed by position and by fully qualified identifier.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Resource>,
    index: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource and return its node id. A later resource with the
    /// same identifier shadows the earlier one in [`Graph::lookup`].
    pub fn insert(&mut self, resource: Resource) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.index.insert(resource.identifier.fully_qualified(), node);
        self.nodes.push(resource);
        node
    }

    pub fn resource(&self, node: NodeId) -> Option<&Resource> {
        self.nodes.get(node.0)
    }

    pub fn resource_mut(&mut self, node: NodeId) -> Option<&mut Resource> {
        self.nodes.get_mut(node.0)
    }

    /// Set a field on an existing node. Returns false if the node does not exist.
    /// This is how cycles are closed after all nodes are inserted.
    pub fn set_field(&mut self, node: NodeId, name: impl Into<String>, value: Value) -> bool {
        match self.nodes.get_mut(node.0) {
            Some(resource) => {
                resource.fields.insert(name.into(), value);
                true
            }
            None => false,
        }
    }

    /// Find a node by `namespace.TypeName#id`.
    pub fn lookup(&self, fully_qualified: &str) -> Option<NodeId> {
        self.index.get(fully_qualified).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Resource)> {
        self.nodes.iter().enumerate().map(|(i, r)| (NodeId(i), r))
    }
}
