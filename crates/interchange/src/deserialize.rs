//! Deserialization of model and graph documents.
//!
//! The main entry points are [`from_model_json`], which turns a model
//! document into a [`ModelRegistry`], and [`from_graph_json`], which turns a
//! graph document into a [`Graph`] arena plus its root.

use std::path::Path;

use graphtext_core::schema::is_primitive_type;
use graphtext_core::{
    Graph, Identifier, ModelRegistry, NodeId, PropertyDeclaration, Resource, Scalar, SchemaError,
    TypeDeclaration, Value,
};
use serde_json::Map;
use tracing::debug;

use crate::types::*;

/// Errors while reading model or graph documents.
#[derive(Debug, thiserror::Error)]
pub enum InterchangeError {
    /// The document is missing a required top-level field.
    #[error("document missing required field: '{field}'")]
    MissingField { field: String },

    /// A declaration in a model document is malformed.
    #[error("declaration '{declaration}': {message}")]
    InvalidDeclaration { declaration: String, message: String },

    /// A resource in a graph document is malformed.
    #[error("resource '{resource}': {message}")]
    InvalidResource { resource: String, message: String },

    /// A string that should be `namespace.Type#id` is not.
    #[error("malformed identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Two listed resources share a fully qualified identifier.
    #[error("duplicate resource: {0}")]
    DuplicateResource(String),

    /// A `$resource` link or the root names no listed resource.
    #[error("resource '{from}' links to unknown resource '{target}'")]
    DanglingReference { from: String, target: String },

    /// The document does not have the expected JSON shape.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("could not read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("could not parse '{path}': {message}")]
    Json { path: String, message: String },
}

// ── Model documents ─────────────────────────────────────────────────

/// Build a registry from a model document.
pub fn from_model_json(doc: &serde_json::Value) -> Result<ModelRegistry, InterchangeError> {
    if doc.get("namespaces").is_none() {
        return Err(InterchangeError::MissingField {
            field: "namespaces".to_string(),
        });
    }
    let model: ModelDocument = serde_json::from_value(doc.clone())
        .map_err(|e| InterchangeError::InvalidDocument(e.to_string()))?;

    let mut registry = ModelRegistry::new();
    for ns in &model.namespaces {
        for decl in &ns.declarations {
            registry.add_type(parse_declaration(&ns.namespace, decl)?)?;
        }
    }
    debug!(types = registry.len(), "loaded model");
    Ok(registry)
}

fn parse_declaration(
    namespace: &str,
    decl: &DeclarationDocument,
) -> Result<TypeDeclaration, InterchangeError> {
    let fqn = format!("{}.{}", namespace, decl.name);
    let invalid = |message: String| InterchangeError::InvalidDeclaration {
        declaration: fqn.clone(),
        message,
    };

    if let Some(id_prop) = &decl.identified_by {
        if !decl.kind.is_identified() {
            return Err(invalid(format!(
                "{:?} declarations cannot be identified by '{}'",
                decl.kind, id_prop
            )));
        }
        if !decl.properties.iter().any(|p| &p.name == id_prop) {
            return Err(invalid(format!(
                "identifying property '{}' is not declared",
                id_prop
            )));
        }
    }

    let mut declaration = TypeDeclaration::new(namespace, decl.name.clone(), decl.kind);
    declaration.identified_by = decl.identified_by.clone();

    for prop in &decl.properties {
        if declaration.get_property(&prop.name).is_some() {
            return Err(invalid(format!("duplicate property '{}'", prop.name)));
        }
        let (target_namespace, target_type_name) = resolve_type_ref(namespace, &prop.type_name);
        if prop.relationship && target_namespace.is_empty() {
            return Err(invalid(format!(
                "relationship '{}' cannot target primitive type {}",
                prop.name, target_type_name
            )));
        }
        declaration.properties.push(PropertyDeclaration {
            name: prop.name.clone(),
            is_array: prop.array,
            is_relationship: prop.relationship,
            target_namespace,
            target_type_name,
        });
    }
    Ok(declaration)
}

/// Split a property type reference into (namespace, simple name).
fn resolve_type_ref(declaring_namespace: &str, type_ref: &str) -> (String, String) {
    match type_ref.rsplit_once('.') {
        Some((ns, name)) => (ns.to_string(), name.to_string()),
        None if is_primitive_type(type_ref) => (String::new(), type_ref.to_string()),
        None => (declaring_namespace.to_string(), type_ref.to_string()),
    }
}

// ── Graph documents ─────────────────────────────────────────────────

/// A graph document after loading.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    /// The `root` member if present, otherwise the first listed resource.
    pub root: Option<NodeId>,
}

/// Build a graph from a graph document.
///
/// Listed resources are inserted first and their fields filled in a second
/// pass, so `$resource` links may point forwards, backwards or at the
/// resource itself.
pub fn from_graph_json(doc: &serde_json::Value) -> Result<LoadedGraph, InterchangeError> {
    let listed = doc
        .get("resources")
        .and_then(|r| r.as_array())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "resources".to_string(),
        })?;

    let mut graph = Graph::new();
    let mut pending: Vec<(NodeId, &Map<String, serde_json::Value>)> = Vec::with_capacity(listed.len());

    for entry in listed {
        let obj = entry.as_object().ok_or_else(|| {
            InterchangeError::InvalidDocument("resources must be JSON objects".to_string())
        })?;
        let identifier = parse_header(obj, None)?;
        let fqi = identifier.fully_qualified();
        if graph.lookup(&fqi).is_some() {
            return Err(InterchangeError::DuplicateResource(fqi));
        }
        let node = graph.insert(Resource::new(identifier));
        pending.push((node, obj));
    }

    for (node, obj) in pending {
        let owner = match graph.resource(node) {
            Some(r) => r.identifier.clone(),
            None => continue,
        };
        let fields = parse_fields(&mut graph, &owner, obj)?;
        if let Some(resource) = graph.resource_mut(node) {
            resource.fields = fields;
        }
    }

    let root = match doc.get("root") {
        Some(serde_json::Value::String(fqi)) => {
            Some(graph.lookup(fqi).ok_or_else(|| InterchangeError::DanglingReference {
                from: "root".to_string(),
                target: fqi.clone(),
            })?)
        }
        Some(serde_json::Value::Null) | None => {
            if graph.is_empty() {
                None
            } else {
                Some(NodeId(0))
            }
        }
        Some(other) => {
            return Err(InterchangeError::InvalidDocument(format!(
                "root must be a string, found {}",
                other
            )))
        }
    };

    debug!(resources = graph.len(), "loaded graph");
    Ok(LoadedGraph { graph, root })
}

/// Read `$class` and `$identifier`. Nested objects without an identifier
/// get `fallback_id`.
fn parse_header(
    obj: &Map<String, serde_json::Value>,
    fallback_id: Option<&str>,
) -> Result<Identifier, InterchangeError> {
    let class = obj
        .get(CLASS_KEY)
        .and_then(|v| v.as_str())
        .ok_or_else(|| InterchangeError::MissingField {
            field: CLASS_KEY.to_string(),
        })?;
    let (namespace, type_name) = class
        .rsplit_once('.')
        .filter(|(ns, name)| !ns.is_empty() && !name.is_empty())
        .ok_or_else(|| InterchangeError::InvalidIdentifier(class.to_string()))?;

    let id = match (obj.get(IDENTIFIER_KEY), fallback_id) {
        (Some(serde_json::Value::String(id)), _) => id.clone(),
        (Some(other), _) => {
            return Err(InterchangeError::InvalidResource {
                resource: class.to_string(),
                message: format!("{} must be a string, found {}", IDENTIFIER_KEY, other),
            })
        }
        (None, Some(fallback)) => fallback.to_string(),
        (None, None) => {
            return Err(InterchangeError::MissingField {
                field: IDENTIFIER_KEY.to_string(),
            })
        }
    };
    if id.is_empty() {
        return Err(InterchangeError::InvalidResource {
            resource: class.to_string(),
            message: format!("{} must not be empty", IDENTIFIER_KEY),
        });
    }
    Ok(Identifier::new(namespace, type_name, id))
}

fn parse_fields(
    graph: &mut Graph,
    owner: &Identifier,
    obj: &Map<String, serde_json::Value>,
) -> Result<std::collections::BTreeMap<String, Value>, InterchangeError> {
    let mut fields = std::collections::BTreeMap::new();
    for (key, raw) in obj {
        if key.starts_with('$') {
            continue;
        }
        // Owners may share a bare id across types.
        let path = format!("{}.{}", owner.fully_qualified(), key);
        fields.insert(key.clone(), parse_value(graph, owner, &path, raw)?);
    }
    Ok(fields)
}

/// Convert one field value. `path` seeds identifiers of nested resources
/// that do not carry their own.
fn parse_value(
    graph: &mut Graph,
    owner: &Identifier,
    path: &str,
    raw: &serde_json::Value,
) -> Result<Value, InterchangeError> {
    use serde_json::Value as Json;

    Ok(match raw {
        Json::Null => Value::Scalar(Scalar::Null),
        Json::Bool(b) => Value::Scalar(Scalar::Boolean(*b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Scalar(Scalar::Integer(i)),
            None => Value::Scalar(Scalar::Double(n.as_f64().unwrap_or(f64::NAN))),
        },
        Json::String(s) => Value::Scalar(Scalar::String(s.clone())),
        Json::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                values.push(parse_value(graph, owner, &format!("{}[{}]", path, i), item)?);
            }
            Value::Array(values)
        }
        Json::Object(obj) => {
            if let Some(target) = obj.get(RELATIONSHIP_KEY) {
                let text = target.as_str().unwrap_or_default();
                let identifier = Identifier::parse(text)
                    .ok_or_else(|| InterchangeError::InvalidIdentifier(target.to_string()))?;
                Value::Relationship(identifier)
            } else if let Some(target) = obj.get(RESOURCE_KEY) {
                let text = target.as_str().unwrap_or_default();
                Identifier::parse(text)
                    .ok_or_else(|| InterchangeError::InvalidIdentifier(target.to_string()))?;
                let node = graph
                    .lookup(text)
                    .ok_or_else(|| InterchangeError::DanglingReference {
                        from: owner.fully_qualified(),
                        target: text.to_string(),
                    })?;
                Value::Resource(node)
            } else if obj.contains_key(CLASS_KEY) {
                let identifier = parse_header(obj, Some(path))?;
                let fqi = identifier.fully_qualified();
                if graph.lookup(&fqi).is_some() {
                    return Err(InterchangeError::DuplicateResource(fqi));
                }
                let fields = parse_fields(graph, &identifier, obj)?;
                let node = graph.insert(Resource {
                    identifier,
                    fields,
                });
                Value::Resource(node)
            } else {
                return Err(InterchangeError::InvalidResource {
                    resource: owner.fully_qualified(),
                    message: format!(
                        "object value at '{}' needs {}, {} or {}",
                        path, CLASS_KEY, RELATIONSHIP_KEY, RESOURCE_KEY
                    ),
                });
            }
        }
    })
}

// ── Files ───────────────────────────────────────────────────────────

fn read_json(path: &Path) -> Result<serde_json::Value, InterchangeError> {
    let content = std::fs::read_to_string(path).map_err(|e| InterchangeError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| InterchangeError::Json {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Read and parse a model document from `path`.
pub fn load_model(path: &Path) -> Result<ModelRegistry, InterchangeError> {
    from_model_json(&read_json(path)?)
}

/// Read and parse a graph document from `path`.
pub fn load_graph(path: &Path) -> Result<LoadedGraph, InterchangeError> {
    from_graph_json(&read_json(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphtext_core::{DeclarationKind, SchemaRegistry};
    use serde_json::json;

    fn make_model(declarations: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "namespaces": [
                { "namespace": "org.acme", "declarations": declarations }
            ]
        })
    }

    #[test]
    fn test_parse_model() {
        let model = make_model(vec![json!({
            "name": "MyAsset1",
            "kind": "asset",
            "identified_by": "assetId",
            "properties": [
                {"name": "assetId", "type": "String"},
                {"name": "next", "type": "MyAsset1", "relationship": true},
                {"name": "owners", "type": "org.people.Person", "relationship": true, "array": true}
            ]
        })]);

        let registry = from_model_json(&model).unwrap();
        let decl = registry.type_declaration("org.acme", "MyAsset1").unwrap();
        assert_eq!(decl.kind, DeclarationKind::Asset);
        assert_eq!(decl.identified_by.as_deref(), Some("assetId"));

        let asset_id = &decl.properties[0];
        assert!(asset_id.is_primitive());

        let next = &decl.properties[1];
        assert!(next.is_relationship);
        assert!(!next.is_array);
        assert_eq!(next.target_namespace, "org.acme");
        assert_eq!(next.target_type_name, "MyAsset1");

        let owners = &decl.properties[2];
        assert!(owners.is_array);
        assert_eq!(owners.target_namespace, "org.people");
        assert_eq!(owners.target_type_name, "Person");
    }

    #[test]
    fn test_missing_namespaces() {
        match from_model_json(&json!({})).unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "namespaces"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_invalid_document() {
        let model = make_model(vec![json!({"name": "X", "kind": "widget"})]);
        assert!(matches!(
            from_model_json(&model),
            Err(InterchangeError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_relationship_to_primitive_rejected() {
        let model = make_model(vec![json!({
            "name": "Bad",
            "kind": "concept",
            "properties": [{"name": "p", "type": "String", "relationship": true}]
        })]);
        match from_model_json(&model).unwrap_err() {
            InterchangeError::InvalidDeclaration { declaration, .. } => {
                assert_eq!(declaration, "org.acme.Bad")
            }
            other => panic!("expected InvalidDeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_identifying_property_must_exist() {
        let model = make_model(vec![json!({
            "name": "Thing",
            "kind": "asset",
            "identified_by": "thingId",
            "properties": []
        })]);
        assert!(matches!(
            from_model_json(&model),
            Err(InterchangeError::InvalidDeclaration { .. })
        ));
    }

    #[test]
    fn test_duplicate_declaration_is_schema_error() {
        let model = make_model(vec![
            json!({"name": "Colour", "kind": "enum", "values": ["RED"]}),
            json!({"name": "Colour", "kind": "enum"}),
        ]);
        assert!(matches!(
            from_model_json(&model),
            Err(InterchangeError::Schema(SchemaError::DuplicateType { .. }))
        ));
    }

    #[test]
    fn test_parse_cyclic_graph() {
        let doc = json!({
            "root": "org.acme.MyAsset1#DOGE_1",
            "resources": [
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1", "assetId": "DOGE_1",
                 "next": {"$resource": "org.acme.MyAsset1#DOGE_2"}},
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_2", "assetId": "DOGE_2",
                 "next": {"$resource": "org.acme.MyAsset1#DOGE_1"}}
            ]
        });
        let loaded = from_graph_json(&doc).unwrap();
        assert_eq!(loaded.graph.len(), 2);
        let root = loaded.root.unwrap();
        let a = loaded.graph.resource(root).unwrap();
        assert_eq!(a.identifier.id, "DOGE_1");
        assert_eq!(a.fields["next"], Value::Resource(NodeId(1)));
        let b = loaded.graph.resource(NodeId(1)).unwrap();
        assert_eq!(b.fields["next"], Value::Resource(NodeId(0)));
    }

    #[test]
    fn test_parse_scalars_pointers_and_nested() {
        let doc = json!({
            "resources": [{
                "$class": "org.acme.Trader", "$identifier": "T1",
                "name": "Alice", "age": 42, "score": 1.5, "active": true, "nick": null,
                "friend": {"$relationship": "org.people.Person#P1"},
                "tags": ["a", "b"],
                "address": {"$class": "org.acme.Address", "city": "Winchester"}
            }]
        });
        let loaded = from_graph_json(&doc).unwrap();
        assert_eq!(loaded.root, Some(NodeId(0)));
        let trader = loaded.graph.resource(NodeId(0)).unwrap();
        assert_eq!(trader.fields["name"], Value::string("Alice"));
        assert_eq!(trader.fields["age"], Value::integer(42));
        assert_eq!(trader.fields["score"], Value::double(1.5));
        assert_eq!(trader.fields["active"], Value::boolean(true));
        assert_eq!(trader.fields["nick"], Value::Scalar(Scalar::Null));
        assert_eq!(
            trader.fields["friend"],
            Value::relationship("org.people", "Person", "P1")
        );
        assert_eq!(
            trader.fields["tags"],
            Value::Array(vec![Value::string("a"), Value::string("b")])
        );

        let address = match &trader.fields["address"] {
            Value::Resource(node) => loaded.graph.resource(*node).unwrap(),
            other => panic!("expected nested resource, got {:?}", other),
        };
        assert_eq!(
            address.identifier.fully_qualified(),
            "org.acme.Address#org.acme.Trader#T1.address"
        );
        assert_eq!(address.fields["city"], Value::string("Winchester"));
    }

    #[test]
    fn test_dangling_resource_link() {
        let doc = json!({
            "resources": [
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1",
                 "next": {"$resource": "org.acme.MyAsset1#DOGE_9"}}
            ]
        });
        match from_graph_json(&doc).unwrap_err() {
            InterchangeError::DanglingReference { from, target } => {
                assert_eq!(from, "org.acme.MyAsset1#DOGE_1");
                assert_eq!(target, "org.acme.MyAsset1#DOGE_9");
            }
            other => panic!("expected DanglingReference, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_root() {
        let doc = json!({"root": "org.acme.MyAsset1#NOPE", "resources": []});
        assert!(matches!(
            from_graph_json(&doc),
            Err(InterchangeError::DanglingReference { .. })
        ));
    }

    #[test]
    fn test_duplicate_resource() {
        let doc = json!({
            "resources": [
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1"},
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1"}
            ]
        });
        match from_graph_json(&doc).unwrap_err() {
            InterchangeError::DuplicateResource(fqi) => {
                assert_eq!(fqi, "org.acme.MyAsset1#DOGE_1")
            }
            other => panic!("expected DuplicateResource, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_resource_cannot_shadow_listed_one() {
        let doc = json!({
            "resources": [
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1"},
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_2",
                 "next": {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1"}}
            ]
        });
        match from_graph_json(&doc).unwrap_err() {
            InterchangeError::DuplicateResource(fqi) => {
                assert_eq!(fqi, "org.acme.MyAsset1#DOGE_1")
            }
            other => panic!("expected DuplicateResource, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_resources_of_same_id_owners_are_distinct() {
        let doc = json!({
            "resources": [
                {"$class": "org.acme.Buyer", "$identifier": "P1",
                 "address": {"$class": "org.acme.Address", "city": "Winchester"}},
                {"$class": "org.acme.Seller", "$identifier": "P1",
                 "address": {"$class": "org.acme.Address", "city": "Southampton"}}
            ]
        });
        let loaded = from_graph_json(&doc).unwrap();
        let address_of = |fqi: &str| {
            let owner = loaded.graph.lookup(fqi).unwrap();
            match &loaded.graph.resource(owner).unwrap().fields["address"] {
                Value::Resource(node) => loaded.graph.resource(*node).unwrap().identifier.clone(),
                other => panic!("expected nested resource, got {:?}", other),
            }
        };
        let buyer = address_of("org.acme.Buyer#P1");
        let seller = address_of("org.acme.Seller#P1");
        assert_ne!(buyer, seller);
        assert_eq!(seller.fully_qualified(), "org.acme.Address#org.acme.Seller#P1.address");
    }

    #[test]
    fn test_malformed_relationship() {
        let doc = json!({
            "resources": [
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1",
                 "next": {"$relationship": "DOGE_2"}}
            ]
        });
        assert!(matches!(
            from_graph_json(&doc),
            Err(InterchangeError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_listed_resource_needs_identifier() {
        let doc = json!({"resources": [{"$class": "org.acme.MyAsset1"}]});
        match from_graph_json(&doc).unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "$identifier"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_object_value_rejected() {
        let doc = json!({
            "resources": [
                {"$class": "org.acme.MyAsset1", "$identifier": "DOGE_1", "meta": {"k": 1}}
            ]
        });
        assert!(matches!(
            from_graph_json(&doc),
            Err(InterchangeError::InvalidResource { .. })
        ));
    }

    #[test]
    fn test_missing_resources() {
        match from_graph_json(&json!({"root": null})).unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "resources"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }
}
