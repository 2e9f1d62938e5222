//! Standard introspection result: `data.__schema.{queryType, mutationType, types[]}`.
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::type_ref::TypeChain;
use crate::graph::{Arg, Edge, Graph, Kind, Node, Operation, Root};

// ————————————————————————————————————————————————————————————————————————————
// WIRE TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDoc {
    #[serde(default)]
    pub query_type: Option<NamedRef>,
    #[serde(default)]
    pub mutation_type: Option<NamedRef>,
    pub types: Vec<FullType>,
}

#[derive(Debug, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub fields: Option<Vec<FieldDef>>,
    #[serde(default)]
    pub possible_types: Option<Vec<TypeChain>>,
}

#[derive(Debug, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeChain,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeChain,
    #[serde(default)]
    pub default_value: Option<Value>,
}

// ————————————————————————————————————————————————————————————————————————————
// DETECTION
// ————————————————————————————————————————————————————————————————————————————

/// Locate the `__schema` object, accepting the bare form without `data`.
/// Matches only when a non-empty `types` list is present.
pub fn detect(doc: &Value) -> Option<&Value> {
    let schema = doc.pointer("/data/__schema").or_else(|| doc.get("__schema"))?;
    let types = schema.get("types")?.as_array()?;
    (!types.is_empty()).then_some(schema)
}

// ————————————————————————————————————————————————————————————————————————————
// LOWERING
// ————————————————————————————————————————————————————————————————————————————

pub fn lower(doc: SchemaDoc, include_mutations: bool) -> Graph {
    let mut graph = Graph::default();

    for ty in &doc.types {
        if ty.name.starts_with("__") {
            continue;
        }
        let Some(kind) = Kind::from_introspection(&ty.kind) else {
            debug!(name = %ty.name, kind = %ty.kind, "skipping type of unknown kind");
            continue;
        };
        let mut node = Node::new(ty.name.clone(), kind);
        node.fields = ty.fields.iter().flatten().filter_map(lower_field).collect();
        node.possible_types = ty
            .possible_types
            .iter()
            .flatten()
            .filter_map(|p| p.named().map(str::to_string))
            .collect();
        graph.insert(node);
    }

    let query = doc.query_type.map(|q| q.name).unwrap_or_else(|| "Query".to_string());
    graph.roots.push(Root { type_name: query, operation: Operation::Query });
    if include_mutations {
        if let Some(mutation) = doc.mutation_type {
            graph.roots.push(Root { type_name: mutation.name, operation: Operation::Mutation });
        }
    }
    graph
}

fn lower_field(field: &FieldDef) -> Option<Edge> {
    if field.name.starts_with("__") {
        return None;
    }
    let target = field.ty.named()?.to_string();
    let arguments = field.args.iter().map(lower_arg).collect();
    Some(Edge { name: field.name.clone(), target, arguments })
}

fn lower_arg(arg: &InputValue) -> Arg {
    // introspection serializes defaults as GraphQL literal text
    let default_value = arg.default_value.as_ref().and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });
    Arg::new(arg.name.clone(), arg.ty.decorated()).with_default(default_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lower_json(v: Value, include_mutations: bool) -> Graph {
        let schema = detect(&v).expect("introspection");
        let doc: SchemaDoc = serde_json::from_value(schema.clone()).unwrap();
        lower(doc, include_mutations)
    }

    #[test]
    fn detect_requires_non_empty_types() {
        assert!(detect(&json!({"data": {"__schema": {"types": []}}})).is_none());
        assert!(detect(&json!({"queries": []})).is_none());
        assert!(detect(&json!({"__schema": {"types": [{"kind": "SCALAR", "name": "ID"}]}})).is_some());
    }

    #[test]
    fn fields_unwrap_targets_and_args_keep_modifiers() {
        let g = lower_json(
            json!({"data": {"__schema": {
                "queryType": {"name": "Root"},
                "mutationType": {"name": "Mut"},
                "types": [
                    {"kind": "OBJECT", "name": "Root", "fields": [
                        {"name": "nodes", "args": [
                            {"name": "ids", "defaultValue": null, "type": {"kind": "NON_NULL", "name": null, "ofType":
                                {"kind": "LIST", "name": null, "ofType":
                                    {"kind": "NON_NULL", "name": null, "ofType": {"kind": "SCALAR", "name": "ID", "ofType": null}}}}},
                            {"name": "first", "defaultValue": "10", "type": {"kind": "SCALAR", "name": "Int", "ofType": null}}
                        ], "type": {"kind": "LIST", "name": null, "ofType": {"kind": "INTERFACE", "name": "Node", "ofType": null}}}
                    ]},
                    {"kind": "OBJECT", "name": "Mut", "fields": []},
                    {"kind": "INTERFACE", "name": "Node", "fields": [], "possibleTypes": [
                        {"kind": "OBJECT", "name": "User", "ofType": null}
                    ]},
                    {"kind": "OBJECT", "name": "__Schema", "fields": []}
                ]
            }}}),
            false,
        );
        let edge = &g.node("Root").unwrap().fields[0];
        assert_eq!(edge.target, "Node");
        assert_eq!(edge.arguments[0].declared_type, "[ID!]!");
        assert!(edge.arguments[0].required);
        assert_eq!(edge.arguments[1].default_value.as_deref(), Some("10"));
        assert!(!edge.arguments[1].required);
        assert_eq!(g.node("Node").unwrap().possible_types, vec!["User"]);
        assert!(!g.contains("__Schema"));
        assert_eq!(g.roots, vec![Root { type_name: "Root".into(), operation: Operation::Query }]);
    }

    #[test]
    fn mutation_root_only_when_requested() {
        let v = json!({"data": {"__schema": {
            "queryType": {"name": "Query"},
            "mutationType": {"name": "Mutation"},
            "types": [{"kind": "OBJECT", "name": "Query", "fields": []}]
        }}});
        assert_eq!(lower_json(v.clone(), false).roots.len(), 1);
        let roots = lower_json(v, true).roots;
        assert_eq!(roots[1], Root { type_name: "Mutation".into(), operation: Operation::Mutation });
    }
}
