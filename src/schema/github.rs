//! GitHub-style documentation dump: top-level `queries`, `mutations`,
//! `objects`, `interfaces`, `unions`, `enums`, `scalars`, `inputObjects`.
//!
//! Type names arrive as decorated strings (`"[Repository!]!"`), or as objects
//! carrying a `name`; both collapse to a string through [`TypeRef`].
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::type_ref::{TypeRef, strip_modifiers};
use crate::graph::{Arg, Edge, Graph, Kind, Node, Operation, Root};

pub const QUERY_ROOT: &str = "Query";
pub const MUTATION_ROOT: &str = "Mutation";

// ————————————————————————————————————————————————————————————————————————————
// WIRE TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubDoc {
    pub queries: Vec<QueryDef>,
    pub mutations: Vec<MutationDef>,
    pub objects: Vec<ObjectDef>,
    pub interfaces: Vec<ObjectDef>,
    pub unions: Vec<UnionDef>,
    pub enums: Vec<TypeRef>,
    pub scalars: Vec<TypeRef>,
    pub input_objects: Vec<InputObjectDef>,
}

#[derive(Debug, Deserialize)]
pub struct QueryDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, alias = "arguments")]
    pub args: Vec<ArgDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub default_value: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ObjectDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub implements: Vec<TypeRef>,
}

#[derive(Debug, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, alias = "args")]
    pub arguments: Vec<ArgDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionDef {
    pub name: String,
    #[serde(default)]
    pub possible_types: Vec<TypeRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputObjectDef {
    pub name: String,
    #[serde(default)]
    pub input_fields: Vec<ArgDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationDef {
    pub name: String,
    #[serde(default, rename = "type")]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub args: Vec<ArgDef>,
    #[serde(default)]
    pub input_fields: Vec<ArgDef>,
    #[serde(default)]
    pub return_fields: Vec<ReturnField>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub kind: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// DETECTION
// ————————————————————————————————————————————————————————————————————————————

/// Matches when any of `queries`, `objects` or `mutations` is a non-empty list.
pub fn detect(doc: &Value) -> bool {
    ["queries", "objects", "mutations"].iter().any(|key| {
        doc.get(key).and_then(Value::as_array).is_some_and(|xs| !xs.is_empty())
    })
}

// ————————————————————————————————————————————————————————————————————————————
// LOWERING
// ————————————————————————————————————————————————————————————————————————————

pub fn lower(doc: GithubDoc, include_mutations: bool) -> Graph {
    let mut graph = Graph::default();

    for scalar in &doc.scalars {
        graph.insert(Node::new(strip_modifiers(&scalar.decorated()), Kind::Scalar));
    }
    for en in &doc.enums {
        graph.insert(Node::new(strip_modifiers(&en.decorated()), Kind::Enum));
    }
    for iface in &doc.interfaces {
        let mut node = Node::new(iface.name.clone(), Kind::Interface);
        node.fields = iface.fields.iter().map(lower_field).collect();
        graph.insert(node);
    }
    for obj in &doc.objects {
        let mut node = Node::new(obj.name.clone(), Kind::Object);
        node.fields = obj.fields.iter().map(lower_field).collect();
        graph.insert(node);
    }
    for union in &doc.unions {
        let mut node = Node::new(union.name.clone(), Kind::Union);
        node.possible_types = union.possible_types.iter().map(|t| strip_modifiers(&t.decorated())).collect();
        graph.insert(node);
    }
    for input in &doc.input_objects {
        let mut node = Node::new(input.name.clone(), Kind::InputObject);
        node.fields = input
            .input_fields
            .iter()
            .map(|f| {
                let declared = f.ty.decorated();
                Edge { name: f.name.clone(), target: strip_modifiers(&declared), arguments: Vec::new() }
            })
            .collect();
        graph.insert(node);
    }

    invert_implements(&mut graph, &doc.objects);

    let mut query = Node::new(QUERY_ROOT, Kind::Object);
    query.fields = doc
        .queries
        .iter()
        .map(|q| {
            let declared = q.ty.decorated();
            Edge { name: q.name.clone(), target: strip_modifiers(&declared), arguments: q.args.iter().map(lower_arg).collect() }
        })
        .collect();
    graph.nodes.insert(QUERY_ROOT.to_string(), query);
    graph.roots.push(Root { type_name: QUERY_ROOT.to_string(), operation: Operation::Query });

    if include_mutations {
        let mut mutation = Node::new(MUTATION_ROOT, Kind::Object);
        mutation.fields = doc.mutations.iter().filter_map(|m| lower_mutation(m, &graph)).collect();
        graph.nodes.insert(MUTATION_ROOT.to_string(), mutation);
        graph.roots.push(Root { type_name: MUTATION_ROOT.to_string(), operation: Operation::Mutation });
    }

    graph
}

/// This encoding lists interfaces on the implementing object only; fill in
/// each interface's `possible_types` from those lists.
fn invert_implements(graph: &mut Graph, objects: &[ObjectDef]) {
    for obj in objects {
        for iface in &obj.implements {
            let iface = strip_modifiers(&iface.decorated());
            let Some(node) = graph.nodes.get_mut(&iface) else {
                debug!(object = %obj.name, interface = %iface, "implements unknown interface");
                continue;
            };
            if !node.possible_types.contains(&obj.name) {
                node.possible_types.push(obj.name.clone());
            }
        }
    }
}

fn lower_field(field: &FieldDef) -> Edge {
    let declared = field.ty.decorated();
    Edge {
        name: field.name.clone(),
        target: strip_modifiers(&declared),
        arguments: field.arguments.iter().map(lower_arg).collect(),
    }
}

fn lower_arg(arg: &ArgDef) -> Arg {
    let default_value = arg.default_value.as_ref().and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });
    Arg::new(arg.name.clone(), arg.ty.decorated()).with_default(default_value)
}

/// Mutations take either flat `args` or the fields of their implicit input
/// object. An argument named `input` stays a single composite argument.
fn lower_mutation(mutation: &MutationDef, graph: &Graph) -> Option<Edge> {
    let arguments = if mutation.args.is_empty() { &mutation.input_fields } else { &mutation.args };
    let Some(target) = mutation_return_type(mutation, |name| graph.is_value_type(name)) else {
        debug!(mutation = %mutation.name, "mutation has no return type, skipping");
        return None;
    };
    Some(Edge { name: mutation.name.clone(), target, arguments: arguments.iter().map(lower_arg).collect() })
}

/// Best-effort return type for a mutation, since this encoding lists payload
/// fields rather than one return type:
/// 1. the first return field whose type is not a scalar or enum,
/// 2. else the first return field,
/// 3. else the mutation's own declared type.
pub fn mutation_return_type(mutation: &MutationDef, is_value_type: impl Fn(&str) -> bool) -> Option<String> {
    let composite = mutation.return_fields.iter().find(|field| match field.kind.as_deref() {
        Some(kind) => !is_value_kind(kind),
        None => !is_value_type(&strip_modifiers(&field.ty.decorated())),
    });
    composite
        .or_else(|| mutation.return_fields.first())
        .map(|field| strip_modifiers(&field.ty.decorated()))
        .or_else(|| mutation.ty.as_ref().map(|ty| strip_modifiers(&ty.decorated())))
}

/// `kind` on a return field is either a `__TypeKind` (`SCALAR`) or a plural
/// dump category (`scalars`).
fn is_value_kind(kind: &str) -> bool {
    let kind = kind.to_ascii_uppercase();
    matches!(kind.strip_suffix('S').unwrap_or(kind.as_str()), "SCALAR" | "ENUM")
}
