//! Example operations for a found [`Path`].
//!
//! Every argument met along the path becomes a declared variable, whether or
//! not the schema marks it required, so each document runs as-is with the
//! accompanying example values. Output is illustrative, not validated.
use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::graph::{Graph, Node, Path};

// ------------------------------- Policy ---------------------------------- //

const INDENT: &str = "  ";
const TYPENAME: &str = "__typename";
const MAX_LEAF_FIELDS: usize = 3;
const MAX_CONNECTION_NODE_FIELDS: usize = 2;
const CONNECTION_SUFFIX: &str = "Connection";

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuery {
    pub text: String,
    /// Variable name → declared type, in declaration order.
    pub variables: IndexMap<String, String>,
    /// Variable name → example value.
    pub example_values: IndexMap<String, Value>,
}

/// Placeholder for a declared type, by case-sensitive substring.
pub fn example_value(declared_type: &str) -> Value {
    if declared_type.contains("String") {
        json!("example_string")
    } else if declared_type.contains("Int") {
        json!(42)
    } else if declared_type.contains("Float") {
        json!(2.5)
    } else if declared_type.contains("ID") {
        json!("123")
    } else if declared_type.contains("Boolean") {
        json!(true)
    } else if declared_type.starts_with('[') {
        json!([])
    } else {
        Value::Null
    }
}

pub fn is_connection(type_name: &str) -> bool {
    type_name.ends_with(CONNECTION_SUFFIX)
}

pub fn generate(graph: &Graph, path: &Path) -> GeneratedQuery {
    let mut variables = IndexMap::<String, String>::new();
    let mut example_values = IndexMap::<String, Value>::new();

    // field head per step, arguments bound to their variables
    let heads: Vec<String> = path
        .segments
        .iter()
        .map(|step| {
            if step.arguments.is_empty() {
                return step.name.clone();
            }
            let bound = step
                .arguments
                .iter()
                .map(|arg| {
                    let var = unique_variable(&variables, format!("{}_{}", step.name, arg.name));
                    variables.insert(var.clone(), arg.declared_type.clone());
                    example_values.insert(var.clone(), example_value(&arg.declared_type));
                    format!("{}: ${var}", arg.name)
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({bound})", step.name)
        })
        .collect();

    let mut cg = Codegen::new();
    let keyword = path.operation.keyword();
    if variables.is_empty() {
        cg.open(keyword);
    } else {
        let defs = variables.iter().map(|(var, ty)| format!("${var}: {ty}")).collect::<Vec<_>>().join(", ");
        cg.open(&format!("{keyword}({defs})"));
    }

    let last = path.segments.len().saturating_sub(1);
    for (i, (step, head)) in path.segments.iter().zip(&heads).enumerate() {
        if i < last {
            cg.open(head);
            continue;
        }
        match composite(graph, &step.target) {
            Some(node) => {
                cg.open(head);
                cg.leaf_selection(graph, node);
                cg.close();
            }
            None => cg.line(head),
        }
    }
    for _ in 0..last {
        cg.close();
    }
    cg.close();

    GeneratedQuery { text: cg.into_string(), variables, example_values }
}

fn unique_variable(taken: &IndexMap<String, String>, base: String) -> String {
    if !taken.contains_key(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Nodes that need a selection set.
fn composite<'g>(graph: &'g Graph, type_name: &str) -> Option<&'g Node> {
    graph.node(type_name).filter(|node| !node.kind.is_value_type())
}

// ————————————————————————————————————————————————————————————————————————————
// WRITER
// ————————————————————————————————————————————————————————————————————————————

struct Codegen {
    out: String,
    depth: usize,
}

impl Codegen {
    fn new() -> Self {
        Codegen { out: String::new(), depth: 0 }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn open(&mut self, head: &str) {
        self.line(&format!("{head} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn into_string(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }

    /// `__typename` plus a few of the node's own fields; direct
    /// self-references are skipped.
    fn leaf_selection(&mut self, graph: &Graph, node: &Node) {
        self.line(TYPENAME);
        let picked = node.fields.iter().filter(|f| f.target != node.name && f.name != TYPENAME);
        for field in picked.take(MAX_LEAF_FIELDS) {
            if is_connection(&field.target) {
                self.open(&field.name);
                self.line(TYPENAME);
                self.connection_nodes(graph, &field.target);
                self.close();
            } else {
                self.field(graph, &field.name, &field.target);
            }
        }
    }

    /// `edges { node { ... } }` when the connection exposes both.
    fn connection_nodes(&mut self, graph: &Graph, connection: &str) {
        let node_type = graph
            .node(connection)
            .and_then(|conn| conn.field("edges"))
            .and_then(|edges| graph.node(&edges.target))
            .and_then(|edge| edge.field("node"))
            .and_then(|node| composite(graph, &node.target));
        let Some(node_type) = node_type else {
            return;
        };
        self.open("edges");
        self.open("node");
        self.line(TYPENAME);
        let picked = node_type
            .fields
            .iter()
            .filter(|f| f.arguments.is_empty() && f.name != TYPENAME && f.target != node_type.name);
        for field in picked.take(MAX_CONNECTION_NODE_FIELDS) {
            self.field(graph, &field.name, &field.target);
        }
        self.close();
        self.close();
    }

    fn field(&mut self, graph: &Graph, name: &str, target: &str) {
        if composite(graph, target).is_some() {
            self.line(&format!("{name} {{ {TYPENAME} }}"));
        } else {
            self.line(name);
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
