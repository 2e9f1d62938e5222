//! Canonical schema graph. Every input encoding is lowered into these types,
//! and nothing downstream of `schema` ever sees the source JSON.
use indexmap::IndexMap;
use serde::Serialize;

/// Scalars every GraphQL server has, whether or not a dump lists them.
pub const BUILT_IN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
}

impl Kind {
    /// Parse an introspection `__TypeKind` name. Wrapper kinds have no node.
    pub fn from_introspection(kind: &str) -> Option<Self> {
        match kind {
            "OBJECT" => Some(Kind::Object),
            "INTERFACE" => Some(Kind::Interface),
            "UNION" => Some(Kind::Union),
            "ENUM" => Some(Kind::Enum),
            "SCALAR" => Some(Kind::Scalar),
            "INPUT_OBJECT" => Some(Kind::InputObject),
            _ => None,
        }
    }

    /// Leaf kinds terminate a branch: they never carry fields worth following.
    pub fn is_value_type(self) -> bool {
        matches!(self, Kind::Enum | Kind::Scalar)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Arg {
    pub name: String,
    /// Full type syntax including `[...]` and `!`, e.g. `[ID!]!`.
    pub declared_type: String,
    pub required: bool,
    pub default_value: Option<String>,
}

impl Arg {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        Arg {
            name: name.into(),
            required: declared_type.ends_with('!'),
            declared_type,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub name: String,
    /// Bare named type, modifiers stripped. May dangle.
    pub target: String,
    pub arguments: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub kind: Kind,
    /// Declaration order; enumeration order depends on it.
    pub fields: Vec<Edge>,
    pub possible_types: Vec<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Node { name: name.into(), kind, fields: Vec::new(), possible_types: Vec::new() }
    }

    pub fn field(&self, name: &str) -> Option<&Edge> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Query,
    Mutation,
}

impl Operation {
    pub fn keyword(self) -> &'static str {
        match self {
            Operation::Query => "query",
            Operation::Mutation => "mutation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub type_name: String,
    pub operation: Operation,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: IndexMap<String, Node>,
    pub roots: Vec<Root>,
}

impl Graph {
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Insert, keeping the first declaration when a name repeats.
    pub fn insert(&mut self, node: Node) {
        self.nodes.entry(node.name.clone()).or_insert(node);
    }

    /// True for scalars and enums, including built-in scalars the dump omitted.
    pub fn is_value_type(&self, name: &str) -> bool {
        match self.nodes.get(name) {
            Some(node) => node.kind.is_value_type(),
            None => BUILT_IN_SCALARS.contains(&name),
        }
    }

    /// Up to five type names resembling `name`, case-insensitive, sorted.
    pub fn similar_types(&self, name: &str) -> Vec<String> {
        const MAX_SUGGESTIONS: usize = 5;
        let needle = name.to_lowercase();
        let mut out: Vec<String> = self
            .nodes
            .keys()
            .filter(|candidate| {
                let hay = candidate.to_lowercase();
                hay.contains(&needle) || needle.contains(&hay)
            })
            .cloned()
            .collect();
        out.sort();
        out.truncate(MAX_SUGGESTIONS);
        out
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PATHS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Step {
    /// Field name, or `... on Member` for an interface/union expansion.
    pub name: String,
    pub target: String,
    pub arguments: Vec<Arg>,
}

impl Step {
    pub fn from_edge(edge: &Edge) -> Self {
        Step { name: edge.name.clone(), target: edge.target.clone(), arguments: edge.arguments.clone() }
    }

    pub fn fragment(member: &str) -> Self {
        Step { name: format!("{FRAGMENT_PREFIX}{member}"), target: member.to_string(), arguments: Vec::new() }
    }
}

const FRAGMENT_PREFIX: &str = "... on ";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    pub operation: Operation,
    pub segments: Vec<Step>,
    pub depth: usize,
}

impl Path {
    pub fn new(operation: Operation, segments: Vec<Step>) -> Self {
        let depth = segments.len();
        Path { operation, segments, depth }
    }

    pub fn entry_point(&self) -> Option<&str> {
        self.segments.first().map(|s| s.name.as_str())
    }

    pub fn segment_names(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.name.clone()).collect()
    }

    /// `a → b → c`
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(" → ")
    }

    /// `a(id: ID!) → b → c`
    pub fn annotated(&self) -> String {
        self.segments
            .iter()
            .map(|s| {
                if s.arguments.is_empty() {
                    s.name.clone()
                } else {
                    let args = s
                        .arguments
                        .iter()
                        .map(|a| format!("{}: {}", a.name, a.declared_type))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{}({args})", s.name)
                }
            })
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

// ------------------------------- Tests ------------------------------------ //
