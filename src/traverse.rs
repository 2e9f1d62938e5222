//! Path enumeration over a [`Graph`].
//!
//! Both enumerators share [`Search::expand`], which applies the per-field
//! rules to one frontier unit; they differ only in who processes the
//! descendants it emits.
pub mod parallel;
pub mod sequential;

use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::graph::{Graph, Operation, Path, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    /// `0` picks [`parallel::DEFAULT_WORKERS`].
    Parallel { workers: usize },
}

impl Strategy {
    pub fn from_workers(workers: usize) -> Self {
        if workers == 0 { Strategy::Sequential } else { Strategy::Parallel { workers } }
    }
}

/// Enumerate every path to `target` of at most `max_depth` steps.
///
/// Sequential results come back in root order then field declaration order.
/// Parallel results are unordered.
pub fn find_paths(graph: &Graph, target: &str, max_depth: usize, strategy: Strategy) -> Vec<Path> {
    let paths = match strategy {
        Strategy::Sequential => sequential::find_paths(graph, target, max_depth),
        Strategy::Parallel { workers } => parallel::find_paths(graph, target, max_depth, workers),
    };
    info!(target_type = target, max_depth, ?strategy, found = paths.len(), "enumeration finished");
    paths
}

/// Fail with suggestions when `target` names no type in the graph.
pub fn ensure_target(graph: &Graph, target: &str) -> Result<()> {
    if graph.contains(target) {
        return Ok(());
    }
    Err(Error::TargetTypeNotFound { target: target.to_string(), suggestions: graph.similar_types(target) })
}

// ————————————————————————————————————————————————————————————————————————————
// SHARED RULES
// ————————————————————————————————————————————————————————————————————————————

/// One pending branch: where it stands, how it got there, and the types
/// already on it. Each unit owns its `visited` set; siblings never share one.
#[derive(Debug, Clone)]
pub struct Frontier {
    pub operation: Operation,
    pub type_name: String,
    pub segments: Vec<Step>,
    pub visited: HashSet<String>,
}

impl Frontier {
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn extend(&self, step: Step) -> Frontier {
        let mut visited = self.visited.clone();
        visited.insert(step.target.clone());
        let mut segments = self.segments.clone();
        let type_name = step.target.clone();
        segments.push(step);
        Frontier { operation: self.operation, type_name, segments, visited }
    }

    fn complete(&self, step: Step) -> Path {
        let mut segments = self.segments.clone();
        segments.push(step);
        Path::new(self.operation, segments)
    }
}

pub enum Expansion {
    Found(Path),
    Descend(Frontier),
}

pub struct Search<'g> {
    pub graph: &'g Graph,
    pub target: &'g str,
    pub max_depth: usize,
}

impl<'g> Search<'g> {
    pub fn new(graph: &'g Graph, target: &'g str, max_depth: usize) -> Self {
        Search { graph, target, max_depth }
    }

    /// One unit per root type, positioned on the root with no steps taken.
    pub fn seeds(&self) -> Vec<Frontier> {
        self.graph
            .roots
            .iter()
            .filter(|root| {
                let present = self.graph.contains(&root.type_name);
                if !present {
                    warn!(root = %root.type_name, "root type missing from schema");
                }
                present
            })
            .map(|root| Frontier {
                operation: root.operation,
                type_name: root.type_name.clone(),
                segments: Vec::new(),
                visited: HashSet::from([root.type_name.clone()]),
            })
            .collect()
    }

    /// Apply the recording rules to every field (then every possible type)
    /// of the unit's current node, in declaration order.
    pub fn expand(&self, unit: &Frontier, mut emit: impl FnMut(Expansion)) {
        if unit.depth() >= self.max_depth {
            return;
        }
        let Some(node) = self.graph.node(&unit.type_name) else {
            return;
        };
        let fields = node.fields.iter().map(Step::from_edge);
        let members = node.possible_types.iter().map(|member| Step::fragment(member));
        for step in fields.chain(members) {
            if unit.visited.contains(&step.target) {
                continue;
            }
            if step.target == self.target {
                emit(Expansion::Found(unit.complete(step)));
                continue;
            }
            if self.graph.is_value_type(&step.target) || !self.graph.contains(&step.target) {
                continue;
            }
            emit(Expansion::Descend(unit.extend(step)));
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::graph::{Arg, Edge, Kind, Node, Root};

    pub(crate) fn edge(name: &str, target: &str) -> Edge {
        Edge { name: name.into(), target: target.into(), arguments: Vec::new() }
    }

    pub(crate) fn object(name: &str, fields: Vec<Edge>) -> Node {
        let mut node = Node::new(name, Kind::Object);
        node.fields = fields;
        node
    }

    /// Query → user → User ⇄ Org, User → friends → User, search → SearchResult (User | Org)
    pub(crate) fn social_graph() -> Graph {
        let mut g = Graph::default();
        let mut user_field = edge("user", "User");
        user_field.arguments.push(Arg::new("id", "ID!"));
        g.insert(object("Query", vec![user_field, edge("org", "Org"), edge("search", "SearchResult"), edge("version", "String")]));
        g.insert(object("User", vec![edge("name", "String"), edge("friends", "User"), edge("org", "Org"), edge("secret", "Secret")]));
        g.insert(object("Org", vec![edge("members", "User"), edge("audit", "AuditLog"), edge("ghost", "Missing")]));
        g.insert(object("AuditLog", vec![edge("secret", "Secret"), edge("actor", "User")]));
        g.insert(object("Secret", vec![edge("value", "String")]));
        let mut union = Node::new("SearchResult", Kind::Union);
        union.possible_types = vec!["User".into(), "Org".into()];
        g.insert(union);
        g.insert(Node::new("String", Kind::Scalar));
        g.roots.push(Root { type_name: "Query".into(), operation: Operation::Query });
        g
    }

    #[test]
    fn ensure_target_suggests_similar_names() {
        let g = social_graph();
        assert!(ensure_target(&g, "Secret").is_ok());
        match ensure_target(&g, "secrets").unwrap_err() {
            Error::TargetTypeNotFound { suggestions, .. } => assert_eq!(suggestions, vec!["Secret"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn strategy_zero_workers_is_sequential() {
        assert_eq!(Strategy::from_workers(0), Strategy::Sequential);
        assert_eq!(Strategy::from_workers(3), Strategy::Parallel { workers: 3 });
    }

    #[test]
    fn expand_skips_value_types_dangling_and_cycles() {
        let g = social_graph();
        let search = Search::new(&g, "Secret", 5);
        let seed = search.seeds().remove(0);
        let mut descended = Vec::new();
        search.expand(&seed, |e| {
            if let Expansion::Descend(next) = e {
                descended.push(next.type_name);
            }
        });
        assert_eq!(descended, vec!["User", "Org", "SearchResult"]);

        let org = descended_unit(&search, &seed, "Org");
        let mut from_org = Vec::new();
        search.expand(&org, |e| match e {
            Expansion::Descend(next) => from_org.push(next.type_name),
            Expansion::Found(p) => from_org.push(p.plain()),
        });
        // `ghost` dangles; `members` → User is still fresh on this branch
        assert_eq!(from_org, vec!["User", "AuditLog"]);
    }

    fn descended_unit(search: &Search<'_>, from: &Frontier, type_name: &str) -> Frontier {
        let mut out = None;
        search.expand(from, |e| {
            if let Expansion::Descend(next) = e {
                if next.type_name == type_name && out.is_none() {
                    out = Some(next);
                }
            }
        });
        out.expect("unit")
    }
}
