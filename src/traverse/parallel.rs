//! Worker-pool enumeration.
//!
//! A fixed rayon pool drains frontier units seeded one per root. Units at or
//! above [`FANOUT_DEPTH`] spawn their descendants as new pool tasks; deeper
//! units are exhausted in-process by the worker that owns them, which keeps
//! the number of queued tasks bounded. The in-process walk is the same
//! exhaustive DFS as the sequential enumerator, so both return the same set
//! of paths for every `max_depth`; only the emission order differs.
use std::sync::Mutex;

use rayon::Scope;
use tracing::{debug, warn};

use super::{Expansion, Frontier, Search, sequential};
use crate::graph::{Graph, Path};

pub const DEFAULT_WORKERS: usize = 4;

/// Units with fewer steps than this fan out through the pool.
pub const FANOUT_DEPTH: usize = 5;

/// Results are unordered; sort them when determinism matters.
pub fn find_paths(graph: &Graph, target: &str, max_depth: usize, workers: usize) -> Vec<Path> {
    let workers = if workers == 0 { DEFAULT_WORKERS } else { workers };
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(error) => {
            warn!(%error, "failed to build worker pool, falling back to sequential search");
            return sequential::find_paths(graph, target, max_depth);
        }
    };
    debug!(workers, "starting parallel enumeration");

    let search = Search::new(graph, target, max_depth);
    let results = Mutex::new(Vec::new());
    pool.scope(|scope| {
        for seed in search.seeds() {
            let (search, results) = (&search, &results);
            scope.spawn(move |scope| process(scope, search, seed, results));
        }
    });
    // `scope` re-raises worker panics, so a poisoned lock never reaches this point
    results.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn process<'s>(scope: &Scope<'s>, search: &'s Search<'s>, unit: Frontier, results: &'s Mutex<Vec<Path>>) {
    let mut local = Vec::new();
    search.expand(&unit, |expansion| match expansion {
        Expansion::Found(path) => local.push(path),
        Expansion::Descend(next) if next.depth() < FANOUT_DEPTH => {
            scope.spawn(move |scope| process(scope, search, next, results));
        }
        Expansion::Descend(next) => sequential::walk(search, &next, &mut local),
    });
    if !local.is_empty() {
        let mut guard = results.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.extend(local);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, Kind, Operation, Root};
    use crate::traverse::tests::{edge, object, social_graph};

    fn sorted(mut paths: Vec<Path>) -> Vec<Path> {
        paths.sort();
        paths
    }

    /// A chain of `len` types, each with two fields to the next one, ending
    /// in `Target`, so every level doubles the number of routes.
    fn ladder(len: usize) -> Graph {
        let mut g = Graph::default();
        g.insert(object("Query", vec![edge("start", "T0")]));
        for i in 0..len {
            let next = if i + 1 == len { "Target".to_string() } else { format!("T{}", i + 1) };
            g.insert(object(&format!("T{i}"), vec![edge("left", &next), edge("right", &next)]));
        }
        g.insert(Node::new("Target", Kind::Object));
        g.roots.push(Root { type_name: "Query".into(), operation: Operation::Query });
        g
    }

    #[test]
    fn matches_sequential_on_shallow_graphs() {
        let g = social_graph();
        for max_depth in 0..FANOUT_DEPTH {
            let seq = sorted(sequential::find_paths(&g, "Secret", max_depth));
            let par = sorted(find_paths(&g, "Secret", max_depth, 3));
            assert_eq!(seq, par, "max_depth = {max_depth}");
        }
    }

    #[test]
    fn matches_sequential_past_the_fanout_depth() {
        let g = ladder(FANOUT_DEPTH + 3);
        let seq = sorted(sequential::find_paths(&g, "Target", 20));
        let par = sorted(find_paths(&g, "Target", 20, 8));
        assert_eq!(seq.len(), 1 << (FANOUT_DEPTH + 3));
        assert_eq!(seq, par);
    }

    #[test]
    fn zero_workers_uses_default_pool() {
        let g = social_graph();
        let seq = sorted(sequential::find_paths(&g, "User", 3));
        let par = sorted(find_paths(&g, "User", 3, 0));
        assert!(!par.is_empty());
        assert_eq!(seq, par);
    }

    #[test]
    fn no_route_returns_empty() {
        let g = ladder(3);
        assert!(find_paths(&g, "Target", 3, 2).is_empty());
        assert_eq!(find_paths(&g, "Target", 4, 2).len(), 8);
    }
}
