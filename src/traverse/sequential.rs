//! Depth-first enumeration on the calling thread.
use super::{Expansion, Frontier, Search};
use crate::graph::{Graph, Path};

pub fn find_paths(graph: &Graph, target: &str, max_depth: usize) -> Vec<Path> {
    let search = Search::new(graph, target, max_depth);
    let mut out = Vec::new();
    for seed in search.seeds() {
        walk(&search, &seed, &mut out);
    }
    out
}

/// Exhaust `unit` depth-first, appending completed paths to `out`.
pub(crate) fn walk(search: &Search<'_>, unit: &Frontier, out: &mut Vec<Path>) {
    search.expand(unit, |expansion| match expansion {
        Expansion::Found(path) => out.push(path),
        Expansion::Descend(next) => walk(search, &next, out),
    });
}
