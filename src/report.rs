//! Human-readable terminal listing.
use colored::Colorize;

use crate::graph::Path;

pub fn render_listing(paths: &[Path], target: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", format!("Target: {target}").cyan().bold()));
    out.push_str(&format!("{}\n\n", format!("Found {} paths:", paths.len()).green()));
    for (i, path) in paths.iter().enumerate() {
        out.push_str(&format!("  {} {}\n", format!("{}.", i + 1).white(), path.annotated()));
    }
    out
}

pub fn render_missing_target(target: &str, suggestions: &[String]) -> String {
    let mut out = format!("{}\n", format!("Error: Type '{target}' not found in schema").red());
    if !suggestions.is_empty() {
        out.push_str(&format!("\n{}\n", "Did you mean:".yellow()));
        for s in suggestions {
            out.push_str(&format!("  - {s}\n"));
        }
    }
    out
}

pub fn render_no_paths(target: &str, max_depth: usize) -> String {
    format!("No paths found to {target} within depth {max_depth} (try increasing --max-depth)")
        .yellow()
        .to_string()
}
