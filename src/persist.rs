//! Writes generated operations to disk: one `.graphql` file per path, a
//! `manifest.json` indexing them, and optionally a curl script.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::codegen;
use crate::error::{Error, Result};
use crate::graph::{self, Graph};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CURL_SCRIPT_FILE: &str = "test_commands.sh";

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub index: usize,
    pub description: String,
    pub path: String,
    pub query: String,
    /// Example values keyed by variable name.
    pub variables: IndexMap<String, Value>,
    pub variable_types: IndexMap<String, String>,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub count: usize,
    pub queries: &'a [ManifestEntry],
}

/// Generate one entry per path, numbered from 1.
pub fn build_entries(graph: &Graph, paths: &[graph::Path]) -> Vec<ManifestEntry> {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let index = i + 1;
            let generated = codegen::generate(graph, path);
            let plain = path.plain();
            ManifestEntry {
                index,
                description: format!("Path {index}: {plain}"),
                path: plain,
                query: generated.text,
                variables: generated.example_values,
                variable_types: generated.variables,
                file_name: format!("query_{index:03}.graphql"),
            }
        })
        .collect()
}

/// Write every query file plus the manifest; returns the manifest path.
pub fn save(dir: &Path, entries: &[ManifestEntry]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    for entry in entries {
        let file = dir.join(&entry.file_name);
        let variables = to_json(&file, &entry.variables, false)?;
        let content = format!("# {}\n# Variables: {variables}\n\n{}\n", entry.description, entry.query);
        std::fs::write(&file, content).map_err(|e| Error::io(&file, e))?;
        debug!(file = %file.display(), "wrote query");
    }
    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest = Manifest { count: entries.len(), queries: entries };
    let manifest_src = to_json(&manifest_path, &manifest, true)?;
    std::fs::write(&manifest_path, manifest_src).map_err(|e| Error::io(&manifest_path, e))?;
    Ok(manifest_path)
}

/// Encode `value` for the file at `path`.
pub(crate) fn to_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<String> {
    let encoded = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    encoded.map_err(|source| Error::Serialize { path: path.to_path_buf(), source })
}

/// One curl invocation per entry, POSTing the query and its example values.
pub fn curl_commands(endpoint: &str, entries: &[ManifestEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            let payload = json!({ "query": entry.query, "variables": entry.variables }).to_string();
            format!(
                "# {}\ncurl -X POST {endpoint} \\\n  -H \"Content-Type: application/json\" \\\n  -H \"Authorization: Bearer YOUR_TOKEN\" \\\n  -d '{}'",
                entry.description,
                shell_single_quoted(&payload),
            )
        })
        .collect()
}

pub fn save_curl_script(dir: &Path, endpoint: &str, entries: &[ManifestEntry]) -> Result<PathBuf> {
    let script_path = dir.join(CURL_SCRIPT_FILE);
    let mut script = format!("#!/bin/bash\n\n# Auto-generated GraphQL test commands\n# Endpoint: {endpoint}\n\n");
    script.push_str(&curl_commands(endpoint, entries).join("\n\n"));
    script.push('\n');
    std::fs::write(&script_path, script).map_err(|e| Error::io(&script_path, e))?;
    make_executable(&script_path)?;
    Ok(script_path)
}

/// Escape for embedding inside `'...'`.
fn shell_single_quoted(s: &str) -> String {
    s.replace('\'', r"'\''")
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traverse::sequential::find_paths;
    use crate::traverse::tests::social_graph;

    fn entries() -> Vec<ManifestEntry> {
        let g = social_graph();
        let paths = find_paths(&g, "Secret", 2);
        build_entries(&g, &paths)
    }

    #[test]
    fn entries_are_numbered_and_named() {
        let entries = entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[0].file_name, "query_001.graphql");
        assert_eq!(entries[0].description, "Path 1: user → secret");
        assert_eq!(entries[0].variables["user_id"], json!("123"));
        assert_eq!(entries[0].variable_types["user_id"], "ID!");
    }

    #[test]
    fn save_writes_queries_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("queries");
        let entries = entries();
        let manifest_path = save(&out, &entries).unwrap();

        let query = std::fs::read_to_string(out.join("query_001.graphql")).unwrap();
        assert!(query.starts_with("# Path 1: user → secret\n# Variables: {\"user_id\":\"123\"}\n\nquery($user_id: ID!) {"));

        let manifest: Value = serde_json::from_str(&std::fs::read_to_string(manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["count"], json!(1));
        assert_eq!(manifest["queries"][0]["file_name"], json!("query_001.graphql"));
        assert_eq!(manifest["queries"][0]["variables"]["user_id"], json!("123"));
    }

    #[test]
    fn curl_script_embeds_payload() {
        let dir = tempfile::tempdir().unwrap();
        let entries = entries();
        let script = save_curl_script(dir.path(), "https://api.example.com/graphql", &entries).unwrap();
        let src = std::fs::read_to_string(script).unwrap();
        assert!(src.starts_with("#!/bin/bash\n"));
        assert!(src.contains("curl -X POST https://api.example.com/graphql"));
        assert!(src.contains(r#""variables":{"user_id":"123"}"#));
    }

    #[test]
    fn single_quotes_are_escaped() {
        assert_eq!(shell_single_quoted("it's"), r"it'\''s");
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let err = save(&blocker.join("nested"), &entries()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn unencodable_value_is_a_serialize_error() {
        let keyed_by_tuple: std::collections::BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into();
        let err = to_json(Path::new("manifest.json"), &keyed_by_tuple, true).unwrap_err();
        assert!(matches!(err, Error::Serialize { .. }));
        assert!(err.to_string().starts_with("failed to encode manifest.json"));
    }
}
