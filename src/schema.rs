//! Schema normalization: raw bytes in, canonical [`Graph`] out.
//!
//! Format detection tries each encoding in turn:
//! - introspection first (a non-empty `__schema.types` list),
//! - then the GitHub documentation dump (non-empty `queries`, `objects` or `mutations`),
//! - otherwise the input is rejected as [`Error::UnrecognizedFormat`].
//!
//! Adding an encoding means adding one `detect`/`lower` pair here; search and
//! query generation never see the source format.
pub mod github;
pub mod introspection;
pub mod type_ref;

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::path_de::from_value_with_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Introspection,
    Github,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Introspection => f.write_str("introspection"),
            Format::Github => f.write_str("github"),
        }
    }
}

/// Parse raw schema bytes, detecting the encoding.
pub fn normalize(raw: &[u8], include_mutations: bool) -> Result<(Graph, Format)> {
    let doc: Value = serde_json::from_slice(raw).map_err(|source| Error::MalformedInput { source })?;
    normalize_value(&doc, include_mutations)
}

/// Same as [`normalize`] for an already parsed (possibly pre-selected) document.
pub fn normalize_value(doc: &Value, include_mutations: bool) -> Result<(Graph, Format)> {
    let (graph, format) = if let Some(schema) = introspection::detect(doc) {
        debug!("detected introspection encoding");
        let parsed = from_value_with_path::<introspection::SchemaDoc>(schema)
            .map_err(|detail| Error::Decode { format: Format::Introspection, detail })?;
        (introspection::lower(parsed, include_mutations), Format::Introspection)
    } else if github::detect(doc) {
        debug!("detected github encoding");
        let parsed = from_value_with_path::<github::GithubDoc>(doc)
            .map_err(|detail| Error::Decode { format: Format::Github, detail })?;
        (github::lower(parsed, include_mutations), Format::Github)
    } else {
        return Err(Error::UnrecognizedFormat);
    };
    info!(%format, types = graph.nodes.len(), roots = graph.roots.len(), "schema normalized");
    Ok((graph, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_json_is_malformed() {
        let err = normalize(b"{not json", false).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn unknown_shape_is_unrecognized() {
        let err = normalize(br#"{"hello": [1, 2, 3]}"#, false).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedFormat));
        let err = normalize(br#"{"data": {"__schema": {"types": []}}}"#, false).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedFormat));
    }

    #[test]
    fn introspection_wins_over_github() {
        let raw = br#"{"__schema": {"types": [{"kind": "OBJECT", "name": "Query", "fields": []}]},
                       "queries": [{"name": "a", "type": "A"}]}"#;
        let (_, format) = normalize(raw, false).unwrap();
        assert_eq!(format, Format::Introspection);
    }

    #[test]
    fn github_decode_error_names_the_path() {
        let raw = br#"{"queries": [{"name": "a", "type": "A", "args": [{"name": 7, "type": "ID"}]}]}"#;
        let err = normalize(raw, false).unwrap_err();
        match err {
            Error::Decode { format, detail } => {
                assert_eq!(format, Format::Github);
                assert!(detail.contains("queries[0].args[0].name"), "{detail}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
