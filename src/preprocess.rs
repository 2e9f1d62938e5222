//! Optional pre-selection of the schema document, for dumps that wrap the
//! schema in some envelope: a JSON Pointer, then a jq filter.
use jaq_core::{Compiler, Ctx, RcIter, load};
use jaq_json::Val;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

pub fn select(doc: Value, json_pointer: Option<&str>, jq_expr: Option<&str>) -> Result<Value> {
    let doc = match json_pointer {
        None => doc,
        Some(pointer) => {
            debug!(pointer, "applying JSON pointer");
            doc.pointer(pointer)
                .cloned()
                .ok_or_else(|| Error::Preprocess(format!("JSON pointer {pointer} matched nothing")))?
        }
    };
    let Some(jq_expr) = jq_expr else {
        return Ok(doc);
    };
    debug!(jq_expr, "applying jq filter");
    let mut outputs = run_jaq(jq_expr, &doc)?;
    match outputs.len() {
        1 => Ok(outputs.remove(0)),
        n => Err(Error::Preprocess(format!("jq filter must yield exactly one value, got {n}"))),
    }
}

/// Compile `filter` against the std and JSON definitions and collect every
/// output of running it on `input`.
fn run_jaq(filter: &str, input: &Value) -> Result<Vec<Value>> {
    let arena = load::Arena::default();
    let modules = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()))
        .load(&arena, load::File { code: filter, path: () })
        .map_err(|errs| {
            let reasons: Vec<String> = errs.iter().map(|(_, err)| format!("{err:?}")).collect();
            Error::Preprocess(format!("cannot parse jq filter `{filter}`: {}", reasons.join("; ")))
        })?;
    let compiled = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| {
            let names: Vec<&str> = errs.iter().flat_map(|(_, undefined)| undefined.iter().map(|(name, _)| *name)).collect();
            Error::Preprocess(format!("jq filter `{filter}` uses undefined {}", names.join(", ")))
        })?;

    let inputs = RcIter::new(core::iter::empty());
    compiled
        .run((Ctx::new([], &inputs), Val::from(input.clone())))
        .map(|item| {
            let val = item.map_err(|e| Error::Preprocess(format!("jq filter `{filter}` failed: {e:?}")))?;
            serde_json::from_str::<Value>(&val.to_string())
                .map_err(|e| Error::Preprocess(format!("jq output is not JSON: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_selects_subdocument() {
        let doc = json!({"payload": {"schema": {"queries": []}}});
        assert_eq!(select(doc, Some("/payload/schema"), None).unwrap(), json!({"queries": []}));
    }

    #[test]
    fn missing_pointer_is_an_error() {
        let err = select(json!({}), Some("/nope"), None).unwrap_err();
        assert!(matches!(err, Error::Preprocess(_)));
    }

    #[test]
    fn jq_filter_selects_subdocument() {
        let doc = json!({"wrapper": {"data": {"__schema": {"types": []}}}});
        assert_eq!(select(doc, None, Some(".wrapper")).unwrap(), json!({"data": {"__schema": {"types": []}}}));
    }

    #[test]
    fn jq_filter_must_yield_one_value() {
        let err = select(json!([1, 2]), None, Some(".[]")).unwrap_err();
        assert!(matches!(err, Error::Preprocess(msg) if msg.contains("got 2")));
    }

    #[test]
    fn passthrough_without_settings() {
        assert_eq!(select(json!({"a": 1}), None, None).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn unparsable_and_undefined_filters_are_reported() {
        let err = select(json!({}), None, Some(".[")).unwrap_err();
        assert!(matches!(&err, Error::Preprocess(msg) if msg.starts_with("cannot parse jq filter `.[`")), "{err}");

        let err = select(json!({}), None, Some("no_such_fn")).unwrap_err();
        assert!(matches!(&err, Error::Preprocess(msg) if msg.contains("undefined no_such_fn")), "{err}");
    }
}
