//! JSON export of an enumeration run.
use std::path::Path as FsPath;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexSet;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::Path;
use crate::persist;
use crate::schema::Format;

#[derive(Debug, Serialize)]
pub struct ExportData {
    pub generated_at: String,
    pub target_type: String,
    pub schema_file: String,
    pub schema_format: Format,
    pub total_paths: usize,
    pub entry_points: Vec<String>,
    pub paths: Vec<PathExport>,
}

#[derive(Debug, Serialize)]
pub struct PathExport {
    pub index: usize,
    pub path: String,
    pub segments: Vec<String>,
    pub depth: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgExport>,
}

#[derive(Debug, Serialize)]
pub struct ArgExport {
    pub field: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

pub struct ExportContext<'a> {
    pub target_type: &'a str,
    pub schema_file: &'a str,
    pub schema_format: Format,
    pub generated_at: DateTime<Utc>,
}

pub fn build(paths: &[Path], ctx: &ExportContext<'_>) -> ExportData {
    // first-seen order
    let entry_points: IndexSet<String> = paths.iter().filter_map(|p| p.entry_point().map(str::to_string)).collect();

    let paths = paths
        .iter()
        .enumerate()
        .map(|(i, path)| PathExport {
            index: i + 1,
            path: path.plain(),
            segments: path.segment_names(),
            depth: path.depth,
            arguments: path
                .segments
                .iter()
                .flat_map(|step| {
                    step.arguments.iter().map(|arg| ArgExport {
                        field: step.name.clone(),
                        name: arg.name.clone(),
                        ty: arg.declared_type.clone(),
                        required: arg.required,
                        default_value: arg.default_value.clone(),
                    })
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    ExportData {
        generated_at: ctx.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        target_type: ctx.target_type.to_string(),
        schema_file: ctx.schema_file.to_string(),
        schema_format: ctx.schema_format,
        total_paths: paths.len(),
        entry_points: entry_points.into_iter().collect(),
        paths,
    }
}

pub fn write(out: &FsPath, data: &ExportData) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let src = persist::to_json(out, data, true)?;
    std::fs::write(out, src).map_err(|e| Error::io(out, e))
}
