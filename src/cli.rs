//! CLI: load schema → enumerate paths → (listing | JSON export | generated queries)
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Args, Parser};
use colored::Colorize;
use tracing::{info, warn};

use crate::error::Error;
use crate::export::{self, ExportContext};
use crate::graph::Path;
use crate::schema::{self, Format};
use crate::traverse::{self, Strategy};
use crate::{persist, preprocess, report};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// list every route from root queries/mutations to a target type in a GraphQL schema
#[derive(Parser, Debug)]
#[command(name = "graphql-paths", version)]
pub struct CommandLineInterface {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    search_settings: SearchSettings,

    #[command(flatten)]
    output_settings: OutputSettings,

    /// verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// disable colored output
    #[arg(long)]
    no_color: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// schema JSON file (introspection result or GitHub-style documentation dump)
    #[arg(long, short)]
    schema: PathBuf,

    /// also start from Mutation fields
    #[arg(long, default_value_t = false)]
    mutations: bool,

    /// JSON Pointer selecting the schema inside the document (e.g. /payload/schema)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter applied to the document; must yield one value
    #[arg(long)]
    jq_expr: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct SearchSettings {
    /// target type name to find paths to
    #[arg(long = "type", short = 't')]
    target: String,

    /// maximum number of steps per path
    #[arg(long, default_value_t = 15)]
    max_depth: usize,

    /// number of parallel workers (0 = sequential)
    #[arg(long, default_value_t = 0)]
    parallel: usize,
}

#[derive(Args, Debug, Clone)]
struct OutputSettings {
    /// export results to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// generate an example query per path
    #[arg(long)]
    generate: bool,

    /// output directory for generated queries
    #[arg(short, long, default_value = "./queries")]
    output: PathBuf,

    /// GraphQL endpoint; writes a curl script next to the generated queries
    #[arg(long, requires = "generate")]
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found(usize),
    NoPaths,
    NoOp,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Found(_) | Outcome::NoOp => ExitCode::SUCCESS,
            Outcome::NoPaths => ExitCode::from(2),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> anyhow::Result<(crate::graph::Graph, Format)> {
        let source_path_str = self.schema.to_string_lossy().to_string();
        let raw = std::fs::read(&self.schema).with_context(|| format!("failed to read schema file ({source_path_str})"))?;
        let loaded = if self.json_pointer.is_none() && self.jq_expr.is_none() {
            schema::normalize(&raw, self.mutations)
        } else {
            let doc = serde_json::from_slice(&raw).map_err(|source| Error::MalformedInput { source })?;
            let doc = preprocess::select(doc, self.json_pointer.as_deref(), self.jq_expr.as_deref())?;
            schema::normalize_value(&doc, self.mutations)
        };
        loaded.with_context(|| format!("failed to load schema ({source_path_str})"))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> anyhow::Result<Outcome> {
        if self.no_color {
            colored::control::set_override(false);
        }
        // debug path
        if self.no_op {
            eprintln!("{self:#?}");
            return Ok(Outcome::NoOp);
        }

        // 1) load + normalize
        let (graph, format) = self.input_settings.load()?;
        let target = self.search_settings.target.as_str();
        traverse::ensure_target(&graph, target)?;
        let entry_count: usize =
            graph.roots.iter().filter_map(|r| graph.node(&r.type_name)).map(|n| n.fields.len()).sum();
        if entry_count == 0 {
            bail!("no entry points found in schema");
        }
        info!(entry_count, "searching entry points");

        // 2) enumerate
        let strategy = Strategy::from_workers(self.search_settings.parallel);
        let mut paths = traverse::find_paths(&graph, target, self.search_settings.max_depth, strategy);
        if matches!(strategy, Strategy::Parallel { .. }) {
            paths.sort();
        }
        if paths.is_empty() {
            println!("{}", report::render_no_paths(target, self.search_settings.max_depth));
            return Ok(Outcome::NoPaths);
        }

        // 3) emit
        let out = &self.output_settings;
        if out.generate {
            self.write_queries(&graph, &paths)?;
        } else if let Some(json_out) = out.json.as_ref() {
            let schema_file = self.input_settings.schema.to_string_lossy();
            let ctx = ExportContext {
                target_type: target,
                schema_file: &schema_file,
                schema_format: format,
                generated_at: chrono::Utc::now(),
            };
            export::write(json_out, &export::build(&paths, &ctx))?;
            println!("{}", format!("✓ Exported {} paths to {}", paths.len(), json_out.display()).green());
        } else {
            print!("{}", report::render_listing(&paths, target));
            println!();
        }
        Ok(Outcome::Found(paths.len()))
    }

    fn write_queries(&self, graph: &crate::graph::Graph, paths: &[Path]) -> anyhow::Result<()> {
        let out = &self.output_settings;
        let entries = persist::build_entries(graph, paths);
        persist::save(&out.output, &entries)?;
        println!("{}", format!("✓ Generated {} queries in {}/", entries.len(), out.output.display()).green());

        if let Some(endpoint) = out.endpoint.as_deref() {
            match persist::save_curl_script(&out.output, endpoint, &entries) {
                Ok(script) => println!("{}", format!("✓ Curl commands saved to {}", script.display()).green()),
                Err(error) => warn!(%error, "failed to save curl commands"),
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Print a failure to stderr, with type suggestions when the target was missing.
pub fn report_failure(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<Error>() {
        Some(Error::TargetTypeNotFound { target, suggestions }) => {
            eprint!("{}", report::render_missing_target(target, suggestions));
        }
        _ => eprintln!("error: {error:#}"),
    }
    ExitCode::FAILURE
}
