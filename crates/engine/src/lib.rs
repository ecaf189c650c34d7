//! Drives terra's C++ pipeline: produce (or reuse) the base dump and the
//! per-file native dumps, build the graph and enrich it.

use anyhow::Context;
use ir::parse_clang_ast;
use loader::ResolvedCxxParserConfigs;
use parsers::{enrich, parse_result_from_json, EnrichMetrics, NativeAst};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

pub mod cache;
pub mod process;
pub mod render;

pub use cache::generate_checksum;
pub use process::{
    dump_clang_ast_json, dump_cxx_ast_json, BuildDir, CommandOutput, CommandRunner,
    SystemCommandRunner,
};
pub use ir::ParseResult;
pub use render::{render_dump_json, write_dump_json, DUMP_FILE_NAME};

#[derive(Debug, Default, Serialize)]
pub struct EngineMetrics {
    pub files_parsed: usize,
    pub dump_ms: u128,
    pub enrich_ms: u128,
    pub enrich: EnrichMetrics,
}

/// Runs the full C++ parser for one resolved config.
///
/// `clean` wipes the build directory first. Native dumps run in parallel
/// and are collected in parse-file order before enrichment.
pub fn run_cxx_parser(
    configs: &ResolvedCxxParserConfigs,
    config_dir: &Path,
    clean: bool,
    runner: &dyn CommandRunner,
    metrics: Option<&mut EngineMetrics>,
) -> anyhow::Result<ParseResult> {
    let build = BuildDir::new(config_dir, &configs.build_dir_name_prefix);
    if clean {
        build.clean()?;
    }
    build.create()?;

    let parse_files = configs.parse_files();
    info!(
        files = parse_files.len(),
        build_dir = %build.path().display(),
        "Parsing C++ headers"
    );
    let start = Instant::now();
    let dump = dump_cxx_ast_json(runner, configs, &parse_files, &build)?;
    let mut result = parse_result_from_json(&dump)?;
    let asts = parse_files
        .par_iter()
        .map(|file| {
            let content = dump_clang_ast_json(runner, configs, file, &build)?;
            native_ast(file, &content)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let dump_ms = start.elapsed().as_millis();

    enrich_timed(&mut result, &asts, parse_files.len(), dump_ms, metrics);
    Ok(result)
}

/// Links an existing base dump with pre-generated native dumps, given as
/// `(header, native AST json)` pairs.
pub fn link_dump(
    dump_path: &Path,
    native: &[(PathBuf, PathBuf)],
    metrics: Option<&mut EngineMetrics>,
) -> anyhow::Result<ParseResult> {
    let start = Instant::now();
    let dump = fs::read_to_string(dump_path)
        .with_context(|| format!("Failed to read AST dump: {}", dump_path.display()))?;
    let mut result = parse_result_from_json(&dump)
        .with_context(|| format!("Invalid AST dump: {}", dump_path.display()))?;
    let asts = native
        .par_iter()
        .map(|(header, ast_path)| {
            let content = fs::read_to_string(ast_path)
                .with_context(|| format!("Failed to read clang AST: {}", ast_path.display()))?;
            native_ast(header, &content)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let dump_ms = start.elapsed().as_millis();
    let files_parsed = result.files.len();

    enrich_timed(&mut result, &asts, files_parsed, dump_ms, metrics);
    Ok(result)
}

fn native_ast(file: &Path, content: &str) -> anyhow::Result<NativeAst> {
    let root = parse_clang_ast(content)
        .with_context(|| format!("Failed to parse clang AST of {}", file.display()))?;
    debug!(file = %file.display(), "clang AST loaded");
    Ok(NativeAst::new(file, root))
}

fn enrich_timed(
    result: &mut ParseResult,
    asts: &[NativeAst],
    files_parsed: usize,
    dump_ms: u128,
    metrics: Option<&mut EngineMetrics>,
) {
    let start = Instant::now();
    let mut enrich_metrics = EnrichMetrics::default();
    enrich(result, asts, Some(&mut enrich_metrics));
    let enrich_ms = start.elapsed().as_millis();
    info!(
        constructors = enrich_metrics.constructors_filled,
        qual_types = enrich_metrics.qual_types_found,
        "Enrichment finished"
    );
    if let Some(m) = metrics {
        m.files_parsed += files_parsed;
        m.dump_ms += dump_ms;
        m.enrich_ms += enrich_ms;
        m.enrich.files_enriched += enrich_metrics.files_enriched;
        m.enrich.records_found += enrich_metrics.records_found;
        m.enrich.constructors_filled += enrich_metrics.constructors_filled;
        m.enrich.qual_types_found += enrich_metrics.qual_types_found;
    }
}
