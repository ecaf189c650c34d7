use anyhow::Context;
use ir::ParseResult;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cache::write_atomic;

/// File written into the output directory.
pub const DUMP_FILE_NAME: &str = "terra_ast.json";

/// The graph's files as pretty JSON, in the dump's own shape.
pub fn render_dump_json(result: &ParseResult) -> anyhow::Result<String> {
    serde_json::to_string_pretty(&result.files).context("Failed to serialize parse result")
}

/// Writes [`DUMP_FILE_NAME`] under `output_dir` and returns its path.
pub fn write_dump_json(result: &ParseResult, output_dir: &Path) -> anyhow::Result<PathBuf> {
    let path = output_dir.join(DUMP_FILE_NAME);
    write_atomic(&path, render_dump_json(result)?.as_bytes())?;
    info!(file = %path.display(), files = result.files.len(), "AST written");
    Ok(path)
}
