use anyhow::Context;
use engine::{write_dump_json, EngineMetrics, ParseResult};
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the enriched AST and, when requested, the metrics file.
pub fn finish(
    result: &ParseResult,
    output_dir: &Path,
    metrics_path: Option<&Path>,
    metrics: &EngineMetrics,
) -> anyhow::Result<()> {
    let written = write_dump_json(result, output_dir)?;
    if let Some(path) = metrics_path {
        let data = serde_json::to_string_pretty(metrics).context("failed to serialize metrics")?;
        fs::write(path, data)
            .with_context(|| format!("failed to write metrics: {}", path.display()))?;
    }
    info!(
        output = %written.display(),
        files = metrics.files_parsed,
        constructors = metrics.enrich.constructors_filled,
        qual_types = metrics.enrich.qual_types_found,
        "Run completed"
    );
    Ok(())
}
