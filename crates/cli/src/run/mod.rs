use anyhow::{bail, Context};
use engine::{link_dump, run_cxx_parser, EngineMetrics, SystemCommandRunner};
use loader::{load_config, CXX_PARSER_NAME};
use tracing::{debug, info};

use crate::args::{LinkArgs, RunArgs};
use crate::{init_logging, output};

/// `terra run`: config → base dump → native dumps → enriched AST.
pub fn run_parse(args: RunArgs) -> anyhow::Result<()> {
    init_logging(args.log);
    info!(config = %args.config.display(), "Run started");

    let config = load_config(&args.config)?;
    let Some(mut cxx) = config.cxx_parser_configs()? else {
        bail!(
            "no {CXX_PARSER_NAME} entry in {}",
            args.config.display()
        );
    };
    if let Some(prefix) = args.build_dir_prefix {
        cxx.build_dir_name_prefix = Some(prefix);
    }
    let resolved = cxx
        .resolve(&config.config_dir)
        .context("failed to resolve parser paths")?;
    debug!(
        include = resolved.parse_files.include.len(),
        exclude = resolved.parse_files.exclude.len(),
        header_dirs = resolved.include_header_dirs.len(),
        "Parser paths resolved"
    );
    if resolved.parse_files().is_empty() {
        bail!("no files to parse after applying include/exclude");
    }

    let mut metrics = EngineMetrics::default();
    let result = run_cxx_parser(
        &resolved,
        &config.config_dir,
        args.clean,
        &SystemCommandRunner,
        Some(&mut metrics),
    )?;
    output::finish(&result, &args.output_dir, args.metrics.as_deref(), &metrics)
}

/// `terra link`: existing base dump + pre-generated native dumps.
pub fn run_link(args: LinkArgs) -> anyhow::Result<()> {
    init_logging(args.log);
    info!(
        dump = %args.dump.display(),
        clang_asts = args.clang_asts.len(),
        "Link started"
    );
    let mut metrics = EngineMetrics::default();
    let result = link_dump(&args.dump, &args.clang_asts, Some(&mut metrics))?;
    output::finish(&result, &args.output_dir, args.metrics.as_deref(), &metrics)
}
