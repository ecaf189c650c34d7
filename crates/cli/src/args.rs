use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Parses `HEADER=AST_JSON` into its two paths.
fn parse_clang_ast(s: &str) -> Result<(PathBuf, PathBuf), String> {
    let (header, ast) = s
        .split_once('=')
        .ok_or_else(|| format!("expected HEADER=AST_JSON, got '{s}'"))?;
    if header.is_empty() || ast.is_empty() {
        return Err(format!("expected HEADER=AST_JSON, got '{s}'"));
    }
    Ok((PathBuf::from(header), PathBuf::from(ast)))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "terra - normalized and enriched C++ AST for code generators",
    long_about = "terra parses C++ headers into a normalized AST, links every declaration to its enclosing scope and enriches it with details recovered from clang's own AST: constructor initializer lists and fully qualified parameter types.

Examples:
  terra run --config terra.yaml --output-dir out            # Full pipeline
  terra run --config terra.yaml --output-dir out --clean    # Ignore cached dumps
  terra link --dump dump.json --clang-ast a.h=a.json --output-dir out",
    subcommand_required = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the headers named by a config file and write the enriched AST
    Run(RunArgs),
    /// Enrich an existing AST dump from pre-generated clang dumps
    Link(LinkArgs),
}

#[derive(ClapArgs, Clone, Copy)]
pub struct LogArgs {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(ClapArgs)]
pub struct RunArgs {
    /// Path to the terra YAML config
    #[arg(long)]
    pub config: PathBuf,
    /// Directory receiving terra_ast.json
    #[arg(long = "output-dir")]
    pub output_dir: PathBuf,
    /// Prefix of the build directory name, overriding the config
    #[arg(long = "build-dir-prefix")]
    pub build_dir_prefix: Option<String>,
    /// Remove cached dumps before running
    #[arg(long)]
    pub clean: bool,
    /// Write pipeline metrics to file
    #[arg(long)]
    pub metrics: Option<PathBuf>,
    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(ClapArgs)]
pub struct LinkArgs {
    /// AST dump produced by the C++ front-end
    #[arg(long)]
    pub dump: PathBuf,
    /// clang JSON AST of a header, as HEADER=AST_JSON
    #[arg(long = "clang-ast", value_parser = parse_clang_ast)]
    pub clang_asts: Vec<(PathBuf, PathBuf)>,
    /// Directory receiving terra_ast.json
    #[arg(long = "output-dir")]
    pub output_dir: PathBuf,
    /// Write pipeline metrics to file
    #[arg(long)]
    pub metrics: Option<PathBuf>,
    #[command(flatten)]
    pub log: LogArgs,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_clang_ast_splits_on_first_equals() {
        let (header, ast) = parse_clang_ast("include/a.h=build/a=1.json").unwrap();
        assert_eq!(header, PathBuf::from("include/a.h"));
        assert_eq!(ast, PathBuf::from("build/a=1.json"));
    }

    #[test]
    fn parse_clang_ast_rejects_missing_parts() {
        assert!(parse_clang_ast("include/a.h").is_err());
        assert!(parse_clang_ast("=a.json").is_err());
    }
}
