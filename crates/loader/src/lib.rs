//! Loads the terra YAML configuration and resolves the C++ parser's file
//! lists into absolute, existing paths.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

mod glob;
mod walk;
pub use glob::{expand, glob_to_regex, is_glob, resolve_path};
pub use walk::{visit, EntryKind};

/// Name of the C++ parser entry in `parsers`.
pub const CXX_PARSER_NAME: &str = "CXXParser";

/// Compiler used for native AST dumps when none is configured.
pub const DEFAULT_CLANG_PROGRAM: &str = "clang++";

/// Backend directory, relative to the config file, when none is configured.
pub const DEFAULT_BACKEND_DIR: &str = "cxx/cppast_backend";

/// One entry of the `parsers` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserEntry {
    pub name: String,
    #[serde(default)]
    pub args: YamlValue,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerraConfig {
    #[serde(default)]
    pub parsers: Vec<ParserEntry>,
    /// Directory holding the config file; relative entries resolve here.
    #[serde(skip)]
    pub config_dir: PathBuf,
}

impl TerraConfig {
    /// Arguments of the first `CXXParser` entry, if any.
    pub fn cxx_parser_configs(&self) -> anyhow::Result<Option<CxxParserConfigs>> {
        let Some(entry) = self.parsers.iter().find(|p| p.name == CXX_PARSER_NAME) else {
            return Ok(None);
        };
        let args = if entry.args.is_null() {
            CxxParserConfigs::default()
        } else {
            serde_yaml::from_value(entry.args.clone())
                .with_context(|| format!("Invalid arguments for parser {}", entry.name))?
        };
        Ok(Some(args))
    }
}

/// Reads and parses the YAML configuration at `path`.
pub fn load_config(path: &Path) -> anyhow::Result<TerraConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let mut config: TerraConfig = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.config_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    debug!(
        file = %path.display(),
        parsers = config.parsers.len(),
        "Configuration loaded"
    );
    Ok(config)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseFilesConfig {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Arguments of the C++ parser as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CxxParserConfigs {
    pub include_header_dirs: Vec<String>,
    pub defines_macros: Vec<String>,
    pub parse_files: ParseFilesConfig,
    pub custom_headers: Vec<String>,
    pub build_dir_name_prefix: Option<String>,
    pub clang_program: Option<String>,
    pub cppast_backend_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParseFiles {
    pub include: Vec<PathBuf>,
    pub exclude: Vec<PathBuf>,
}

/// C++ parser arguments with every path made absolute and globs expanded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedCxxParserConfigs {
    pub include_header_dirs: Vec<PathBuf>,
    pub defines_macros: Vec<String>,
    pub parse_files: ResolvedParseFiles,
    pub custom_headers: Vec<PathBuf>,
    pub build_dir_name_prefix: String,
    pub clang_program: String,
    pub cppast_backend_dir: PathBuf,
}

impl CxxParserConfigs {
    /// Resolves every entry against `config_dir`, expanding globs.
    pub fn resolve(&self, config_dir: &Path) -> anyhow::Result<ResolvedCxxParserConfigs> {
        let expand_all = |entries: &[String]| -> anyhow::Result<Vec<PathBuf>> {
            let mut out = Vec::new();
            for entry in entries {
                out.extend(expand(entry, config_dir)?);
            }
            Ok(out)
        };
        Ok(ResolvedCxxParserConfigs {
            include_header_dirs: expand_all(&self.include_header_dirs)?,
            defines_macros: self.defines_macros.clone(),
            parse_files: ResolvedParseFiles {
                include: expand_all(&self.parse_files.include)?,
                exclude: expand_all(&self.parse_files.exclude)?,
            },
            custom_headers: expand_all(&self.custom_headers)?,
            build_dir_name_prefix: self.build_dir_name_prefix.clone().unwrap_or_default(),
            clang_program: self
                .clang_program
                .clone()
                .unwrap_or_else(|| DEFAULT_CLANG_PROGRAM.to_string()),
            cppast_backend_dir: resolve_path(
                self.cppast_backend_dir.as_deref().unwrap_or(DEFAULT_BACKEND_DIR),
                config_dir,
            ),
        })
    }
}

impl ResolvedCxxParserConfigs {
    /// Files to parse: `include` minus `exclude`, in `include` order.
    pub fn parse_files(&self) -> Vec<PathBuf> {
        self.parse_files
            .include
            .iter()
            .filter(|f| !self.parse_files.exclude.contains(f))
            .cloned()
            .collect()
    }
}
