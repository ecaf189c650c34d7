//! Invocation of the external dump producers: the C++ front-end backend
//! script and clang's JSON AST dumper.

use anyhow::{bail, Context};
use loader::ResolvedCxxParserConfigs;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::cache::{generate_checksum, read_cached, remove_cached, temp_path, write_atomic};

/// Marker clang prints for errors that leave no usable AST.
const FATAL_MARKER: &str = "fatal error";

/// Captured result of one process run.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Runs external programs. Implementations must be shareable across
/// worker threads.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput>;
}

/// Runs programs with [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput> {
        debug!(program, args = ?args, "Running command");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("spawn {program}"))?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build directory holding every cached artifact of one parser config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDir {
    root: PathBuf,
}

impl BuildDir {
    /// `<config_dir>/<prefix>_cxx_parser`, or `<config_dir>/cxx_parser`
    /// without a prefix.
    pub fn new(config_dir: &Path, prefix: &str) -> Self {
        let name = if prefix.is_empty() {
            "cxx_parser".to_string()
        } else {
            format!("{prefix}_cxx_parser")
        };
        Self {
            root: config_dir.join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn create(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create build dir {}", self.root.display()))
    }

    /// Removes the whole directory and everything cached in it.
    pub fn clean(&self) -> anyhow::Result<()> {
        if self.root.exists() {
            info!(dir = %self.root.display(), "Cleaning build dir");
            fs::remove_dir_all(&self.root)
                .with_context(|| format!("Failed to remove {}", self.root.display()))?;
        }
        Ok(())
    }

    pub fn dump_json_path(&self, checksum: &str) -> PathBuf {
        self.root.join(format!("dump_json_{checksum}.json"))
    }

    pub fn pre_process_dir(&self, checksum: &str) -> PathBuf {
        self.root.join(format!("preProcess@{checksum}"))
    }

    pub fn clang_ast_path(&self, file: &Path, checksum: &str) -> PathBuf {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.root.join(format!("clang_ast_{stem}_{checksum}.json"))
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Option string handed to the backend's `build.sh` after the build dir.
pub fn backend_args(
    configs: &ResolvedCxxParserConfigs,
    parse_files: &[PathBuf],
    output: &Path,
    pre_process_dir: &Path,
) -> String {
    let mut args = format!(
        "--visit-headers={} --include-header-dirs={}",
        join_paths(parse_files),
        join_paths(&configs.include_header_dirs)
    );
    args.push_str(&format!(
        " --defines-macros={}",
        configs.defines_macros.join(",")
    ));
    if !configs.custom_headers.is_empty() {
        args.push_str(&format!(
            " --custom-headers={}",
            join_paths(&configs.custom_headers)
        ));
    }
    args.push_str(&format!(" --output-dir={}", output.display()));
    args.push_str(&format!(" --pre-process-dir={}", pre_process_dir.display()));
    args.push_str(" --dump-json");
    args
}

/// Base AST dump of `parse_files`, produced by the backend script or read
/// back from `<build dir>/dump_json_<checksum>.json`.
///
/// The script runs as `bash build.sh <build dir> "<options>"`.
pub fn dump_cxx_ast_json(
    runner: &dyn CommandRunner,
    configs: &ResolvedCxxParserConfigs,
    parse_files: &[PathBuf],
    build: &BuildDir,
) -> anyhow::Result<String> {
    let checksum = generate_checksum(parse_files)?;
    let output = build.dump_json_path(&checksum);
    if let Some(content) = read_cached(&output)? {
        return Ok(content);
    }

    // the backend recreates the pre-process directory itself
    let pre_process_dir = build.pre_process_dir(&checksum);
    let tmp = temp_path(&output);
    let script = configs.cppast_backend_dir.join("build.sh");
    let args = vec![
        script.to_string_lossy().into_owned(),
        build.path().to_string_lossy().into_owned(),
        backend_args(configs, parse_files, &tmp, &pre_process_dir),
    ];
    info!(files = parse_files.len(), "Dumping C++ AST");
    let out = runner.run("bash", &args)?;
    if !out.success {
        remove_cached(&tmp);
        bail!(
            "C++ AST dump failed: {}\n{}",
            command_line("bash", &args),
            out.stderr
        );
    }
    let content = fs::read_to_string(&tmp)
        .with_context(|| format!("Failed to read AST dump {}", tmp.display()))?;
    fs::rename(&tmp, &output)
        .with_context(|| format!("Failed to move {} into place", output.display()))?;
    Ok(content)
}

/// Arguments for clang's JSON AST dump of `file`.
pub fn clang_args(configs: &ResolvedCxxParserConfigs, file: &Path) -> Vec<String> {
    let mut args: Vec<String> = ["-Xclang", "-ast-dump=json", "-fsyntax-only", "-std=c++14"]
        .into_iter()
        .map(String::from)
        .collect();
    args.extend(
        configs
            .include_header_dirs
            .iter()
            .map(|dir| format!("-I{}", dir.display())),
    );
    args.extend(configs.defines_macros.iter().map(|d| format!("-D{d}")));
    args.push(file.to_string_lossy().into_owned());
    args
}

/// Native AST dump of one file, produced by clang or read back from
/// `<build dir>/clang_ast_<stem>_<checksum>.json`.
///
/// A `fatal error` diagnostic aborts and drops the cache entry. Other
/// failures are logged and whatever AST clang emitted is used.
pub fn dump_clang_ast_json(
    runner: &dyn CommandRunner,
    configs: &ResolvedCxxParserConfigs,
    file: &Path,
    build: &BuildDir,
) -> anyhow::Result<String> {
    let checksum = generate_checksum(&[file])?;
    let output = build.clang_ast_path(file, &checksum);
    if let Some(content) = read_cached(&output)? {
        return Ok(content);
    }

    let args = clang_args(configs, file);
    debug!(file = %file.display(), "Dumping clang AST");
    let out = runner.run(&configs.clang_program, &args)?;
    if out.stderr.contains(FATAL_MARKER) {
        remove_cached(&output);
        bail!(
            "Failed to dump clang AST for {}: {}\n{}",
            file.display(),
            command_line(&configs.clang_program, &args),
            out.stderr
        );
    }
    if !out.success {
        warn!(
            file = %file.display(),
            stderr = %out.stderr.trim(),
            "clang reported errors, using emitted AST"
        );
    }
    if out.stdout.is_empty() {
        bail!("clang emitted no AST for {}", file.display());
    }
    write_atomic(&output, &out.stdout)?;
    String::from_utf8(out.stdout)
        .with_context(|| format!("clang AST for {} is not UTF-8", file.display()))
}
