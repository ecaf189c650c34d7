//! Minimal glob support for configuration entries: `*`, `?` and `**`.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::walk::visit;

/// Whether `pattern` contains glob metacharacters.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Converts a glob pattern to an anchored regular expression.
///
/// `**/` matches zero or more directories, `**` anything, `*` anything but
/// a separator and `?` one character. Character classes are not supported.
///
/// # Example
///
/// ```
/// use loader::glob_to_regex;
/// let re = glob_to_regex("include/**/*.h").unwrap();
/// assert!(re.is_match("include/a.h"));
/// assert!(re.is_match("include/rtc/b.h"));
/// assert!(!re.is_match("include/a.cpp"));
/// ```
pub fn glob_to_regex(pat: &str) -> Result<Regex, regex::Error> {
    if pat.contains('[') || pat.contains(']') {
        return Regex::new("[");
    }
    let mut regex = String::from("^");
    let mut chars = pat.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        regex.push_str("(?:.*/)?");
                    } else {
                        regex.push_str(".*");
                    }
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push_str("[^/]"),
            '.' => regex.push_str("\\."),
            '(' | ')' | '+' | '|' | '^' | '$' | '{' | '}' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex.push('$');
    Regex::new(&regex)
}

/// Joins a relative entry onto `base`; absolute entries are kept.
pub fn resolve_path(entry: &str, base: &Path) -> PathBuf {
    let path = Path::new(entry);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Longest leading run of components free of glob metacharacters.
fn glob_root(pattern: &Path) -> PathBuf {
    let mut root = PathBuf::new();
    for component in pattern.components() {
        if let Component::Normal(part) = component {
            if is_glob(&part.to_string_lossy()) {
                break;
            }
        }
        root.push(component);
    }
    root
}

/// Expands `entry`, relative to `base`, into the existing paths it names.
///
/// Plain entries yield themselves when they exist. Glob entries walk the
/// non-glob prefix directory and keep every file or directory matching the
/// whole pattern, sorted.
pub fn expand(entry: &str, base: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = resolve_path(entry, base);
    let pattern_str = normalize(&pattern);
    if !is_glob(&pattern_str) {
        return Ok(if pattern.exists() {
            vec![pattern]
        } else {
            debug!(path = %pattern.display(), "Configured path does not exist");
            Vec::new()
        });
    }

    let re = glob_to_regex(&pattern_str)
        .map_err(|e| anyhow::anyhow!("invalid glob '{entry}': {e}"))?;
    let root = glob_root(&pattern);
    if !root.is_dir() {
        debug!(root = %root.display(), "Glob root is not a directory");
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    visit(&root, &|_| false, &mut |path, _| {
        if re.is_match(&normalize(path)) {
            out.push(path.to_path_buf());
        }
        Ok(())
    })?;
    out.sort();
    debug!(pattern = %pattern_str, matches = out.len(), "Glob expanded");
    Ok(out)
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
