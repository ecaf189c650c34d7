//! Checksum-keyed artifacts in the build directory.

use anyhow::Context;
use blake3::Hasher;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

static TEMP_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Hex blake3 digest of the files' contents joined by `"\n"`, in order.
pub fn generate_checksum<P: AsRef<Path>>(files: &[P]) -> anyhow::Result<String> {
    let mut hasher = Hasher::new();
    for (idx, file) in files.iter().enumerate() {
        let file = file.as_ref();
        if idx > 0 {
            hasher.update(b"\n");
        }
        let bytes = fs::read(file)
            .with_context(|| format!("Failed to read {} for checksum", file.display()))?;
        hasher.update(&bytes);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Cached content at `path`, if a previous run left it there.
pub fn read_cached(path: &Path) -> anyhow::Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
    debug!(file = %path.display(), "Cache hit");
    Ok(Some(content))
}

/// Fresh sibling path used while `path` is being produced. Unique per
/// call within the process.
pub fn temp_path(path: &Path) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::SeqCst);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}-{seq}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Writes `content` next to `path` and renames it into place, so readers
/// never observe a partial file.
pub fn write_atomic(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))?;
    Ok(())
}

/// Removes a cache file; a missing file is not an error.
pub fn remove_cached(path: &Path) {
    if fs::remove_file(path).is_ok() {
        debug!(file = %path.display(), "Cache file removed");
    }
}
