//! Filesystem path resolution
//!
//! Turns a raw URL path into an absolute filesystem path confined to a root
//! directory. Traversal protection happens in two layers: segment-level `..`
//! collapsing first, then canonicalization (which follows symlinks) and a
//! prefix check against the canonical root. The order matters: a symlink
//! could otherwise escape the root even when the textual path looks safe.

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::warn;

/// Reasons a path failed to resolve.
///
/// Callers answer 404 for every category; the distinction is kept for
/// logging and tests.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    #[error("file not found")]
    NotFound,
    #[error("path escapes the served root")]
    OutsideRoot,
    #[error("file exists but is not readable")]
    Unreadable,
    #[error("path is a directory")]
    IsDirectory,
}

/// Collapse a decoded URL path to a clean relative path without touching the
/// filesystem.
///
/// Walks segments left to right keeping an output stack: empty segments and
/// `.` are skipped, `..` pops the stack (a `..` at the top is dropped, it
/// can never escape upward), anything else is pushed. Segments that merely
/// contain dots (`..test`, `test..`) are ordinary names.
pub fn clean_path(decoded: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.join("/")
}

/// Resolve `raw_path` to a canonical file path under `root`.
///
/// `root` must already be canonical (handlers canonicalize it once at
/// construction). The raw path is percent-decoded, segment-cleaned, joined
/// to the root and canonicalized; the result is accepted only if it still
/// lies under the root and is a readable non-directory.
pub async fn resolve(root: &Path, raw_path: &str) -> Result<PathBuf, ResolveError> {
    let decoded = percent_decode_str(raw_path).decode_utf8_lossy();
    let cleaned = clean_path(&decoded);
    let joined = root.join(cleaned);

    let canonical = match fs::canonicalize(&joined).await {
        Ok(path) => path,
        Err(e) => {
            return Err(match e.kind() {
                std::io::ErrorKind::PermissionDenied => ResolveError::Unreadable,
                _ => ResolveError::NotFound,
            })
        }
    };

    if !canonical.starts_with(root) {
        warn!(
            "path traversal attempt blocked: {raw_path} -> {}",
            canonical.display()
        );
        return Err(ResolveError::OutsideRoot);
    }

    let metadata = fs::metadata(&canonical)
        .await
        .map_err(|_| ResolveError::Unreadable)?;
    if metadata.is_dir() {
        return Err(ResolveError::IsDirectory);
    }

    Ok(canonical)
}
