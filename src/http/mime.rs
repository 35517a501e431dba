//! MIME type detection module
//!
//! Content-Type lookup for served files. Detection is delegated to
//! `mime_guess`; this module is the only place the serving code consults it.

use std::path::Path;

/// Content-Type for a file path, `application/octet-stream` when unknown
///
/// # Examples
/// ```
/// use filestack::http::mime::content_type;
/// use std::path::Path;
///
/// assert_eq!(content_type(Path::new("index.html")), "text/html");
/// assert_eq!(content_type(Path::new("blob.xyz")), "application/octet-stream");
/// ```
pub fn content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}
