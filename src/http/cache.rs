//! HTTP cache validators
//!
//! `ETag` generation and conditional request evaluation (`If-None-Match`,
//! `If-Modified-Since`).

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, SystemTime};

/// Content hash of a file's bytes, used as the `ETag` value
///
/// # Returns
/// Quoted `ETag` string, e.g. `"ab12cd34"`
pub fn content_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if a client's `If-None-Match` header matches the server's `ETag`.
///
/// Supports a single tag, a comma-separated list, the `*` wildcard, and
/// weak (`W/`-prefixed) tags.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| {
        client.split(',').any(|tag| {
            let tag = tag.trim();
            tag == "*" || strip_weak(tag) == strip_weak(etag)
        })
    })
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Check an `If-Modified-Since` header against a file's modification time.
///
/// True when the resource has not been modified since the client's date.
/// HTTP dates carry one-second resolution, so the modification time is
/// truncated to seconds before the comparison. An unparseable date is
/// treated as "modified" (the full body is served).
pub fn not_modified_since(if_modified_since: Option<&str>, mtime: SystemTime) -> bool {
    let Some(value) = if_modified_since else {
        return false;
    };
    match httpdate::parse_http_date(value) {
        Ok(client_time) => truncate_to_seconds(mtime) <= client_time,
        Err(_) => false,
    }
}

/// Combined conditional-request evaluation: decides 304 eligibility given
/// the validators computed for the response. A present `If-None-Match`
/// takes precedence over `If-Modified-Since`.
pub fn is_client_cached(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    mtime: Option<SystemTime>,
) -> bool {
    if if_none_match.is_some() {
        return etag_matches(if_none_match, etag);
    }
    mtime.is_some_and(|mtime| not_modified_since(if_modified_since, mtime))
}

fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(since_epoch) => SystemTime::UNIX_EPOCH + Duration::from_secs(since_epoch.as_secs()),
        Err(_) => time,
    }
}
