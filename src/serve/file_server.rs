//! Static file serving
//!
//! Resolves a request path against a root directory and builds full or
//! partial responses with cache validators. The file is read once per
//! request: the ETag, the Content-Length, and the (possibly sliced) body all
//! come from the same bytes, so a partial response is always an exact slice
//! of the content its validators describe. Nothing is memoized; repeated
//! requests re-read and re-hash, trading throughput on large files for
//! consistency with the on-disk state.

use crate::chain::{Handler, Request, Response};
use crate::config::StaticConfig;
use crate::error::ConfigError;
use crate::http::range::{parse_ranges, RangeOutcome};
use crate::http::{cache, mime, response};
use crate::resolve;
use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Method, StatusCode};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Strategy for turning a request path into a file response.
///
/// The router invokes this capability for every path it routes; `None`
/// means "nothing to serve here" and the router decides what a miss
/// becomes. The built-in implementation is [`FileServer`]; embedders can
/// inject their own (a cache layer, an in-memory bundle) at router
/// construction.
#[async_trait]
pub trait FileService: Send + Sync {
    async fn serve(&self, req: &Request, path: &str) -> Option<Response>;
}

/// Serves files from a root directory.
///
/// As a [`Handler`] it is terminal: every request gets a response and misses
/// become 404. It also implements [`FileService`] so a router can treat a
/// miss as "not mine".
pub struct FileServer {
    root: PathBuf,
    extra_headers: Vec<(HeaderName, HeaderValue)>,
}

impl FileServer {
    /// Build a server for `root` with extra headers merged into every file
    /// response.
    ///
    /// Fails fast when the root cannot be canonicalized to a directory or a
    /// configured header is not valid HTTP; a bad root is a configuration
    /// error, not a per-request 404.
    pub fn new(
        root: impl Into<PathBuf>,
        extra_headers: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let root = root.into();
        let canonical = std::fs::canonicalize(&root).map_err(|source| ConfigError::Root {
            path: root.clone(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(ConfigError::Root {
                path: root,
                source: std::io::Error::other("not a directory"),
            });
        }

        Ok(Self {
            root: canonical,
            extra_headers: super::rules::compile_headers(extra_headers)?,
        })
    }

    /// Build the default file server for a router configuration
    pub fn from_config(config: &StaticConfig) -> Result<Self, ConfigError> {
        Self::new(&config.root, &config.extra_headers)
    }

    /// Canonical root directory this server is confined to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve `raw_path` (which may differ from the request URI after a
    /// router rewrite), folding misses into 404
    pub async fn serve_path(&self, req: &Request, raw_path: &str) -> Response {
        match self.try_serve(req, raw_path).await {
            Some(response) => response,
            None => response::build_404_response(raw_path),
        }
    }

    /// Serve `raw_path`, returning `None` for any category of resolution
    /// failure (missing, outside root, unreadable, directory)
    async fn try_serve(&self, req: &Request, raw_path: &str) -> Option<Response> {
        let method = req.method();
        if !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
            warn!("method not allowed for static file: {method}");
            return Some(response::build_405_response(ALLOWED_METHODS));
        }
        // Answered before any filesystem access
        if *method == Method::OPTIONS {
            return Some(response::build_options_response(ALLOWED_METHODS));
        }

        let resolved = match resolve::resolve(&self.root, raw_path).await {
            Ok(path) => path,
            Err(err) => {
                debug!("static miss for {raw_path}: {err}");
                return None;
            }
        };

        self.respond_with_file(req, &resolved, *method == Method::HEAD)
            .await
    }

    async fn respond_with_file(
        &self,
        req: &Request,
        path: &Path,
        is_head: bool,
    ) -> Option<Response> {
        let content = match fs::read(path).await {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read {}: {e}", path.display());
                return None;
            }
        };
        let mtime = fs::metadata(path).await.ok().and_then(|m| m.modified().ok());

        let size = content.len() as u64;
        let etag = cache::content_etag(&content);

        let mut headers = HeaderMap::new();
        response::set_header(&mut headers, "Cache-Control", "public");
        response::set_header(&mut headers, "Content-Type", &mime::content_type(path));
        response::set_header(&mut headers, "Accept-Ranges", "bytes");
        response::set_header(&mut headers, "ETag", &etag);
        if let Some(mtime) = mtime {
            response::set_header(&mut headers, "Last-Modified", &httpdate::fmt_http_date(mtime));
        }
        for (name, value) in &self.extra_headers {
            headers.insert(name.clone(), value.clone());
        }

        let mut status = StatusCode::OK;
        let mut body = Bytes::from(content);
        match parse_ranges(header_str(req, "range"), size) {
            RangeOutcome::Ranges(ranges) if ranges.is_empty() => {
                // Understood but unsatisfiable: everything computed above is
                // discarded except the size
                return Some(response::build_416_response(size, is_head));
            }
            RangeOutcome::Ranges(ranges) if ranges.len() == 1 => {
                let range = ranges[0];
                status = StatusCode::PARTIAL_CONTENT;
                response::set_header(
                    &mut headers,
                    "Content-Range",
                    &format!("bytes {}-{}/{size}", range.start, range.end),
                );
                body = body.slice(range.start as usize..=range.end as usize);
            }
            // Several ranges degrade to the full body; multipart responses
            // are out of scope
            RangeOutcome::Ranges(_) | RangeOutcome::NoRange | RangeOutcome::Invalid => {}
        }
        response::set_header(&mut headers, "Content-Length", &body.len().to_string());

        if cache::is_client_cached(
            header_str(req, "if-none-match"),
            header_str(req, "if-modified-since"),
            &etag,
            mtime,
        ) {
            return Some(not_modified(headers));
        }

        if is_head {
            body = Bytes::new();
        }
        Some(response::finalize(status, headers, body))
    }
}

/// 304 keeps the computed validators but drops the content headers along
/// with the body
fn not_modified(mut headers: HeaderMap) -> Response {
    headers.remove("Content-Type");
    headers.remove("Content-Length");
    headers.remove("Content-Range");
    response::finalize(StatusCode::NOT_MODIFIED, headers, Bytes::new())
}

fn header_str<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl FileService for FileServer {
    async fn serve(&self, req: &Request, path: &str) -> Option<Response> {
        self.try_serve(req, path).await
    }
}

#[async_trait]
impl Handler for FileServer {
    async fn handle(&self, req: &Request) -> Response {
        self.serve_path(req, req.uri().path()).await
    }
}
