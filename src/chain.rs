//! Middleware chain primitives
//!
//! Every serving component wraps a "next" handler and either answers a
//! request itself or delegates onward. Chains are composed by explicit
//! construction, outermost handler last:
//!
//! ```no_run
//! use filestack::{FallbackChain, NotFound, StaticConfig};
//! use std::sync::Arc;
//!
//! # fn demo() -> Result<(), filestack::ConfigError> {
//! let config = StaticConfig::new("/var/www/public");
//! let chain = FallbackChain::new(&config, Arc::new(NotFound))?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Uri;
use std::sync::Arc;
use tracing::warn;

use crate::http::response;

/// Request passed along the chain
pub type Request = hyper::Request<Full<Bytes>>;

/// Response produced by the chain
pub type Response = hyper::Response<Full<Bytes>>;

/// A stage in the middleware chain: answers the request or delegates to the
/// handler it wraps
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: &Request) -> Response;
}

/// Shared handle to the next stage in the chain
pub type NextHandler = Arc<dyn Handler>;

/// Terminal handler answering 404 for everything; the conventional tail of a
/// chain when no dynamic application sits below the static layers
pub struct NotFound;

#[async_trait]
impl Handler for NotFound {
    async fn handle(&self, req: &Request) -> Response {
        response::build_404_response(req.uri().path())
    }
}

/// Copy of `req` re-addressed to `path`, query string preserved.
///
/// Method and headers are cloned; the body is empty (the static layers never
/// read request bodies).
pub fn with_path(req: &Request, path: &str) -> Request {
    let target = match req.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };
    let uri = target.parse::<Uri>().unwrap_or_else(|e| {
        warn!("failed to rewrite request path to {path}: {e}");
        req.uri().clone()
    });

    let mut rewritten = Request::new(Full::new(Bytes::new()));
    *rewritten.method_mut() = req.method().clone();
    *rewritten.uri_mut() = uri;
    *rewritten.headers_mut() = req.headers().clone();
    rewritten
}
