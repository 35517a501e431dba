//! Try-suffix fallback serving
//!
//! Rewrites the request path with each configured suffix in turn (the bare
//! path first) and serves the first hit through the static router. When
//! every attempt misses, the *original* request is replayed against the
//! next handler, so a dynamic application downstream sees the path as it
//! was addressed, not a rewritten variant.

use crate::chain::{self, Handler, NextHandler, Request, Response};
use crate::config::StaticConfig;
use crate::error::ConfigError;
use crate::serve::router::StaticRouter;
use async_trait::async_trait;
use std::sync::Arc;

/// Fallback middleware trying `path`, then `path + suffix` for each
/// configured suffix
pub struct FallbackChain {
    suffixes: Vec<String>,
    router: StaticRouter,
    next: NextHandler,
}

impl FallbackChain {
    /// Build the chain from a router configuration; `config.try_suffixes`
    /// supplies the suffix order
    pub fn new(config: &StaticConfig, next: NextHandler) -> Result<Self, ConfigError> {
        let mut suffixes = vec![String::new()];
        suffixes.extend(config.try_suffixes.iter().cloned());
        Ok(Self {
            suffixes,
            router: StaticRouter::new(config, Arc::clone(&next))?,
            next,
        })
    }
}

#[async_trait]
impl Handler for FallbackChain {
    async fn handle(&self, req: &Request) -> Response {
        let original = req.uri().path().to_string();
        for suffix in &self.suffixes {
            let attempt = chain::with_path(req, &format!("{original}{suffix}"));
            if let Some(response) = self.router.try_serve(&attempt).await {
                return response;
            }
        }
        self.next.handle(req).await
    }
}
