//! Static route decisions
//!
//! Decides per request path whether this middleware owns the request at all
//! (URL prefix, exact rewrite entry, or trailing-slash index), rewrites the
//! path, invokes the file-serving capability, and applies header rules to
//! successful results. Everything else falls through to the next handler
//! without touching the filesystem.

use crate::chain::{Handler, NextHandler, Request, Response};
use crate::config::StaticConfig;
use crate::error::ConfigError;
use crate::http::response;
use crate::serve::file_server::{FileServer, FileService};
use crate::serve::rules::HeaderRules;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Routing middleware in front of a [`FileService`]
pub struct StaticRouter {
    urls: Vec<String>,
    rewrites: HashMap<String, String>,
    index: Option<String>,
    rules: HeaderRules,
    pass_through_on_miss: bool,
    files: Arc<dyn FileService>,
    next: NextHandler,
}

impl StaticRouter {
    /// Build a router backed by the built-in [`FileServer`]
    pub fn new(config: &StaticConfig, next: NextHandler) -> Result<Self, ConfigError> {
        let files = Arc::new(FileServer::from_config(config)?);
        Self::with_file_service(config, files, next)
    }

    /// Build a router with a custom file-serving capability
    pub fn with_file_service(
        config: &StaticConfig,
        files: Arc<dyn FileService>,
        next: NextHandler,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            urls: config.urls.clone(),
            rewrites: config.rewrites.clone(),
            index: config.index.clone(),
            rules: HeaderRules::compile(&config.header_rules)?,
            pass_through_on_miss: config.pass_through_on_miss,
            files,
            next,
        })
    }

    /// True if this router owns the path: a configured URL entry is a
    /// prefix, an exact rewrite entry exists, or an index filename is
    /// configured and the path ends in `/`
    pub fn can_serve(&self, path: &str) -> bool {
        self.urls.iter().any(|url| path.starts_with(url.as_str()))
            || self.rewrites.contains_key(path)
            || (self.index.is_some() && path.ends_with('/'))
    }

    /// The path actually served: exact rewrite entries substitute their
    /// target, then a trailing slash picks up the index filename
    fn effective_path(&self, path: &str) -> String {
        if let Some(target) = self.rewrites.get(path) {
            return target.clone();
        }
        if let Some(index) = &self.index {
            if path.ends_with('/') {
                return format!("{path}{index}");
            }
        }
        path.to_string()
    }

    /// Attempt to serve `req` statically. `None` is a miss, whether the
    /// path was never routable or the file service found nothing; the
    /// fallback chain treats both the same way.
    pub async fn try_serve(&self, req: &Request) -> Option<Response> {
        let path = req.uri().path();
        if !self.can_serve(path) {
            return None;
        }
        self.serve_routable(req, path).await
    }

    async fn serve_routable(&self, req: &Request, path: &str) -> Option<Response> {
        let effective = self.effective_path(path);
        debug!("routing {path} -> {effective}");
        let mut response = self.files.serve(req, &effective).await?;
        self.rules.apply(&effective, response.headers_mut());
        Some(response)
    }
}

#[async_trait]
impl Handler for StaticRouter {
    async fn handle(&self, req: &Request) -> Response {
        let path = req.uri().path();
        if !self.can_serve(path) {
            return self.next.handle(req).await;
        }
        match self.serve_routable(req, path).await {
            Some(response) => response,
            // A suppressed miss means "this router does not own the
            // request" and the chain continues
            None if self.pass_through_on_miss => self.next.handle(req).await,
            None => response::build_404_response(path),
        }
    }
}
