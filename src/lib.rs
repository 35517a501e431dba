//! Static file serving middleware.
//!
//! A chain of composable request handlers that resolve URL paths to files on
//! disk with traversal protection, attach HTTP cache validators, deliver
//! byte ranges, and apply ordered per-path header rules. Each handler wraps
//! a "next" handler and either answers a request or delegates onward:
//!
//! ```text
//! FallbackChain -> StaticRouter -> FileServer -> filesystem
//! ```
//!
//! The crate is transport-agnostic: it produces and consumes hyper
//! request/response values and leaves listeners, TLS, and timeouts to the
//! embedding application.
//!
//! # Examples
//! ```no_run
//! use filestack::{FallbackChain, NotFound, StaticConfig};
//! use std::sync::Arc;
//!
//! # fn demo() -> Result<(), filestack::ConfigError> {
//! let mut config = StaticConfig::new("/var/www/public");
//! config.urls = vec!["/".to_string()];
//! config.index = Some("index.html".to_string());
//! config.try_suffixes = vec![".html".to_string()];
//!
//! let chain = FallbackChain::new(&config, Arc::new(NotFound))?;
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod http;
pub mod resolve;
pub mod serve;

// Re-export the assembly surface
pub use chain::{Handler, NextHandler, NotFound, Request, Response};
pub use config::{HeaderRuleConfig, RuleKey, StaticConfig};
pub use error::ConfigError;
pub use resolve::ResolveError;
pub use serve::{FallbackChain, FileServer, FileService, StaticRouter};
