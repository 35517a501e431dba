//! Serving middleware
//!
//! The composable handlers: [`FileServer`] answers requests from disk,
//! [`StaticRouter`] decides which paths it owns and applies header rules,
//! [`FallbackChain`] retries with configured path suffixes.

pub mod fallback;
pub mod file_server;
pub mod router;
pub mod rules;

pub use fallback::FallbackChain;
pub use file_server::{FileServer, FileService};
pub use router::StaticRouter;
pub use rules::HeaderRules;
