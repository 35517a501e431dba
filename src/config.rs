//! Configuration types
//!
//! Everything the embedding application supplies to construct the serving
//! handlers. There is no global state and no config-file loader here: build
//! a [`StaticConfig`] programmatically, or deserialize one with serde if the
//! embedder keeps its settings in TOML/JSON.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Key selecting which served paths a header rule applies to.
///
/// Resolved into a compiled matcher list at construction time; a malformed
/// `Pattern` is a construction error, never a silently skipped rule.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum RuleKey {
    /// Every served path
    All,
    /// Paths with a font extension (ttf, otf, eot, woff, svg)
    Fonts,
    /// Paths starting with the value, with or without a leading slash
    Prefix { value: String },
    /// Paths matching a regular expression
    Pattern { value: String },
}

/// One header rule: a matcher plus the headers it applies.
///
/// Rules are evaluated in declaration order and accumulate; a later matching
/// rule overwrites an earlier one on the same field name.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HeaderRuleConfig {
    #[serde(flatten)]
    pub rule: RuleKey,
    pub headers: BTreeMap<String, String>,
}

/// Static serving configuration for one router instance
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StaticConfig {
    /// Directory all served paths must resolve under
    pub root: PathBuf,

    /// URL prefixes this router owns
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,

    /// Exact public path -> actual served path substitutions
    #[serde(default)]
    pub rewrites: HashMap<String, String>,

    /// Index filename appended to paths ending in `/`
    #[serde(default)]
    pub index: Option<String>,

    /// Ordered header rules applied to successful static responses
    #[serde(default)]
    pub header_rules: Vec<HeaderRuleConfig>,

    /// Extra headers merged into every file response (overwriting computed
    /// values on collision)
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,

    /// On a miss, delegate to the next handler instead of answering 404
    #[serde(default)]
    pub pass_through_on_miss: bool,

    /// Path suffixes tried in order by [`crate::FallbackChain`]; the bare
    /// path is always tried first
    #[serde(default)]
    pub try_suffixes: Vec<String>,
}

fn default_urls() -> Vec<String> {
    vec!["/favicon.ico".to_string()]
}

impl StaticConfig {
    /// Configuration with documented defaults, serving under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            urls: default_urls(),
            rewrites: HashMap::new(),
            index: None,
            header_rules: Vec::new(),
            extra_headers: BTreeMap::new(),
            pass_through_on_miss: false,
            try_suffixes: Vec::new(),
        }
    }
}
