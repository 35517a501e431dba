//! Per-path header rules
//!
//! An ordered rule list applied to successful static responses. Rules are
//! normalized into compiled matchers when the router is built, so request
//! handling never re-parses patterns. All matching rules apply in
//! declaration order; a later match overwrites an earlier one on the same
//! field name and nothing is ever removed otherwise.

use crate::config::{HeaderRuleConfig, RuleKey};
use crate::error::ConfigError;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use regex::Regex;
use std::path::Path;

const FONT_EXTENSIONS: [&str; 5] = ["ttf", "otf", "eot", "woff", "svg"];

#[derive(Debug)]
enum Matcher {
    All,
    Fonts,
    Prefix(String),
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::All => true,
            Self::Fonts => has_font_extension(path),
            Self::Prefix(prefix) => {
                path.starts_with(prefix.as_str())
                    || path
                        .strip_prefix('/')
                        .is_some_and(|rest| rest.starts_with(prefix.as_str()))
            }
            Self::Pattern(pattern) => pattern.is_match(path),
        }
    }
}

fn has_font_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext))
}

/// Compiled, ordered header rules
#[derive(Debug, Default)]
pub struct HeaderRules {
    rules: Vec<(Matcher, Vec<(HeaderName, HeaderValue)>)>,
}

impl HeaderRules {
    /// Compile configured rules into matchers, failing fast on a malformed
    /// pattern or an invalid header name/value
    pub fn compile(configs: &[HeaderRuleConfig]) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(configs.len());
        for config in configs {
            let matcher = match &config.rule {
                RuleKey::All => Matcher::All,
                RuleKey::Fonts => Matcher::Fonts,
                RuleKey::Prefix { value } => Matcher::Prefix(value.clone()),
                RuleKey::Pattern { value } => {
                    let pattern = Regex::new(value).map_err(|source| ConfigError::Pattern {
                        pattern: value.clone(),
                        source,
                    })?;
                    Matcher::Pattern(pattern)
                }
            };
            rules.push((matcher, compile_headers(&config.headers)?));
        }
        Ok(Self { rules })
    }

    /// Apply every rule matching `path`, in declaration order
    pub fn apply(&self, path: &str, headers: &mut HeaderMap) {
        for (matcher, rule_headers) in &self.rules {
            if matcher.matches(path) {
                for (name, value) in rule_headers {
                    headers.insert(name.clone(), value.clone());
                }
            }
        }
    }
}

pub(crate) fn compile_headers(
    configured: &std::collections::BTreeMap<String, String>,
) -> Result<Vec<(HeaderName, HeaderValue)>, ConfigError> {
    let mut headers = Vec::with_capacity(configured.len());
    for (name, value) in configured {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::Header(name.clone()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::Header(format!("{name}: {value}")))?;
        headers.push((header_name, header_value));
    }
    Ok(headers)
}
