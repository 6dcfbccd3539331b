//! Template data type and the parser for a single template invocation.
//!
//! A template looks like `{{Name|key=value|key2=value2}}`. Only named
//! parameters are kept: positional segments (anything without `=`) are
//! dropped, which is enough for the card, person and infobox templates we read.

use std::collections::HashMap;

use crate::wikitext::errors::{Result, WtError};
use crate::wikitext::scanner::split_top_level;

/// A parsed template invocation.
///
/// `name` is trimmed and lowercased. `params` keys are trimmed and lowercased;
/// values are trimmed but otherwise left as raw markup for callers to clean up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub params: HashMap<String, String>,
}

impl Template {
    /// Parse a raw template invocation, `{{` ... `}}` included.
    ///
    /// Outer braces are optional so callers can also pass just the body.
    pub fn parse(raw: &str) -> Self {
        let inner = raw.strip_prefix("{{").unwrap_or(raw);
        let inner = inner.strip_suffix("}}").unwrap_or(inner);

        let mut segments = split_top_level(inner, '|').into_iter();
        let name = segments
            .next()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();

        let mut params = HashMap::new();
        for segment in segments {
            let Some((key, value)) = segment.trim().split_once('=') else {
                continue;
            };
            params.insert(key.trim().to_lowercase(), value.trim().to_string());
        }

        Template { name, params }
    }

    /// Value of `key` if present and not empty.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(&key.to_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Like [`Template::param`] but reports which parameter was missing.
    pub fn get_param(&self, key: &str) -> Result<&str> {
        self.param(key).ok_or_else(|| {
            WtError::not_found(format!(
                "Parameter '{}' not found in template '{}'",
                key, self.name
            ))
        })
    }

    /// Whether this template's name is one of `names` (case-insensitive, exact).
    pub fn is_any_of<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names
            .iter()
            .any(|n| n.as_ref().trim().to_lowercase() == self.name)
    }
}
