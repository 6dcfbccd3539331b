//! Error types for the wikitext module.
//!
//! Extraction itself never fails: malformed markup simply yields fewer
//! templates. Errors only come out of explicit lookups, such as asking a page
//! for a template it does not contain or for the target of a broken redirect.
//!
//! Exported items:
//! - `WtError` - parse failures and missing items.
//! - `Result<T>` - convenient alias `std::result::Result<T, WtError>`.

use std::error::Error;
use std::fmt;

/// The canonical result type used across the wikitext module.
pub type Result<T> = std::result::Result<T, WtError>;

/// Wikitext error.
///
/// - `ParseError` - markup that was recognised but could not be interpreted,
///    e.g. a `#REDIRECT` line without a link. Optionally carries the byte
///    offset where the problem was detected.
/// - `NotFound` - requested template or parameter was not present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WtError {
    ParseError {
        msg: String,
        /// Byte offset in the source where the parse error was detected, if known.
        offset: Option<usize>,
    },
    NotFound {
        msg: String,
    },
}

impl WtError {
    /// Construct a parse error with a message and offset.
    pub fn parse_at<S: Into<String>>(msg: S, offset: usize) -> Self {
        WtError::ParseError {
            msg: msg.into(),
            offset: Some(offset),
        }
    }

    /// Construct a not-found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        WtError::NotFound { msg: msg.into() }
    }

    /// Returns a short description of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WtError::ParseError { .. } => "ParseError",
            WtError::NotFound { .. } => "NotFound",
        }
    }
}

impl fmt::Display for WtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WtError::ParseError { msg, offset } => {
                if let Some(off) = offset {
                    write!(f, "Parse error at {}: {}", off, msg)
                } else {
                    write!(f, "Parse error: {}", msg)
                }
            }
            WtError::NotFound { msg } => write!(f, "Not found: {}", msg),
        }
    }
}

impl Error for WtError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error_with_offset() {
        let e = WtError::parse_at("redirect without target", 9);
        let s = format!("{}", e);
        assert!(s.contains("9"));
        assert!(s.contains("redirect without target"));
        assert_eq!(e.kind(), "ParseError");
    }

    #[test]
    fn display_not_found() {
        let e = WtError::not_found("template 'infobox player' missing");
        let s = format!("{}", e);
        assert!(s.contains("template 'infobox player' missing"));
        assert_eq!(e.kind(), "NotFound");
    }
}
