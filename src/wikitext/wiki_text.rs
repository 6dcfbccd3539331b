//! `WikiText` - a fetched page with lazily parsed templates.
//!
//! Parsing is deferred until templates are first requested and then cached,
//! so a page can be queried for several template kinds without rescanning.
//! Redirect detection works on the raw text and never touches the cache.

use std::sync::OnceLock;

use lazy_regex::regex_captures;

use crate::wikitext::errors::{Result, WtError};
use crate::wikitext::parser::parse_templates;
use crate::wikitext::templates::Template;

#[derive(Debug, Clone)]
pub struct WikiText {
    text: String,
    page_name: Option<String>,
    templates: OnceLock<Vec<Template>>,
}

impl WikiText {
    /// Wrap `input`. Nothing is parsed at construction time.
    pub fn parse<S: Into<String>>(input: S) -> Self {
        Self {
            text: input.into(),
            page_name: None,
            templates: OnceLock::new(),
        }
    }

    /// All top-level templates on the page, parsed once.
    pub fn templates(&self) -> &[Template] {
        self.templates.get_or_init(|| parse_templates(&self.text))
    }

    /// Top-level templates named any of `names`, in page order.
    pub fn get_templates<S: AsRef<str>>(&self, names: &[S]) -> Vec<&Template> {
        self.templates()
            .iter()
            .filter(|t| t.is_any_of(names))
            .collect()
    }

    /// First top-level template called `name`.
    pub fn get_template(&self, name: &str) -> Result<&Template> {
        self.get_templates(&[name])
            .into_iter()
            .next()
            .ok_or_else(|| {
                WtError::not_found(format!(
                    "Template '{}' not found on {:?}",
                    name, self.page_name
                ))
            })
    }

    /// Redirect target of the page, if it is a redirect.
    ///
    /// A page is a redirect when its trimmed text starts with `#redirect`
    /// (any case). The target is the first `[[...]]` link, cut at any pipe,
    /// with spaces turned into underscores.
    pub fn get_redirect(&self) -> Result<Option<String>> {
        let trimmed = self.text.trim_start();
        let is_redirect = trimmed
            .get(..9)
            .is_some_and(|marker| marker.eq_ignore_ascii_case("#redirect"));
        if !is_redirect {
            return Ok(None);
        }

        let offset = self.text.len() - trimmed.len();
        let Some((_, inner)) = regex_captures!(r"\[\[(.+?)\]\]", trimmed) else {
            return Err(WtError::parse_at("redirect without a link target", offset));
        };
        let target = inner.split('|').next().unwrap_or(inner).trim();
        if target.is_empty() {
            return Err(WtError::parse_at("redirect with an empty target", offset));
        }
        Ok(Some(target.replace(' ', "_")))
    }

    /// Return a clone of the optional page name.
    pub fn page_name(&self) -> Option<String> {
        self.page_name.clone()
    }

    /// Set the optional page name. Accepts `None` to clear it.
    pub fn set_page_name<S: Into<String>>(&mut self, page_name: Option<S>) {
        self.page_name = page_name.map(|s| s.into());
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_parsed_lazily_and_cached() {
        let wt = WikiText::parse("Plain {{Person|id=A|flag=cn}} {{Other}}");
        let first = wt.templates().as_ptr();
        assert_eq!(wt.templates().len(), 2);
        assert_eq!(wt.templates().as_ptr(), first);
        assert_eq!(wt.get_templates(&["person"]).len(), 1);
    }

    #[test]
    fn get_template_reports_missing() {
        let wt = WikiText::parse("{{Infobox team|name=A}}");
        assert!(wt.get_template("Infobox team").is_ok());
        match wt.get_template("infobox player") {
            Err(WtError::NotFound { .. }) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn redirect_detection_is_case_insensitive() {
        let wt = WikiText::parse("\n  #REDIRECT [[Other Page]]\n");
        assert_eq!(wt.get_redirect(), Ok(Some("Other_Page".to_string())));
        let wt = WikiText::parse("#redirect [[Somnus (player)|Somnus]]");
        assert_eq!(wt.get_redirect(), Ok(Some("Somnus_(player)".to_string())));
    }

    #[test]
    fn non_redirect_pages_return_none() {
        let wt = WikiText::parse("{{Infobox player|country=China}} #REDIRECT [[X]]");
        assert_eq!(wt.get_redirect(), Ok(None));
        assert_eq!(WikiText::parse("").get_redirect(), Ok(None));
        assert_eq!(WikiText::parse("#redir").get_redirect(), Ok(None));
    }

    #[test]
    fn redirect_without_target_is_a_parse_error() {
        let wt = WikiText::parse("  #REDIRECT nowhere");
        match wt.get_redirect() {
            Err(WtError::ParseError { offset, .. }) => assert_eq!(offset, Some(2)),
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn page_name_setter_getter() {
        let mut wt = WikiText::parse("dummy");
        assert!(wt.page_name().is_none());
        wt.set_page_name(Some("Ame"));
        assert_eq!(wt.page_name().as_deref(), Some("Ame"));
        wt.set_page_name::<&str>(None);
        assert!(wt.page_name().is_none());
    }
}
