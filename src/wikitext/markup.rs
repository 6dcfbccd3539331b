//! Turning raw parameter values into plain text.
//!
//! Parameter values keep their markup after parsing (`{{flag|cn}} [[Ame]]`).
//! These helpers strip it back down to what a reader would see, with one
//! exception: `country_text` keeps the code carried by `{{flag|..}}`.

use lazy_regex::regex_replace_all;

use crate::wikitext::scanner::{find_balanced_end, split_top_level};

/// Remove every `{{...}}` span (nested ones included) from `text`.
pub fn strip_templates(text: &str) -> String {
    render_templates(text, |_| None)
}

/// Display text: templates removed, links reduced to their label (or
/// target when unpiped), then trimmed.
pub fn plain_text(text: &str) -> String {
    unlink(&strip_templates(text)).trim().to_string()
}

/// Like [`plain_text`], but `{{flag|X}}` contributes `X`.
pub fn country_text(text: &str) -> String {
    let rendered = render_templates(text, |inner| {
        let mut args = split_top_level(inner, '|').into_iter();
        let name = args.next()?.trim();
        if !name.eq_ignore_ascii_case("flag") {
            return None;
        }
        args.next().map(|code| code.trim().to_string())
    });
    unlink(&rendered).trim().to_string()
}

/// Page title out of a link parameter: `[[Target|Label]]` -> `Target`.
pub fn link_target(text: &str) -> String {
    let text = text.trim();
    let inner = text
        .strip_prefix("[[")
        .and_then(|t| t.strip_suffix("]]"))
        .unwrap_or(text);
    inner.split('|').next().unwrap_or(inner).trim().to_string()
}

/// Replace each top-level template with whatever `render` returns for its
/// body (`None` drops it). An unterminated `{{` swallows the rest of the text.
fn render_templates<F>(text: &str, render: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;

    while let Some(found) = text[cursor..].find("{{") {
        let start = cursor + found;
        out.push_str(&text[cursor..start]);
        let Some(end) = find_balanced_end(text, start) else {
            return out;
        };
        if let Some(rendered) = render(&text[start + 2..end - 2]) {
            out.push_str(&rendered);
        }
        cursor = end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// `[[Target|Label]]` -> `Label`, `[[Target]]` -> `Target`; leftover brackets dropped.
fn unlink(text: &str) -> String {
    let linked = regex_replace_all!(r"\[\[(?:[^\]|]*\|)?([^\]]*)\]\]", text, "$1");
    linked.replace("[[", "").replace("]]", "")
}
