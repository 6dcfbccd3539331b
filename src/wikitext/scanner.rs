//! Delimiter-aware scanning of wikitext.
//!
//! Everything that needs to know whether a character sits inside a nested
//! `{{...}}` or `[[...]]` goes through the [`Tokens`] iterator. It walks the
//! input once, pairing delimiters greedily from left to right, so `{{{` is an
//! opening brace pair followed by a literal `{`.
//!
//! On top of the tokenizer this module provides:
//! - [`DepthTracker`] - independent brace and bracket nesting counters.
//! - [`split_top_level`] - split on a separator only outside nested markup.
//! - [`find_balanced_end`] - locate the `}}` matching a `{{`.
//! - [`template_spans`] - iterate the outermost template spans of a document.

use std::iter::Peekable;
use std::str::CharIndices;

/// The two double-character delimiter pairs of the markup dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `{{` / `}}`
    Brace,
    /// `[[` / `]]`
    Bracket,
}

impl Delimiter {
    fn open_char(self) -> char {
        match self {
            Delimiter::Brace => '{',
            Delimiter::Bracket => '[',
        }
    }

    fn close_char(self) -> char {
        match self {
            Delimiter::Brace => '}',
            Delimiter::Bracket => ']',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Open(Delimiter),
    Close(Delimiter),
    Text(char),
}

impl Token {
    /// Width of the token in bytes.
    pub fn width(&self) -> usize {
        match self {
            Token::Open(_) | Token::Close(_) => 2,
            Token::Text(ch) => ch.len_utf8(),
        }
    }
}

/// What the tokenizer knows after reading one character.
enum State {
    Plain,
    MaybeOpen(Delimiter),
    MaybeClose(Delimiter),
}

/// Tokenizer over a string, yielding `(byte_offset, Token)`.
pub struct Tokens<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokens<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = (usize, Token);

    fn next(&mut self) -> Option<Self::Item> {
        let (pos, ch) = self.chars.next()?;
        let state = match ch {
            '{' => State::MaybeOpen(Delimiter::Brace),
            '[' => State::MaybeOpen(Delimiter::Bracket),
            '}' => State::MaybeClose(Delimiter::Brace),
            ']' => State::MaybeClose(Delimiter::Bracket),
            _ => State::Plain,
        };

        let token = match state {
            State::Plain => Token::Text(ch),
            State::MaybeOpen(delim) => {
                if self.chars.next_if(|&(_, c)| c == delim.open_char()).is_some() {
                    Token::Open(delim)
                } else {
                    Token::Text(ch)
                }
            }
            State::MaybeClose(delim) => {
                if self.chars.next_if(|&(_, c)| c == delim.close_char()).is_some() {
                    Token::Close(delim)
                } else {
                    Token::Text(ch)
                }
            }
        };
        Some((pos, token))
    }
}

/// Independent nesting counters for braces and brackets.
///
/// Closing delimiters without a matching opener saturate at zero instead of
/// going negative, so stray `}}` or `]]` never hide later separators.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DepthTracker {
    pub brace: usize,
    pub bracket: usize,
}

impl DepthTracker {
    pub fn observe(&mut self, token: Token) {
        match token {
            Token::Open(Delimiter::Brace) => self.brace += 1,
            Token::Open(Delimiter::Bracket) => self.bracket += 1,
            Token::Close(Delimiter::Brace) => self.brace = self.brace.saturating_sub(1),
            Token::Close(Delimiter::Bracket) => self.bracket = self.bracket.saturating_sub(1),
            Token::Text(_) => {}
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.brace == 0 && self.bracket == 0
    }
}

/// Split `text` on `sep`, ignoring separators inside nested `{{ }}` or `[[ ]]`.
///
/// Always returns at least one (possibly empty) segment. Segments are not trimmed.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = DepthTracker::default();
    let mut segment_start = 0usize;

    for (pos, token) in Tokens::new(text) {
        if token == Token::Text(sep) && depth.is_top_level() {
            parts.push(&text[segment_start..pos]);
            segment_start = pos + sep.len_utf8();
            continue;
        }
        depth.observe(token);
    }

    parts.push(&text[segment_start..]);
    parts
}

/// Given `text[start..]` beginning with `{{`, return the byte offset just past
/// the matching `}}`. Only brace depth is considered.
///
/// Returns `None` if `start` is not at `{{` or the text ends first.
pub fn find_balanced_end(text: &str, start: usize) -> Option<usize> {
    let rest = text.get(start..)?;
    let mut tokens = Tokens::new(rest);
    if tokens.next() != Some((0, Token::Open(Delimiter::Brace))) {
        return None;
    }

    let mut depth = 1usize;
    for (pos, token) in tokens {
        match token {
            Token::Open(Delimiter::Brace) => depth += 1,
            Token::Close(Delimiter::Brace) => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + pos + token.width());
                }
            }
            _ => {}
        }
    }
    None
}

/// Iterate the outermost `{{...}}` spans of a document as byte ranges.
///
/// After each span, scanning resumes right after its closing `}}`. The first
/// unbalanced span ends the iteration.
pub fn template_spans(text: &str) -> TemplateSpans<'_> {
    TemplateSpans { text, cursor: 0 }
}

pub struct TemplateSpans<'a> {
    text: &'a str,
    cursor: usize,
}

impl Iterator for TemplateSpans<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.cursor..)?;
        let start = self.cursor + rest.find("{{")?;
        match find_balanced_end(self.text, start) {
            Some(end) => {
                self.cursor = end;
                Some((start, end))
            }
            None => {
                self.cursor = self.text.len();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_pair_greedily() {
        let tokens: Vec<Token> = Tokens::new("{{{a]]]").map(|(_, t)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Open(Delimiter::Brace),
                Token::Text('{'),
                Token::Text('a'),
                Token::Close(Delimiter::Bracket),
                Token::Text(']'),
            ]
        );
    }

    #[test]
    fn tokens_report_byte_offsets_for_multibyte_text() {
        let tokens: Vec<(usize, Token)> = Tokens::new("中{{").collect();
        assert_eq!(tokens, vec![(0, Token::Text('中')), (3, Token::Open(Delimiter::Brace))]);
    }

    #[test]
    fn split_ignores_nested_separators() {
        let parts = split_top_level("Teamcard|team=A|p1={{flag|cn}} X|p2=[[Y|Z]]", '|');
        assert_eq!(parts, vec!["Teamcard", "team=A", "p1={{flag|cn}} X", "p2=[[Y|Z]]"]);
    }

    #[test]
    fn split_after_stray_closers_still_splits() {
        let parts = split_top_level("a]]|b}}|c", '|');
        assert_eq!(parts, vec!["a]]", "b}}", "c"]);
    }

    #[test]
    fn split_inside_unclosed_nesting_does_not_fire() {
        let parts = split_top_level("a|{{b|c", '|');
        assert_eq!(parts, vec!["a", "{{b|c"]);
    }

    #[test]
    fn balanced_end_skips_nested_templates() {
        let text = "x {{A|{{B|c}}|d}} y";
        let end = find_balanced_end(text, 2).unwrap();
        assert_eq!(&text[2..end], "{{A|{{B|c}}|d}}");
    }

    #[test]
    fn balanced_end_none_when_unterminated() {
        assert_eq!(find_balanced_end("{{A|{{B}}", 0), None);
        assert_eq!(find_balanced_end("no braces", 0), None);
    }

    #[test]
    fn spans_resume_after_closing_and_stop_when_unbalanced() {
        let text = "{{A}} text {{B|{{C}}}} {{D";
        let spans: Vec<&str> = template_spans(text).map(|(s, e)| &text[s..e]).collect();
        assert_eq!(spans, vec!["{{A}}", "{{B|{{C}}}}"]);
    }
}
