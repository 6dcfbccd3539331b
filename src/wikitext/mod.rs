//! Wikitext module root
//!
//! Declares the submodules of the template parser and re-exports the items
//! callers use most, so they can `use crate::wikitext::...` directly.

pub mod errors;
pub mod markup;
pub mod parser;
pub mod scanner;
pub mod templates;
pub mod wiki_text;

pub use parser::extract_templates;
pub use templates::Template;
pub use wiki_text::WikiText;
