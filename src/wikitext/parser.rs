use crate::wikitext::scanner::template_spans;
use crate::wikitext::templates::Template;

/// Parse every top-level template in `input`, in document order.
///
/// Nested templates stay inside their parent's parameter values. An
/// unbalanced `{{` ends the scan; whatever was found before it is returned.
pub fn parse_templates(input: &str) -> Vec<Template> {
    template_spans(input)
        .map(|(start, end)| Template::parse(&input[start..end]))
        .collect()
}

/// Return the top-level templates of `input` whose name is one of `targets`
/// (case-insensitive, exact).
pub fn extract_templates<S: AsRef<str>>(input: &str, targets: &[S]) -> Vec<Template> {
    parse_templates(input)
        .into_iter()
        .filter(|t| t.is_any_of(targets))
        .collect()
}
