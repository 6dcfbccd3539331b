use url::{ParseError, Url};

use crate::{
    definitions::ProcessError,
    reqwest_client::{PageSource, RustError},
    wikitext::WikiText,
};

/// Content proxy in front of the wiki. The wiki path follows the proxy host verbatim.
pub const WIKI_PROXY: &str = "https://r.jina.ai/https://liquipedia.net/dota2";
/// The proxy prints some metadata before this line; the page source follows it.
pub const MARKDOWN_TOKEN: &str = "Markdown Content:\n";

/// Page key form of a title: spaces become underscores.
pub fn title_key(title: &str) -> String {
    title.trim().replace(' ', "_")
}

/// Build the raw-source url of `title` behind `prefix`.
///
/// `<prefix>/index.php?title=<title>&action=raw`, with the title underscored
/// and url-encoded.
pub fn build_raw_url(prefix: &str, title: &str) -> Result<Url, ParseError> {
    let mut url = Url::parse(&format!("{}/index.php", prefix.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("title", &title_key(title))
        .append_pair("action", "raw")
        .finish();
    Ok(url)
}

/// Drop everything up to and including the proxy's [`MARKDOWN_TOKEN`], if present.
pub fn strip_proxy_header(text: &str) -> &str {
    match text.find(MARKDOWN_TOKEN) {
        Some(idx) => &text[idx + MARKDOWN_TOKEN.len()..],
        None => text,
    }
}

/// Fetch the raw source of `title`. Any non-2xx answer is an error.
pub async fn get_raw_page<S: PageSource>(
    source: &S,
    prefix: &str,
    title: &str,
) -> Result<WikiText, ProcessError> {
    let url = build_raw_url(prefix, title)?;
    log::debug!("Getting: {:?} ({})", title, url);
    let (status, body) = source.fetch(&url).await?;
    if !status.is_success() {
        return Err(RustError::Status { url, status }.into());
    }

    let mut wikitext = WikiText::parse(strip_proxy_header(&body));
    wikitext.set_page_name(Some(title_key(title)));
    Ok(wikitext)
}
