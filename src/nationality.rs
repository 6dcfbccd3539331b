//! Reading a player's country out of their profile infobox.

use itertools::Itertools;
use lazy_regex::regex;

use crate::wikitext::{Template, WikiText, markup::country_text};

pub const INFOBOX_PLAYER: &str = "infobox player";
/// Infobox parameters that may hold a country, in reading order.
pub const COUNTRY_PARAMS: [&str; 4] = ["country", "nationality", "country1", "country2"];
/// Roster flag codes meaning China.
pub const CHINA_FLAGS: [&str; 2] = ["cn", "china"];
/// Country tokens meaning China.
pub const CHINA_COUNTRIES: [&str; 4] = ["china", "cn", "people's republic of china", "prc"];

pub fn is_chinese_flag(flag: &str) -> bool {
    let flag = flag.trim().to_lowercase();
    CHINA_FLAGS.contains(&flag.as_str())
}

pub fn is_chinese_country<S: AsRef<str>>(countries: &[S]) -> bool {
    countries
        .iter()
        .any(|c| CHINA_COUNTRIES.contains(&c.as_ref().trim().to_lowercase().as_str()))
}

/// Split a cleaned country value on commas, slashes or the word "and".
fn split_countries(text: &str) -> impl Iterator<Item = String> + '_ {
    regex!(r"(?i)\s*[,/]\s*|\s+and\s+")
        .split(text)
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
}

/// Lowercased, deduplicated country tokens of an infobox.
pub fn infobox_countries(infobox: &Template) -> Vec<String> {
    COUNTRY_PARAMS
        .iter()
        .filter_map(|key| infobox.param(key))
        .map(country_text)
        .flat_map(|value| split_countries(&value).collect_vec())
        .unique()
        .collect()
}

/// Countries listed on a profile page; empty when it has no player infobox.
pub fn page_countries(page: &WikiText) -> Vec<String> {
    match page.get_template(INFOBOX_PLAYER) {
        Ok(infobox) => infobox_countries(infobox),
        Err(e) => {
            log::debug!("[{}] {}", e.kind(), e);
            vec![]
        }
    }
}
