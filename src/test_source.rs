//! In-memory wiki used by the tests.
//!
//! Pages are keyed by the `title` query parameter of the requested url, so a
//! test registers `"Xtreme Gaming"` and the pipeline asks for `Xtreme_Gaming`.
//! Every request is recorded in order.

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use reqwest::StatusCode;
use url::Url;

use crate::{
    mediawiki_api::title_key,
    reqwest_client::{PageSource, RustError},
};

#[derive(Debug, Default)]
pub struct MockWiki {
    /// Responses per title. The last response repeats once the queue is down to one.
    pages: Mutex<HashMap<String, VecDeque<(StatusCode, String)>>>,
    requests: Mutex<Vec<String>>,
}

impl MockWiki {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `title`, wrapped in the proxy's preamble like the real thing.
    pub fn page(self, title: &str, body: &str) -> Self {
        let wrapped = format!(
            "Title: {}\n\nURL Source: https://liquipedia.net/dota2/{}\n\nMarkdown Content:\n{}",
            title,
            title_key(title),
            body
        );
        self.sequence(title, vec![(StatusCode::OK, wrapped)])
    }

    pub fn status(self, title: &str, status: StatusCode) -> Self {
        self.sequence(title, vec![(status, String::new())])
    }

    /// Serve `responses` for `title` one after another.
    pub fn sequence(self, title: &str, responses: Vec<(StatusCode, String)>) -> Self {
        if let Ok(mut pages) = self.pages.lock() {
            pages.insert(title_key(title), responses.into());
        }
        self
    }

    /// Titles requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self, title: &str) -> usize {
        let key = title_key(title);
        self.requests().iter().filter(|r| **r == key).count()
    }
}

impl PageSource for MockWiki {
    async fn fetch(&self, url: &Url) -> Result<(StatusCode, String), RustError> {
        let title = url
            .query_pairs()
            .find(|(k, _)| k == "title")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(title.clone());
        }

        let mut pages = self.pages.lock().unwrap();
        let response = match pages.get_mut(&title) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or((StatusCode::NOT_FOUND, String::new())))
    }
}
