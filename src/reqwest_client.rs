use std::fmt;

use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

/// Anything that can fetch a URL and hand back its status and body.
///
/// The pipeline only talks to this trait so it can run against canned pages.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch(&self, url: &Url) -> Result<(StatusCode, String), RustError>;
}

/// Custom struct as a wrapper for custom functions
#[derive(Debug, Clone)]
pub struct RustClient(pub ClientWithMiddleware);

/// Custom error to include all potential reqwest related errors.
#[derive(Debug)]
pub enum RustError {
    MiddleWare(reqwest_middleware::Error),
    Underly(reqwest::Error),
    /// The server answered, but not with a 2xx.
    Status { url: Url, status: StatusCode },
}

impl RustClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// - user_agent -> User agent to tell the server about ourselves.
    ///
    /// # Returns
    /// - a new client object to use, or the builder error.
    pub fn new(user_agent: &str) -> Result<Self, RustError> {
        let client = reqwest_middleware::ClientBuilder::new(
            reqwest::ClientBuilder::new().user_agent(user_agent).build()?,
        )
        .build();
        Ok(Self(client))
    }

    pub fn get<U>(&self, url: U) -> reqwest_middleware::RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.0.get(url)
    }
}

impl PageSource for RustClient {
    async fn fetch(&self, url: &Url) -> Result<(StatusCode, String), RustError> {
        let response = self.get(url.clone()).send().await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }
}

impl RustError {
    /// Upstream asked us to slow down (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RustError::Status { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS)
    }
}

impl fmt::Display for RustError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RustError::MiddleWare(e) => write!(f, "request failed: {}", e),
            RustError::Underly(e) => write!(f, "transport error: {}", e),
            RustError::Status { url, status } => write!(f, "Failed to fetch {}: {}", url, status),
        }
    }
}

impl std::error::Error for RustError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RustError::MiddleWare(e) => Some(e),
            RustError::Underly(e) => Some(e),
            RustError::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for RustError {
    fn from(value: reqwest::Error) -> Self {
        Self::Underly(value)
    }
}
impl From<reqwest_middleware::Error> for RustError {
    fn from(value: reqwest_middleware::Error) -> Self {
        Self::MiddleWare(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_429_counts_as_rate_limited() {
        let url = Url::parse("https://example.org/index.php").unwrap();
        let limited = RustError::Status {
            url: url.clone(),
            status: StatusCode::TOO_MANY_REQUESTS,
        };
        let missing = RustError::Status {
            url,
            status: StatusCode::NOT_FOUND,
        };
        assert!(limited.is_rate_limited());
        assert!(!missing.is_rate_limited());
        assert!(missing.to_string().contains("404"));
    }

    #[test]
    fn client_builds_with_user_agent() {
        assert!(RustClient::new("cn-roster-test/1.0").is_ok());
    }
}
