use std::{env, path::PathBuf, str::FromStr, time::Duration};

use derive_builder::Builder;

use crate::{
    hard_coded::{OUTPUT_PATH, TOURNAMENTS, USER_AGENT},
    mediawiki_api::WIKI_PROXY,
    retry::RetryPolicy,
};

/// Everything a run needs to know. Defaults are the production values.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    /// Proxy + wiki base, without a trailing `/index.php`.
    #[builder(default = "WIKI_PROXY.to_string()")]
    pub proxy_prefix: String,
    #[builder(default = "USER_AGENT.to_string()")]
    pub user_agent: String,
    #[builder(default = "PathBuf::from(OUTPUT_PATH)")]
    pub output_path: PathBuf,
    #[builder(default = "TOURNAMENTS.iter().map(|t| t.to_string()).collect()")]
    pub tournaments: Vec<String>,
    /// Wait before every player profile request.
    #[builder(default = "Duration::from_millis(1500)")]
    pub profile_delay: Duration,
    /// Wait after every team roster request.
    #[builder(default = "Duration::from_millis(1000)")]
    pub team_delay: Duration,
    #[builder(default = "5")]
    pub max_redirect_hops: usize,
    #[builder(default = "RetryPolicy::rate_limited()")]
    pub profile_retry: RetryPolicy,
}

impl Config {
    /// Defaults with overrides from the environment (`.env` included, if loaded).
    ///
    /// - `CN_ROSTER_PROXY` - proxy prefix
    /// - `CN_ROSTER_USER_AGENT`
    /// - `CN_ROSTER_OUTPUT` - dataset path
    /// - `CN_ROSTER_PROFILE_DELAY_MS` / `CN_ROSTER_TEAM_DELAY_MS`
    pub fn from_env() -> Result<Self, ConfigBuilderError> {
        let mut builder = ConfigBuilder::default();
        if let Ok(proxy) = env::var("CN_ROSTER_PROXY") {
            builder.proxy_prefix(proxy);
        }
        if let Ok(agent) = env::var("CN_ROSTER_USER_AGENT") {
            builder.user_agent(agent);
        }
        if let Ok(path) = env::var("CN_ROSTER_OUTPUT") {
            builder.output_path(path);
        }
        if let Some(ms) = env_number::<u64>("CN_ROSTER_PROFILE_DELAY_MS") {
            builder.profile_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = env_number::<u64>("CN_ROSTER_TEAM_DELAY_MS") {
            builder.team_delay(Duration::from_millis(ms));
        }
        builder.build()
    }
}

/// Read a numeric environment variable, ignoring (and logging) junk.
fn env_number<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_constants() {
        let config = ConfigBuilder::default().build().unwrap();
        assert_eq!(config.proxy_prefix, WIKI_PROXY);
        assert_eq!(config.tournaments.len(), 16);
        assert_eq!(config.tournaments[0], "The International/2025");
        assert_eq!(config.profile_delay, Duration::from_millis(1500));
        assert_eq!(config.team_delay, Duration::from_millis(1000));
        assert_eq!(config.max_redirect_hops, 5);
        assert_eq!(config.profile_retry, RetryPolicy::rate_limited());
        assert_eq!(config.output_path, PathBuf::from("data/chinese_players_2025.json"));
    }

    #[test]
    fn builder_overrides_single_fields() {
        let config = ConfigBuilder::default()
            .tournaments(vec!["BLAST/Slam/3".to_string()])
            .team_delay(Duration::ZERO)
            .build()
            .unwrap();
        assert_eq!(config.tournaments, vec!["BLAST/Slam/3".to_string()]);
        assert_eq!(config.team_delay, Duration::ZERO);
        assert_eq!(config.profile_delay, Duration::from_millis(1500));
    }

    #[test]
    fn env_number_ignores_missing_variables() {
        assert_eq!(env_number::<u64>("CN_ROSTER_TEST_SURELY_UNSET_VARIABLE"), None);
    }
}
