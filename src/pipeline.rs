//! Tournament pages -> team rosters -> player nationality.
//!
//! Everything runs one request at a time. The [`Pipeline`] owns what it has
//! learned so far (players seen, teams seen, rosters fetched) and hands back the
//! Chinese players once every stage is done.

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use itertools::Itertools;

use crate::{
    config::Config,
    definitions::{PlayerLedger, PlayerRecord, ProcessError, Roster},
    mediawiki_api::{get_raw_page, title_key},
    nationality::{is_chinese_country, is_chinese_flag, page_countries},
    reqwest_client::PageSource,
    roster,
    wikitext::WikiText,
};

/// Log how many of `results` passed and return the passed values.
fn count_processed<'a, K, E: Display>(results: &'a [Result<K, E>], stage: &str) -> Vec<&'a K> {
    let mut passed = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(value) => passed.push(value),
            Err(e) => log::debug!("[{}] failed: {}", stage, e),
        }
    }

    log::info!(
        "[{}] Total: {}. Passed: {}. Rate: {:.2}%",
        stage,
        results.len(),
        passed.len(),
        if results.is_empty() {
            0.0
        } else {
            (passed.len() as f64 / results.len() as f64) * 100.0
        }
    );
    passed
}

pub struct Pipeline<'a, S: PageSource> {
    source: &'a S,
    config: &'a Config,
    ledger: PlayerLedger,
    /// Teams in the order their cards were first read. May repeat.
    teams: Vec<String>,
    rosters: HashMap<String, Roster>,
}

impl<'a, S: PageSource> Pipeline<'a, S> {
    pub fn new(source: &'a S, config: &'a Config) -> Self {
        Self {
            source,
            config,
            ledger: PlayerLedger::default(),
            teams: vec![],
            rosters: HashMap::new(),
        }
    }

    /// Run every stage and return the Chinese players, in first-seen order.
    pub async fn run(mut self) -> Vec<PlayerRecord> {
        let config = self.config;

        let mut scanned = Vec::with_capacity(config.tournaments.len());
        for tournament in &config.tournaments {
            let result = self.process_tournament(tournament).await;
            if let Err(e) = &result {
                log::error!("Failed to process tournament {}: {}", tournament, e);
            }
            scanned.push(result);
        }
        count_processed(&scanned, "process_tournament");
        if self.ledger.is_empty() {
            log::warn!("No players found on any tournament page");
        }
        log::info!(
            "Found {} players across {} teams",
            self.ledger.len(),
            self.teams.iter().unique().count()
        );

        self.fetch_rosters().await;

        let mut classified = Vec::with_capacity(self.ledger.len());
        let mut chinese = vec![];
        for record in self.ledger.iter() {
            let result = self.classify(record).await;
            match &result {
                Ok(true) => {
                    log::info!("Chinese player found: {}", record.name);
                    chinese.push(record.clone());
                }
                Ok(false) => log::debug!("Not Chinese: {}", record.name),
                Err(e) => log::error!("Failed to fetch player {}: {}", record.title, e),
            }
            classified.push(result);
        }
        count_processed(&classified, "classify_player");

        chinese
    }

    /// Read one tournament page into the ledger. Returns the number of team cards.
    async fn process_tournament(&mut self, tournament: &str) -> Result<usize, ProcessError> {
        log::info!("Processing tournament: {}", tournament);
        let page = get_raw_page(self.source, &self.config.proxy_prefix, tournament).await?;

        let cards = roster::team_cards(page.text());
        for card in &cards {
            self.teams.push(card.team.clone());
            for slot in &card.players {
                self.ledger.record(slot, &card.team, tournament);
            }
        }
        log::debug!("{}: {} team cards", tournament, cards.len());
        Ok(cards.len())
    }

    async fn fetch_roster(&self, team: &str) -> Result<Roster, ProcessError> {
        let page = get_raw_page(self.source, &self.config.proxy_prefix, team).await?;
        Ok(roster::roster(page.text()))
    }

    /// Fetch each distinct team once. A failed team gets an empty roster.
    async fn fetch_rosters(&mut self) {
        let teams = self.teams.iter().unique().cloned().collect_vec();

        let mut fetched = Vec::with_capacity(teams.len());
        for team in teams {
            let result = match self.fetch_roster(&team).await {
                Ok(roster) => {
                    if roster.is_empty() {
                        log::debug!("No person entries on {}", team);
                    }
                    let size = roster.len();
                    self.rosters.insert(team, roster);
                    Ok(size)
                }
                Err(e) => {
                    log::warn!("Failed to fetch roster of {}: {}", team, e);
                    self.rosters.insert(team, Roster::default());
                    Err(e)
                }
            };
            fetched.push(result);
            tokio::time::sleep(self.config.team_delay).await;
        }
        count_processed(&fetched, "fetch_roster");
    }

    /// Does any team the player appeared for list them with a Chinese flag?
    fn has_chinese_roster_flag(&self, record: &PlayerRecord) -> bool {
        let id = title_key(&record.title);
        record.appearances.iter().any(|appearance| {
            self.rosters
                .get(&appearance.team)
                .and_then(|roster| roster.flag(&id))
                .is_some_and(is_chinese_flag)
        })
    }

    /// One profile page load, delayed and retried on rate limiting.
    async fn fetch_profile_page(&self, title: &str) -> Result<WikiText, ProcessError> {
        let source = self.source;
        let config = self.config;
        config
            .profile_retry
            .run(
                title,
                move |_| async move {
                    tokio::time::sleep(config.profile_delay).await;
                    get_raw_page(source, &config.proxy_prefix, title).await
                },
                ProcessError::is_rate_limited,
            )
            .await
    }

    /// Countries on the player's profile, following redirects.
    ///
    /// Cycles, a missing redirect target or running out of hops all give no
    /// countries rather than an error.
    async fn fetch_player_countries(&self, title: &str) -> Result<Vec<String>, ProcessError> {
        let mut current = title_key(title);
        let mut visited = HashSet::from([current.clone()]);
        let mut hops = 0;

        loop {
            let page = self.fetch_profile_page(&current).await?;
            let target = match page.get_redirect() {
                Ok(None) => return Ok(page_countries(&page)),
                Ok(Some(target)) => target,
                Err(e) => {
                    log::warn!(
                        "[{}] unusable redirect on {:?}: {}",
                        e.kind(),
                        page.page_name(),
                        e
                    );
                    return Ok(vec![]);
                }
            };

            if !visited.insert(target.clone()) {
                log::warn!("Redirect cycle: {} -> {}", current, target);
                return Ok(vec![]);
            }
            if hops >= self.config.max_redirect_hops {
                log::warn!(
                    "Gave up on {} after {} redirects",
                    title,
                    self.config.max_redirect_hops
                );
                return Ok(vec![]);
            }
            hops += 1;
            log::debug!("Following redirect {} -> {}", current, target);
            current = target;
        }
    }

    async fn classify(&self, record: &PlayerRecord) -> Result<bool, ProcessError> {
        if self.has_chinese_roster_flag(record) {
            return Ok(true);
        }
        let countries = self.fetch_player_countries(&record.title).await?;
        Ok(is_chinese_country(&countries))
    }
}
