use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display};

use crate::reqwest_client::RustError;

/// One player slot on a team card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Display name with markup removed.
    pub name: String,
    /// Page title of the player, underscores instead of spaces.
    pub link: String,
}

/// A team's entry on a tournament page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCard {
    pub team: String,
    pub players: Vec<PlayerSlot>,
}

/// Player id -> lowercased flag code, as listed on one team's page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster(pub HashMap<String, String>);

impl Roster {
    pub fn insert(&mut self, id: String, flag: String) {
        self.0.insert(id, flag);
    }

    pub fn flag(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerAppearance {
    pub tournament: String,
    pub team: String,
}

/// Everything known about one player page while the run is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    pub title: String,
    pub appearances: Vec<PlayerAppearance>,
}

/// Player records keyed by page title, kept in first-seen order.
#[derive(Debug, Default)]
pub struct PlayerLedger {
    records: Vec<PlayerRecord>,
    index: HashMap<String, usize>,
}

impl PlayerLedger {
    /// Append an appearance for `slot`, creating the record on first sight.
    ///
    /// The display name is taken from the first slot seen for a title.
    pub fn record(&mut self, slot: &PlayerSlot, team: &str, tournament: &str) {
        let idx = *self.index.entry(slot.link.clone()).or_insert_with(|| {
            self.records.push(PlayerRecord {
                name: slot.name.clone(),
                title: slot.link.clone(),
                appearances: vec![],
            });
            self.records.len() - 1
        });
        self.records[idx].appearances.push(PlayerAppearance {
            tournament: tournament.to_owned(),
            team: team.to_owned(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug)]
pub enum ProcessError {
    Reqwest(RustError),
    Url(url::ParseError),
    Process(String),
}

impl ProcessError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProcessError::Reqwest(e) if e.is_rate_limited())
    }
}

impl Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessError::Reqwest(e) => write!(f, "{}", e),
            ProcessError::Url(e) => write!(f, "invalid url: {}", e),
            ProcessError::Process(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

impl From<RustError> for ProcessError {
    fn from(value: RustError) -> Self {
        Self::Reqwest(value)
    }
}
impl From<reqwest::Error> for ProcessError {
    fn from(value: reqwest::Error) -> Self {
        Self::Reqwest(RustError::from(value))
    }
}
impl From<url::ParseError> for ProcessError {
    fn from(value: url::ParseError) -> Self {
        Self::Url(value)
    }
}
impl From<String> for ProcessError {
    fn from(value: String) -> Self {
        Self::Process(value)
    }
}
impl From<&str> for ProcessError {
    fn from(value: &str) -> Self {
        Self::Process(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, link: &str) -> PlayerSlot {
        PlayerSlot {
            name: name.to_string(),
            link: link.to_string(),
        }
    }

    #[test]
    fn ledger_keeps_first_seen_order_and_appends() {
        let mut ledger = PlayerLedger::default();
        ledger.record(&slot("Ame", "Ame"), "Xtreme Gaming", "TI/2025");
        ledger.record(&slot("NothingToSay", "NothingToSay"), "Xtreme Gaming", "TI/2025");
        ledger.record(&slot("Ame (alt)", "Ame"), "Xtreme Gaming", "BLAST/Slam/3");

        assert_eq!(ledger.len(), 2);
        let titles: Vec<&str> = ledger.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Ame", "NothingToSay"]);

        let ame = ledger.iter().find(|r| r.title == "Ame").unwrap();
        assert_eq!(ame.name, "Ame");
        assert_eq!(
            ame.appearances,
            vec![
                PlayerAppearance {
                    tournament: "TI/2025".into(),
                    team: "Xtreme Gaming".into()
                },
                PlayerAppearance {
                    tournament: "BLAST/Slam/3".into(),
                    team: "Xtreme Gaming".into()
                },
            ]
        );
    }

    #[test]
    fn roster_lookup() {
        let mut roster = Roster::default();
        assert!(roster.is_empty());
        roster.insert("Ame".into(), "cn".into());
        assert_eq!(roster.flag("Ame"), Some("cn"));
        assert_eq!(roster.flag("Somnus"), None);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn process_error_rate_limit_passthrough() {
        let err: ProcessError = "boom".into();
        assert!(!err.is_rate_limited());
        assert_eq!(err.to_string(), "boom");
    }
}
