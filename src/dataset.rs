use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, SecondsFormat, Utc};
use feruca::Collator;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::definitions::{PlayerAppearance, PlayerRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPlayer {
    pub name: String,
    pub title: String,
    pub tournaments: Vec<PlayerAppearance>,
}

/// The file the rest of the world reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub updated_at: String,
    pub players: Vec<DatasetPlayer>,
}

impl Dataset {
    /// Build the dataset from the Chinese players, sorted by display name.
    ///
    /// Names are ordered with the root Unicode collation: letters first, then
    /// accents, then case, with code points breaking any remaining tie.
    pub fn assemble(records: Vec<PlayerRecord>, generated: DateTime<Utc>) -> Self {
        let mut players = records
            .into_iter()
            .map(|record| DatasetPlayer {
                name: record.name,
                title: record.title,
                tournaments: record.appearances,
            })
            .collect_vec();
        let mut collator = Collator::default();
        players.sort_by(|a, b| collator.collate(&a.name, &b.name));

        Self {
            updated_at: generated.to_rfc3339_opts(SecondsFormat::Millis, true),
            players,
        }
    }

    /// Final log line of a run: `Saved N players to <path>`.
    pub fn saved_line(&self, path: &Path) -> String {
        format!("Saved {} players to {}", self.players.len(), path.display())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the dataset to `path`, replacing it only once the new file is complete.
    pub fn write_to_file(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = PathBuf::from(path);
        let mut name = path
            .file_name()
            .ok_or_else(|| format!("{} is not a file path", path.display()))?
            .to_os_string();
        name.push(".tmp");
        tmp.set_file_name(name);

        fs::write(&tmp, self.to_json()?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
