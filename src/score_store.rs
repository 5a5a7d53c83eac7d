use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{HIGH_SCORE_LIMIT, HIGH_SCORE_NAME_LEN};
use crate::error::ScoreStoreError;

const FILE_VERSION: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    #[serde(rename = "recordedAt", alias = "recorded_at")]
    pub recorded_at: String,
}

#[derive(Clone, Debug, Serialize)]
struct ScoreFile<'a> {
    version: u8,
    entries: &'a [HighScoreEntry],
}

#[derive(Clone, Debug, Deserialize)]
struct ScoreFileRaw {
    version: u8,
    entries: Vec<serde_json::Value>,
}

/// Persistent top-ten table of three-letter names.
pub struct ScoreStore {
    file_path: PathBuf,
    entries: Vec<HighScoreEntry>,
}

impl ScoreStore {
    pub fn new(file_path: PathBuf) -> Self {
        let entries = load_entries(&file_path);
        Self { file_path, entries }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < HIGH_SCORE_LIMIT {
            return true;
        }
        self.entries
            .last()
            .map(|lowest| score > lowest.score)
            .unwrap_or(true)
    }

    /// Inserts the score, saves the table and returns the rank (0-based) if
    /// the entry survived truncation.
    pub fn record(&mut self, name: &str, score: u32) -> Result<Option<usize>, ScoreStoreError> {
        let name = normalize_name(name).ok_or(ScoreStoreError::EmptyName)?;
        let entry = HighScoreEntry {
            name,
            score,
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        // after every existing entry with an equal or better score
        let rank = self
            .entries
            .iter()
            .position(|existing| existing.score < score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(HIGH_SCORE_LIMIT);
        self.save()?;
        Ok((rank < HIGH_SCORE_LIMIT).then_some(rank))
    }

    pub fn save(&self) -> Result<(), ScoreStoreError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ScoreStoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = ScoreFile {
            version: FILE_VERSION,
            entries: &self.entries,
        };
        let text = serde_json::to_string_pretty(&payload)?;
        fs::write(&self.file_path, text).map_err(|source| ScoreStoreError::Io {
            path: self.file_path.clone(),
            source,
        })
    }
}

/// Uppercase, letters and digits only, at most three characters.
pub fn normalize_name(name: &str) -> Option<String> {
    let normalized: String = name
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_uppercase())
        .take(HIGH_SCORE_NAME_LEN)
        .collect();
    (!normalized.is_empty()).then_some(normalized)
}

fn load_entries(path: &Path) -> Vec<HighScoreEntry> {
    let text = match fs::read_to_string(path) {
        Ok(value) => value,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), %error, "failed to read score file");
            }
            return Vec::new();
        }
    };
    let parsed = match serde_json::from_str::<ScoreFileRaw>(&text) {
        Ok(value) if value.version == FILE_VERSION => value,
        Ok(value) => {
            warn!(path = %path.display(), version = value.version, "unsupported score file version");
            return Vec::new();
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "failed to parse score file");
            return Vec::new();
        }
    };

    let mut entries: Vec<HighScoreEntry> = parsed
        .entries
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<HighScoreEntry>(raw) {
            Ok(entry) => sanitize_entry(entry),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping malformed score entry");
                None
            }
        })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(HIGH_SCORE_LIMIT);
    entries
}

fn sanitize_entry(entry: HighScoreEntry) -> Option<HighScoreEntry> {
    let name = normalize_name(&entry.name)?;
    Some(HighScoreEntry { name, ..entry })
}
