use crate::{APP_DIR_NAME, debug_log};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const WINS_KEY: &str = "wins";
pub const LOSSES_KEY: &str = "losses";
const STATS_FILE_NAME: &str = "stats.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub wins: u32,
    pub losses: u32,
}

impl SessionStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins = self.wins.saturating_add(1),
            Outcome::Loss => self.losses = self.losses.saturating_add(1),
        }
    }

    pub fn rounds_finished(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("failed to write stats to '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode stats: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistence seam for the win/loss counters.
pub trait StatsStore {
    /// Never fails: unreadable or malformed counters read as zero.
    fn load(&self) -> SessionStats;

    /// Bumps one counter and persists it, returning the stored totals.
    fn increment(&mut self, outcome: Outcome) -> Result<SessionStats, StatsError>;
}

/// Counters that live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    stats: SessionStats,
}

impl MemoryStatsStore {
    pub fn new(stats: SessionStats) -> Self {
        Self { stats }
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> SessionStats {
        self.stats
    }

    fn increment(&mut self, outcome: Outcome) -> Result<SessionStats, StatsError> {
        self.stats.record(outcome);
        Ok(self.stats)
    }
}

/// Counters stored as a small JSON object: `{"wins": 3, "losses": 1}`.
#[derive(Debug, Clone)]
pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/hangbrain/stats.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(STATS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, stats: &SessionStats) -> Result<(), StatsError> {
        let io_error = |source| StatsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let contents = serde_json::to_string_pretty(stats)?;
        fs::write(&self.path, contents).map_err(io_error)
    }
}

impl StatsStore for FileStatsStore {
    fn load(&self) -> SessionStats {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug_log!("No stats at {}: {}", self.path.display(), e);
                return SessionStats::default();
            }
        };
        parse_stats(&contents)
    }

    fn increment(&mut self, outcome: Outcome) -> Result<SessionStats, StatsError> {
        let mut stats = self.load();
        stats.record(outcome);
        self.save(&stats)?;
        Ok(stats)
    }
}

/// Each counter is read on its own, so one bad value does not zero the other.
pub fn parse_stats(contents: &str) -> SessionStats {
    let Ok(value) = serde_json::from_str::<Value>(contents) else {
        log::warn!("Stats file is not valid JSON; starting from zero");
        return SessionStats::default();
    };
    SessionStats {
        wins: read_counter(&value, WINS_KEY),
        losses: read_counter(&value, LOSSES_KEY),
    }
}

fn read_counter(value: &Value, key: &str) -> u32 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}
