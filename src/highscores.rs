//! High score leaderboard and the score bridge
//!
//! The simulation reports every finished run through [`ScoreSink`]; the
//! leaderboard keeps the top 10. Storing the serialized board is left to the
//! embedding frontend.

use serde::{Deserialize, Serialize};

use crate::config::Difficulty;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Nickname recorded when the player never set one
pub const DEFAULT_NICKNAME: &str = "Anonymous";

/// Receives the final score of each run, once per game over
pub trait ScoreSink {
    fn save_score(&mut self, score: u64, difficulty: Difficulty);
}

/// Discards every score
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ScoreSink for NoopSink {
    fn save_score(&mut self, _score: u64, _difficulty: Difficulty) {}
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub nickname: String,
    pub score: u64,
    pub difficulty: Difficulty,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    /// Nickname attached to scores saved through the sink
    #[serde(default = "default_nickname")]
    pub player_name: String,
}

fn default_nickname() -> String {
    DEFAULT_NICKNAME.to_string()
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            player_name: default_nickname(),
        }
    }

    /// Restore a leaderboard saved with [`HighScores::to_json`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Nickname for future entries; blank names fall back to the default
    pub fn set_player_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.player_name = if trimmed.is_empty() {
            default_nickname()
        } else {
            trimmed.to_string()
        };
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, nickname: &str, score: u64, difficulty: Difficulty, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            log::debug!("Score {} did not make the leaderboard", score);
            return None;
        }

        let entry = HighScoreEntry {
            nickname: nickname.to_string(),
            score,
            difficulty,
            timestamp,
        };

        // Find insertion point (sorted descending by score, ties keep arrival order)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best entry recorded at `difficulty`
    pub fn best_for(&self, difficulty: Difficulty) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.difficulty == difficulty)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl ScoreSink for HighScores {
    fn save_score(&mut self, score: u64, difficulty: Difficulty) {
        let name = self.player_name.clone();
        if let Some(rank) = self.add_score(&name, score, difficulty, now_ms()) {
            log::info!("{} scored {} on {} (rank {})", name, score, difficulty.as_str(), rank);
        }
    }
}

/// Wall-clock time in ms since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Format a timestamp relative to `now` ("Just now", "3 mins ago", ...)
pub fn format_age(timestamp: f64, now: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        match diff_days.floor() as i64 {
            1 => "Yesterday".to_string(),
            days => format!("{} days ago", days),
        }
    } else if diff_hours >= 1.0 {
        match diff_hours.floor() as i64 {
            1 => "1 hour ago".to_string(),
            hours => format!("{} hours ago", hours),
        }
    } else if diff_mins >= 1.0 {
        match diff_mins.floor() as i64 {
            1 => "1 min ago".to_string(),
            mins => format!("{} mins ago", mins),
        }
    } else {
        "Just now".to_string()
    }
}
