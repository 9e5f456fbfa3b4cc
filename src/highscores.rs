//! High score leaderboard
//!
//! Persisted as plain text, one `name;score` line per entry, best first.
//! Ties on score are ordered by name.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of entries kept
pub const MAX_SCORES: usize = 200;
/// Longest stored name, in bytes
pub const MAX_NAME_LEN: usize = 31;
/// Stand-in for an empty name
pub const DEFAULT_NAME: &str = "Player";

#[derive(Debug, Error)]
pub enum ScoreTableError {
    #[error("score table I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    /// Build an entry with a storable name: separators and line breaks are
    /// dropped, the result is cut to [`MAX_NAME_LEN`] bytes and an empty name
    /// becomes [`DEFAULT_NAME`]
    pub fn new(name: &str, score: u32) -> Self {
        Self {
            name: clean_name(name),
            score,
        }
    }
}

fn clean_name(name: &str) -> String {
    let mut clean: String = name
        .chars()
        .filter(|c| !matches!(c, ';' | '\n' | '\r'))
        .collect::<String>()
        .trim()
        .to_string();

    if clean.len() > MAX_NAME_LEN {
        let mut cut = MAX_NAME_LEN;
        while !clean.is_char_boundary(cut) {
            cut -= 1;
        }
        clean.truncate(cut);
    }

    if clean.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        clean
    }
}

/// Leaderboard, sorted by score descending then name ascending
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreTable {
    entries: Vec<ScoreEntry>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best `n` entries
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Check if a score would make it onto the table
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Rank a score would get (1-indexed, placed after equal scores), None if it doesn't qualify
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a result. Below capacity it is always kept; a full table only
    /// swaps out its worst entry for a strictly better score.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add(&mut self, name: &str, score: u32) -> Option<usize> {
        self.add_entry(ScoreEntry::new(name, score))
    }

    pub fn add_entry(&mut self, entry: ScoreEntry) -> Option<usize> {
        let entry = ScoreEntry::new(&entry.name, entry.score);
        if self.entries.len() < MAX_SCORES {
            self.entries.push(entry.clone());
        } else {
            match self.entries.last_mut() {
                Some(worst) if entry.score > worst.score => *worst = entry.clone(),
                _ => return None,
            }
        }
        self.insertion_sort();
        self.entries.iter().position(|e| *e == entry).map(|i| i + 1)
    }

    /// Stable: equal entries keep their relative order
    fn insertion_sort(&mut self) {
        for i in 1..self.entries.len() {
            let mut j = i;
            while j > 0 && ranks_before(&self.entries[j], &self.entries[j - 1]) {
                self.entries.swap(j, j - 1);
                j -= 1;
            }
        }
    }

    /// Parse the text format. Blank lines are skipped; entries past
    /// [`MAX_SCORES`] are dropped.
    pub fn parse(text: &str) -> Result<Self, ScoreTableError> {
        let mut table = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parse_err = |reason: &str| ScoreTableError::Parse {
                line: index + 1,
                reason: reason.to_string(),
            };
            let (name, score) = line.rsplit_once(';').ok_or_else(|| parse_err("missing ';' separator"))?;
            let score: u32 = score
                .trim()
                .parse()
                .map_err(|e| parse_err(&format!("bad score {score:?}: {e}")))?;

            if table.entries.len() < MAX_SCORES {
                table.entries.push(ScoreEntry::new(name, score));
            }
        }
        table.insertion_sort();
        Ok(table)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            out.push_str(&format!("{};{}\n", e.name, e.score));
        }
        out
    }

    /// Load from disk; a missing file is an empty table
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreTableError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No score table at {}, starting fresh", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };
        let table = Self::parse(&text)?;
        log::info!("Loaded {} scores from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreTableError> {
        let path = path.as_ref();
        fs::write(path, self.to_text())?;
        log::info!("Score table saved ({} entries) to {}", self.len(), path.display());
        Ok(())
    }
}

fn ranks_before(a: &ScoreEntry, b: &ScoreEntry) -> bool {
    a.score > b.score || (a.score == b.score && a.name < b.name)
}
