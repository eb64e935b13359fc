//! High score leaderboard and best-score bridge
//!
//! Each game keeps a best score (stringified integer) and a top-5 table of
//! `{initials, score}` under versioned LocalStorage keys.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_or_default, save_json};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Maximum initials length
pub const INITIALS_LEN: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Up to three upper-case characters
    pub initials: String,
    pub score: u64,
}

/// Top-5 leaderboard, sorted by score descending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
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

    /// Insert a score. Ties go after existing entries.
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, initials: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            initials: initials.to_string(),
            score,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Repair a table read from storage: sort and trim
    fn normalized(mut self) -> Self {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
        self
    }
}

/// Clean up typed initials: trimmed, upper-cased, at most three characters.
///
/// Returns `None` when nothing is left (the player skipped the prompt).
pub fn normalize_initials(raw: &str) -> Option<String> {
    let initials: String = raw
        .trim()
        .chars()
        .flat_map(char::to_uppercase)
        .take(INITIALS_LEN)
        .collect();
    if initials.is_empty() {
        None
    } else {
        Some(initials)
    }
}

/// Where a game's scores go at terminal transitions
pub trait ScoreBridge {
    /// Record a finished game. The best score always updates; the table only
    /// when `initials` is non-empty. Returns the table rank if inserted.
    fn record(&mut self, initials: &str, score: u64) -> Option<usize>;

    /// Highest score ever recorded
    fn best(&self) -> u64;

    /// Current leaderboard
    fn table(&self) -> &HighScores;
}

/// Storage keys for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreKeys {
    pub best: String,
    pub table: String,
}

impl ScoreKeys {
    /// `tenebris_<game>_best_v1` / `tenebris_<game>_table_v1`
    pub fn for_game(game: &str) -> Self {
        Self {
            best: format!("tenebris_{}_best_v1", game),
            table: format!("tenebris_{}_table_v1", game),
        }
    }
}

/// Score bridge persisted through a [`KeyValueStore`]
pub struct PersistentScores<S: KeyValueStore> {
    store: S,
    keys: ScoreKeys,
    best: u64,
    table: HighScores,
}

impl<S: KeyValueStore> PersistentScores<S> {
    /// Load a game's scores; malformed data is discarded for defaults
    pub fn load(store: S, game: &str) -> Self {
        let keys = ScoreKeys::for_game(game);

        let stored_best = match store.get(&keys.best) {
            Ok(Some(raw)) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                log::warn!("Discarding malformed best score {:?}", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Could not read best score: {}", e);
                0
            }
        };
        let table = load_or_default::<HighScores>(&store, &keys.table).normalized();
        let best = stored_best.max(table.top_score().unwrap_or(0));

        log::info!(
            "Loaded {} scores (best {}, {} entries)",
            game,
            best,
            table.len()
        );
        Self {
            store,
            keys,
            best,
            table,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.set(&self.keys.best, &self.best.to_string()) {
            log::warn!("Could not save best score: {}", e);
        }
        if let Err(e) = save_json(&mut self.store, &self.keys.table, &self.table) {
            log::warn!("Could not save leaderboard: {}", e);
        }
    }
}

impl<S: KeyValueStore> ScoreBridge for PersistentScores<S> {
    fn record(&mut self, initials: &str, score: u64) -> Option<usize> {
        self.best = self.best.max(score);
        let rank = normalize_initials(initials).and_then(|i| self.table.add_score(&i, score));
        self.persist();
        log::info!("Recorded {} (rank {:?}, best {})", score, rank, self.best);
        rank
    }

    fn best(&self) -> u64 {
        self.best
    }

    fn table(&self) -> &HighScores {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_table_sorted_and_capped() {
        let mut table = HighScores::new();
        for (i, score) in [30, 10, 50, 20, 40, 60].into_iter().enumerate() {
            table.add_score(&format!("P{}", i), score);
        }
        let scores: Vec<u64> = table.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![60, 50, 40, 30, 20]);
        assert!(!table.qualifies(20));
        assert!(table.qualifies(21));
        assert_eq!(table.potential_rank(55), Some(2));
    }

    #[test]
    fn test_tie_ranks_after_existing() {
        let mut table = HighScores::new();
        table.add_score("AAA", 10);
        assert_eq!(table.add_score("BBB", 10), Some(2));
        assert_eq!(table.entries[0].initials, "AAA");
    }

    #[test]
    fn test_normalize_initials() {
        assert_eq!(normalize_initials("  abcd "), Some("ABC".to_string()));
        assert_eq!(normalize_initials("jo"), Some("JO".to_string()));
        assert_eq!(normalize_initials("   "), None);
        assert_eq!(normalize_initials(""), None);
    }

    #[test]
    fn test_table_json_shape() {
        let mut table = HighScores::new();
        table.add_score("ZED", 42);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"initials":"ZED","score":42}]"#);
    }

    #[test]
    fn test_record_persists() {
        let mut scores = PersistentScores::load(MemoryStore::new(), "snake");
        assert_eq!(scores.record("abc", 12), Some(1));
        assert_eq!(scores.best(), 12);

        let store = scores.store().clone();
        assert_eq!(
            store.get("tenebris_snake_best_v1").unwrap().as_deref(),
            Some("12")
        );
        let reloaded = PersistentScores::load(store, "snake");
        assert_eq!(reloaded.best(), 12);
        assert_eq!(reloaded.table().entries[0].initials, "ABC");
    }

    #[test]
    fn test_empty_initials_skip_table() {
        let mut scores = PersistentScores::load(MemoryStore::new(), "breakout");
        assert_eq!(scores.record("", 300), None);
        assert!(scores.table().is_empty());
        assert_eq!(scores.best(), 300);
    }

    #[test]
    fn test_best_is_maximum_ever() {
        let mut scores = PersistentScores::load(MemoryStore::new(), "breakout");
        scores.record("AAA", 300);
        scores.record("BBB", 100);
        assert_eq!(scores.best(), 300);
    }

    #[test]
    fn test_malformed_storage_discarded() {
        let mut store = MemoryStore::new();
        store.set("tenebris_breakout_best_v1", "lots").unwrap();
        store.set("tenebris_breakout_table_v1", "{oops").unwrap();
        let scores = PersistentScores::load(store, "breakout");
        assert_eq!(scores.best(), 0);
        assert!(scores.table().is_empty());
    }

    #[test]
    fn test_unsorted_storage_repaired() {
        let mut store = MemoryStore::new();
        store
            .set(
                "tenebris_snake_table_v1",
                r#"[{"initials":"A","score":1},{"initials":"B","score":9},{"initials":"C","score":5},
                   {"initials":"D","score":2},{"initials":"E","score":3},{"initials":"F","score":4}]"#,
            )
            .unwrap();
        let scores = PersistentScores::load(store, "snake");
        let got: Vec<u64> = scores.table().entries.iter().map(|e| e.score).collect();
        assert_eq!(got, vec![9, 5, 4, 3, 2]);
        assert_eq!(scores.best(), 9);
    }

    proptest! {
        #[test]
        fn prop_table_sorted_and_bounded(scores in prop::collection::vec(0u64..10_000, 0..40)) {
            let mut table = HighScores::new();
            for s in scores {
                table.add_score("XYZ", s);
                prop_assert!(table.len() <= MAX_HIGH_SCORES);
                prop_assert!(table.entries.windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}
