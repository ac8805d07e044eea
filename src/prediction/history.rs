use chrono::{DateTime, Local, Utc};
use tracing::{info, warn};
use crate::data::error::ClientResult;
use crate::data::types::{HistoryEntry, PredictionResult};
use crate::storage::KeyValueStore;

pub const HISTORY_KEY: &str = "predictionHistory";

/// Past predictions, newest first, never longer than `capacity`
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionHistory {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl PredictionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Read the stored list; a missing or unreadable value gives an empty history
    pub fn load(store: &dyn KeyValueStore, capacity: usize) -> Self {
        let mut history = Self::new(capacity);

        let raw = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return history,
            Err(e) => {
                warn!("Could not read prediction history: {}", e);
                return history;
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(capacity);
                info!("Loaded {} past predictions", entries.len());
                history.entries = entries;
            }
            Err(e) => warn!("Discarding unreadable prediction history: {}", e),
        }

        history
    }

    /// Rewrite the whole stored list
    pub fn save(&self, store: &dyn KeyValueStore) -> ClientResult<()> {
        let json = serde_json::to_string(&self.entries)?;
        store.put(HISTORY_KEY, &json)
    }

    pub fn push(&mut self, result: PredictionResult, captured_at: DateTime<Utc>) {
        self.entries.insert(0, HistoryEntry { result, captured_at });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display rows: match, predicted score, local capture time
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| {
                let r = &entry.result;
                vec![
                    format!("{} vs {}", r.home_team, r.away_team),
                    format!(
                        "Predicted score: {}-{}",
                        r.prediction.home_team_goals, r.prediction.away_team_goals
                    ),
                    entry
                        .captured_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                ]
            })
            .collect()
    }
}
