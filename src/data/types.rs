use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use crate::data::error::ClientError;

/// `{success, data | error}` wrapper used by every endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, ClientError> {
        self.into_result_or("request failed")
    }

    /// Like `into_result`, with `fallback` used when a failure carries no message
    pub fn into_result_or(self, fallback: &str) -> Result<T, ClientError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(ClientError::Api("response carried no data".to_string())),
            (false, _) => Err(ClientError::Api(
                self.error.unwrap_or_else(|| fallback.to_string()),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub league: String,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    #[serde(default)]
    pub home_corners: u32,
    #[serde(default)]
    pub away_corners: u32,
    #[serde(default)]
    pub home_yellow_cards: u32,
    #[serde(default)]
    pub away_yellow_cards: u32,
}

impl MatchRecord {
    pub fn total_goals(&self) -> u32 {
        self.home_goals + self.away_goals
    }

    /// Calendar part of `date`: everything before the first space or `T`
    pub fn date_only(&self) -> &str {
        self.date
            .split(|c: char| c == ' ' || c == 'T')
            .next()
            .unwrap_or(&self.date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub total_matches: u64,
    pub avg_goals_per_match: f64,
    #[serde(default)]
    pub total_goals: u64,
    #[serde(default)]
    pub league_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub system_status: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeagueSummary {
    pub match_count: u64,
    #[serde(default)]
    pub avg_goals: f64,
    #[serde(default)]
    pub avg_corners: f64,
    #[serde(default)]
    pub avg_yellow_cards: f64,
    #[serde(default)]
    pub latest_match_date: Option<String>,
}

pub type LeagueStats = BTreeMap<String, LeagueSummary>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionRequest {
    pub league: String,
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Prediction {
    pub home_team_goals: f64,
    pub away_team_goals: f64,
    pub total_goals: f64,
    pub home_corners: f64,
    pub away_corners: f64,
    pub total_corners: f64,
    pub home_yellow_cards: f64,
    pub away_yellow_cards: f64,
    pub total_yellow_cards: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub prediction: Prediction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Past prediction kept in the local history list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "胜" | "W" | "w" | "win" | "Win" => Some(MatchOutcome::Win),
            "平" | "D" | "d" | "draw" | "Draw" => Some(MatchOutcome::Draw),
            "负" | "L" | "l" | "loss" | "Loss" => Some(MatchOutcome::Loss),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::Win => "W",
            MatchOutcome::Draw => "D",
            MatchOutcome::Loss => "L",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamHistoryEntry {
    pub date: String,
    pub league: String,
    pub opponent: String,
    pub role: String,
    pub score: String,
    pub result: String,
    #[serde(default)]
    pub shots: u32,
    #[serde(default)]
    pub shots_on_target: u32,
    #[serde(default)]
    pub possession: f64,
    #[serde(default)]
    pub team_corners: u32,
    #[serde(default)]
    pub team_yellow_cards: u32,
}

impl TeamHistoryEntry {
    pub fn outcome(&self) -> Option<MatchOutcome> {
        MatchOutcome::from_tag(&self.result)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamHistoryResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub matches: Vec<TeamHistoryEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_true() -> bool { true }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success() {
        let env: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"success": true, "data": ["A", "B"]}"#).unwrap();
        assert_eq!(env.into_result().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_envelope_error_carries_server_message() {
        let env: Envelope<Stats> =
            serde_json::from_str(r#"{"success": false, "error": "model not loaded"}"#).unwrap();
        match env.into_result() {
            Err(ClientError::Api(msg)) => assert_eq!(msg, "model not loaded"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_date_only() {
        let mut m: MatchRecord = serde_json::from_str(
            r#"{"league":"PL","date":"2024-03-02 15:00","home_team":"A","away_team":"B",
                "home_goals":2,"away_goals":1}"#,
        )
        .unwrap();
        assert_eq!(m.date_only(), "2024-03-02");
        assert_eq!(m.total_goals(), 3);

        m.date = "2024-03-02T15:00:00".to_string();
        assert_eq!(m.date_only(), "2024-03-02");

        m.date = "2024-03-02".to_string();
        assert_eq!(m.date_only(), "2024-03-02");
    }

    #[test]
    fn test_outcome_tags() {
        assert_eq!(MatchOutcome::from_tag("胜"), Some(MatchOutcome::Win));
        assert_eq!(MatchOutcome::from_tag("平"), Some(MatchOutcome::Draw));
        assert_eq!(MatchOutcome::from_tag("L"), Some(MatchOutcome::Loss));
        assert_eq!(MatchOutcome::from_tag("?"), None);
    }

    #[test]
    fn test_history_entry_flattens_result() {
        let entry = HistoryEntry {
            result: PredictionResult {
                league: "PL".to_string(),
                home_team: "A".to_string(),
                away_team: "B".to_string(),
                prediction: Prediction::default(),
                timestamp: None,
            },
            captured_at: Utc::now(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["home_team"], "A");
        assert!(json["prediction"].is_object());
        assert!(json["captured_at"].is_string());
    }
}
