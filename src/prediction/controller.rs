use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use crate::config::PredictionConfig;
use crate::data::api::FootballApi;
use crate::data::error::{ClientError, ClientResult};
use crate::data::types::{PredictionResult, TeamHistoryEntry};
use crate::prediction::analysis::analyze;
use crate::prediction::history::PredictionHistory;
use crate::prediction::validation::{validate_form, PredictionForm};
use crate::render::{Message, MessageKind, Renderer};
use crate::scheduler::ScheduledTask;
use crate::storage::KeyValueStore;

pub mod ids {
    pub const TEAMS_LIST: &str = "teamsList";
    pub const HOME_TEAM_INPUT: &str = "homeTeam";
    pub const AWAY_TEAM_INPUT: &str = "awayTeam";
    pub const RESULTS_SECTION: &str = "resultsSection";
    pub const RESULT_HOME_TEAM: &str = "resultHomeTeam";
    pub const RESULT_AWAY_TEAM: &str = "resultAwayTeam";
    pub const RESULT_LEAGUE: &str = "resultLeague";
    pub const HOME_GOALS: &str = "homeGoals";
    pub const AWAY_GOALS: &str = "awayGoals";
    pub const TOTAL_GOALS: &str = "totalGoals";
    pub const HOME_CORNERS: &str = "homeCorners";
    pub const AWAY_CORNERS: &str = "awayCorners";
    pub const TOTAL_CORNERS: &str = "totalCorners";
    pub const HOME_YELLOW: &str = "homeYellow";
    pub const AWAY_YELLOW: &str = "awayYellow";
    pub const TOTAL_YELLOW: &str = "totalYellow";
    pub const ANALYSIS: &str = "analysisContent";
    pub const HISTORY_LIST: &str = "historyList";
    pub const TEAM_HISTORY_SECTION: &str = "teamHistorySection";
    pub const HOME_TEAM_TITLE: &str = "homeTeamTitle";
    pub const AWAY_TEAM_TITLE: &str = "awayTeamTitle";
    pub const HOME_TEAM_MATCHES: &str = "homeTeamMatches";
    pub const AWAY_TEAM_MATCHES: &str = "awayTeamMatches";
    pub const LOADING_OVERLAY: &str = "loadingOverlay";
}

const MESSAGE_LIFETIME: Duration = Duration::from_secs(3);
const NETWORK_ERROR: &str = "Network error, please try again later";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionPhase {
    Idle,
    Validating,
    Fetching,
    Success,
    Failed,
}

pub struct PredictionController<A: FootballApi, R: Renderer> {
    api: Arc<A>,
    renderer: Arc<R>,
    store: Box<dyn KeyValueStore>,
    config: PredictionConfig,
    history: PredictionHistory,
    teams: Vec<String>,
    phase: PredictionPhase,
    last_outcome: Option<PredictionPhase>,
    result_showing: bool,
    overlay: Option<ScheduledTask>,
}

impl<A: FootballApi, R: Renderer> PredictionController<A, R> {
    pub fn new(
        api: Arc<A>,
        renderer: Arc<R>,
        store: Box<dyn KeyValueStore>,
        config: PredictionConfig,
    ) -> Self {
        let history = PredictionHistory::new(config.history_capacity);
        Self {
            api,
            renderer,
            store,
            config,
            history,
            teams: Vec::new(),
            phase: PredictionPhase::Idle,
            last_outcome: None,
            result_showing: false,
            overlay: None,
        }
    }

    /// Arm the overlay timer and show the stored history, then load the team
    /// list; a team-list retry does not hold up the rest of the form
    pub async fn start(&mut self) {
        info!("Starting prediction form");

        let renderer = self.renderer.clone();
        self.overlay = Some(ScheduledTask::after(
            "loading overlay",
            self.config.overlay_delay(),
            move || async move { renderer.set_visible(ids::LOADING_OVERLAY, false) },
        ));

        self.load_history();

        // Failures are already surfaced to the user
        let _ = self.load_teams().await;
    }

    /// Fetch the team names; a transport failure is retried once after a delay
    pub async fn load_teams(&mut self) -> ClientResult<&[String]> {
        match self.fetch_teams().await {
            Err(e) if e.is_network() => {
                info!("Retrying team list in {:?}", self.config.team_retry_delay());
                tokio::time::sleep(self.config.team_retry_delay()).await;
                self.fetch_teams().await?;
            }
            other => other?,
        }
        Ok(&self.teams)
    }

    async fn fetch_teams(&mut self) -> ClientResult<()> {
        debug!("Loading team list");
        match self.api.teams().await {
            Ok(teams) => {
                info!("Loaded {} teams", teams.len());
                let rows: Vec<Vec<String>> = teams.iter().map(|t| vec![t.clone()]).collect();
                self.renderer.render_list(ids::TEAMS_LIST, &rows);
                self.teams = teams;
                Ok(())
            }
            Err(e) if e.is_network() => {
                error!("Failed to load team list: {}", e);
                self.error_message(format!("Failed to load team list: {}", e));
                Err(e)
            }
            Err(e) => {
                error!("Unexpected team list response: {}", e);
                self.error_message("Team data format error");
                Err(e)
            }
        }
    }

    pub fn load_history(&mut self) {
        self.history = PredictionHistory::load(self.store.as_ref(), self.config.history_capacity);
        self.render_history();
    }

    /// Validate, fetch both team histories and the prediction together, then
    /// show and record the result
    pub async fn predict(&mut self, form: &PredictionForm) -> ClientResult<PredictionResult> {
        self.set_phase(PredictionPhase::Validating);
        let request = match validate_form(form) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected prediction input: {}", e);
                self.error_message(e.to_string());
                self.set_phase(PredictionPhase::Idle);
                return Err(e.into());
            }
        };

        self.set_phase(PredictionPhase::Fetching);
        self.renderer.set_busy(true);
        self.renderer.set_visible(ids::TEAM_HISTORY_SECTION, true);
        self.renderer.set_text(ids::HOME_TEAM_TITLE, &format!("{} recent form", request.home_team));
        self.renderer.set_text(ids::AWAY_TEAM_TITLE, &format!("{} recent form", request.away_team));

        let (home_history, away_history, prediction) = tokio::join!(
            self.api.team_history(&request.home_team),
            self.api.team_history(&request.away_team),
            self.api.predict(&request),
        );

        self.show_team_history(ids::HOME_TEAM_MATCHES, &request.home_team, home_history);
        self.show_team_history(ids::AWAY_TEAM_MATCHES, &request.away_team, away_history);

        let outcome = match prediction {
            Ok(result) => {
                info!(
                    "Prediction {} vs {}: {}-{}",
                    result.home_team,
                    result.away_team,
                    result.prediction.home_team_goals,
                    result.prediction.away_team_goals
                );
                self.display_result(&result);
                self.add_to_history(result.clone());
                self.renderer.show_message(&Message::new(
                    MessageKind::Success,
                    "Prediction complete!",
                    MESSAGE_LIFETIME,
                ));
                self.set_phase(PredictionPhase::Success);
                Ok(result)
            }
            Err(ClientError::Api(msg)) => {
                error!("Prediction rejected: {}", msg);
                self.error_message(msg.clone());
                self.set_phase(PredictionPhase::Failed);
                Err(ClientError::Api(msg))
            }
            Err(e) => {
                error!("Prediction request failed: {}", e);
                self.error_message(NETWORK_ERROR);
                self.set_phase(PredictionPhase::Failed);
                Err(e)
            }
        };

        self.renderer.set_busy(false);
        self.set_phase(PredictionPhase::Idle);
        outcome
    }

    fn show_team_history(&self, container: &str, team: &str, history: ClientResult<Vec<TeamHistoryEntry>>) {
        let matches = history.unwrap_or_else(|e| {
            warn!("Team history for {} unavailable: {}", team, e);
            Vec::new()
        });

        if matches.is_empty() {
            self.renderer.render_list(container, &[vec!["No match data for this team".to_string()]]);
            return;
        }

        let rows: Vec<Vec<String>> = matches
            .iter()
            .map(|m| {
                vec![
                    m.date.get(5..10).unwrap_or(&m.date).to_string(),
                    m.league.clone(),
                    format!("{} ({}) vs {}", team, m.role, m.opponent),
                    m.score.clone(),
                    m.outcome().map(|o| o.label()).unwrap_or(m.result.as_str()).to_string(),
                    format!("Shots {}", m.shots),
                    format!("On target {}", m.shots_on_target),
                    format!("Possession {}%", m.possession.round()),
                    format!("Corners {}", m.team_corners),
                    format!("Yellow {}", m.team_yellow_cards),
                ]
            })
            .collect();

        self.renderer.render_list(container, &rows);
    }

    fn display_result(&mut self, result: &PredictionResult) {
        let r = self.renderer.as_ref();
        let p = &result.prediction;

        r.set_visible(ids::RESULTS_SECTION, true);
        r.set_text(ids::RESULT_HOME_TEAM, &result.home_team);
        r.set_text(ids::RESULT_AWAY_TEAM, &result.away_team);
        r.set_text(ids::RESULT_LEAGUE, &result.league);

        for (id, value) in [
            (ids::HOME_GOALS, p.home_team_goals),
            (ids::AWAY_GOALS, p.away_team_goals),
            (ids::TOTAL_GOALS, p.total_goals),
            (ids::HOME_CORNERS, p.home_corners),
            (ids::AWAY_CORNERS, p.away_corners),
            (ids::TOTAL_CORNERS, p.total_corners),
            (ids::HOME_YELLOW, p.home_yellow_cards),
            (ids::AWAY_YELLOW, p.away_yellow_cards),
            (ids::TOTAL_YELLOW, p.total_yellow_cards),
        ] {
            r.set_text(id, &value.to_string());
        }

        let rows: Vec<Vec<String>> = analyze(p)
            .points(&result.home_team, &result.away_team, p)
            .into_iter()
            .map(|point| vec![point.heading.to_string(), point.text])
            .collect();
        r.render_list(ids::ANALYSIS, &rows);

        self.result_showing = true;
    }

    fn add_to_history(&mut self, result: PredictionResult) {
        self.history.push(result, Utc::now());
        if let Err(e) = self.history.save(self.store.as_ref()) {
            error!("Failed to persist prediction history: {}", e);
        }
        self.render_history();
    }

    fn render_history(&self) {
        if self.history.is_empty() {
            self.renderer
                .render_list(ids::HISTORY_LIST, &[vec!["No prediction history yet".to_string()]]);
        } else {
            self.renderer.render_list(ids::HISTORY_LIST, &self.history.rows());
        }
    }

    pub fn clear_form(&mut self) {
        self.renderer.set_text(ids::HOME_TEAM_INPUT, "");
        self.renderer.set_text(ids::AWAY_TEAM_INPUT, "");
        self.renderer.set_visible(ids::RESULTS_SECTION, false);
        self.result_showing = false;
    }

    pub fn new_prediction(&mut self) {
        self.clear_form();
        self.renderer.focus(ids::HOME_TEAM_INPUT);
    }

    pub fn share_prediction(&self) {
        if self.result_showing {
            self.renderer.show_message(&Message::new(
                MessageKind::Info,
                "Sharing is not available yet",
                MESSAGE_LIFETIME,
            ));
        } else {
            self.error_message("Make a prediction first");
        }
    }

    fn error_message(&self, text: impl Into<String>) {
        self.renderer
            .show_message(&Message::new(MessageKind::Error, text, MESSAGE_LIFETIME));
    }

    fn set_phase(&mut self, phase: PredictionPhase) {
        debug!("Prediction phase {:?} -> {:?}", self.phase, phase);
        if matches!(phase, PredictionPhase::Success | PredictionPhase::Failed) {
            self.last_outcome = Some(phase);
        }
        self.phase = phase;
    }

    pub fn phase(&self) -> PredictionPhase {
        self.phase
    }

    /// Success or Failed for the most recent attempt that reached the network
    pub fn last_outcome(&self) -> Option<PredictionPhase> {
        self.last_outcome
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn shutdown(&mut self) {
        if let Some(mut overlay) = self.overlay.take() {
            overlay.cancel();
        }
    }
}
