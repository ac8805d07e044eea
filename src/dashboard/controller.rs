use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use crate::config::DashboardConfig;
use crate::dashboard::trend::goal_trend;
use crate::data::api::FootballApi;
use crate::data::error::{ClientError, ClientResult};
use crate::data::types::{LeagueStats, MatchRecord, Stats};
use crate::render::{ChartKind, ChartSpec, Message, MessageKind, Renderer};
use crate::scheduler::ScheduledTask;

pub mod ids {
    pub const CURRENT_TIME: &str = "currentTime";
    pub const LAST_UPDATE: &str = "lastUpdate";
    pub const TOTAL_MATCHES: &str = "totalMatches";
    pub const AVG_GOALS: &str = "avgGoals";
    pub const AVG_CORNERS: &str = "avgCorners";
    pub const AVG_YELLOW_CARDS: &str = "avgYellowCards";
    pub const LEAGUE_CHART: &str = "leagueChart";
    pub const TREND_CHART: &str = "trendChart";
    pub const MATCHES_TABLE: &str = "matchesTable";
    pub const LOADING_OVERLAY: &str = "loadingOverlay";
}

// Not computed from data; the stats endpoint has no corner/card averages.
pub const PLACEHOLDER_AVG_CORNERS: &str = "5.2";
pub const PLACEHOLDER_AVG_YELLOW_CARDS: &str = "2.8";

const LOAD_ERROR: &str = "Failed to load data, please refresh and retry";
const ERROR_LIFETIME: Duration = Duration::from_secs(5);

pub struct DashboardController<A: FootballApi, R: Renderer> {
    api: Arc<A>,
    renderer: Arc<R>,
    config: DashboardConfig,
    refresh: Option<ScheduledTask>,
    clock: Option<ScheduledTask>,
    overlay: Option<ScheduledTask>,
    charts: Vec<&'static str>,
}

impl<A: FootballApi, R: Renderer> DashboardController<A, R> {
    pub fn new(api: Arc<A>, renderer: Arc<R>, config: DashboardConfig) -> Self {
        Self {
            api,
            renderer,
            config,
            refresh: None,
            clock: None,
            overlay: None,
            charts: Vec::new(),
        }
    }

    /// Clock, initial load, auto-refresh, then hide the loading overlay
    pub async fn start(&mut self) -> ClientResult<()> {
        info!("Starting dashboard");

        update_time(self.renderer.as_ref());
        let renderer = self.renderer.clone();
        self.clock = Some(ScheduledTask::every(
            "clock",
            self.config.clock_interval(),
            move || {
                let renderer = renderer.clone();
                async move { update_time(renderer.as_ref()) }
            },
        ));

        let loaded = self.load_initial_data().await;

        self.start_auto_refresh();

        let renderer = self.renderer.clone();
        self.overlay = Some(ScheduledTask::after(
            "loading overlay",
            self.config.overlay_delay(),
            move || async move { renderer.set_visible(ids::LOADING_OVERLAY, false) },
        ));

        loaded
    }

    /// Fetch stats, leagues and matches together and update each view that
    /// came back. Any transport failure raises one error message.
    pub async fn load_initial_data(&mut self) -> ClientResult<()> {
        let (stats, leagues, matches) = tokio::join!(
            self.api.stats(),
            self.api.leagues(),
            self.api.matches(),
        );

        let mut failed = Vec::new();
        let mut transport_failed = false;

        match stats {
            Ok(stats) => render_stats(self.renderer.as_ref(), &stats),
            Err(e) => {
                transport_failed |= e.is_network();
                warn!("Stats unavailable: {}", e);
                failed.push("stats");
            }
        }

        match leagues {
            Ok(leagues) => {
                debug!("League stats: {:?}", leagues);
                self.render_league_chart(&leagues);
            }
            Err(e) => {
                transport_failed |= e.is_network();
                warn!("League stats unavailable: {}", e);
                failed.push("leagues");
            }
        }

        match matches {
            Ok(matches) => {
                self.render_matches_table(&matches);
                self.render_trend_chart(&matches);
            }
            Err(e) => {
                transport_failed |= e.is_network();
                warn!("Matches unavailable: {}", e);
                failed.push("matches");
            }
        }

        if transport_failed {
            error!("Dashboard load failed for: {}", failed.join(", "));
            self.renderer.show_message(&Message::new(MessageKind::Error, LOAD_ERROR, ERROR_LIFETIME));
        } else {
            set_last_update(self.renderer.as_ref());
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ClientError::PartialData(failed.join(", ")))
        }
    }

    fn render_league_chart(&mut self, leagues: &LeagueStats) {
        let chart = ChartSpec {
            kind: ChartKind::Doughnut,
            title: "League match distribution".to_string(),
            series_label: None,
            labels: leagues.keys().cloned().collect(),
            values: leagues.values().map(|l| l.match_count as f64).collect(),
        };
        self.draw_chart(ids::LEAGUE_CHART, &chart);
    }

    fn render_trend_chart(&mut self, matches: &[MatchRecord]) {
        let trend = goal_trend(matches, self.config.trend_window, self.config.trend_days);
        let chart = ChartSpec {
            kind: ChartKind::Line,
            title: "Recent match trend".to_string(),
            series_label: Some("Avg goals per match".to_string()),
            labels: trend.iter().map(|p| p.label().to_string()).collect(),
            values: trend.iter().map(|p| p.avg_goals).collect(),
        };
        self.draw_chart(ids::TREND_CHART, &chart);
    }

    fn draw_chart(&mut self, id: &'static str, chart: &ChartSpec) {
        if self.charts.contains(&id) {
            self.renderer.release_chart(id);
        } else {
            self.charts.push(id);
        }
        self.renderer.render_chart(id, chart);
    }

    fn render_matches_table(&self, matches: &[MatchRecord]) {
        let rows: Vec<Vec<String>> = matches
            .iter()
            .take(self.config.table_rows)
            .map(|m| {
                vec![
                    m.league.clone(),
                    m.date_only().get(5..).unwrap_or(m.date_only()).to_string(),
                    m.home_team.clone(),
                    format!("{}-{}", m.home_goals, m.away_goals),
                    m.away_team.clone(),
                    format!("{}-{}", m.home_corners, m.away_corners),
                    format!("{}-{}", m.home_yellow_cards, m.away_yellow_cards),
                ]
            })
            .collect();

        self.renderer.render_list(ids::MATCHES_TABLE, &rows);
    }

    /// Re-fetch stats on a timer; failures are logged and left for the next tick
    fn start_auto_refresh(&mut self) {
        let api = self.api.clone();
        let renderer = self.renderer.clone();

        self.refresh = Some(ScheduledTask::every(
            "stats refresh",
            self.config.refresh_interval(),
            move || {
                let api = api.clone();
                let renderer = renderer.clone();
                async move {
                    match api.stats().await {
                        Ok(stats) => {
                            render_stats(renderer.as_ref(), &stats);
                            set_last_update(renderer.as_ref());
                        }
                        Err(e) => warn!("Auto refresh failed: {}", e),
                    }
                }
            },
        ));
    }

    pub fn is_running(&self) -> bool {
        self.refresh.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Stop the timers and release chart handles
    pub fn shutdown(&mut self) {
        for mut task in [self.refresh.take(), self.clock.take(), self.overlay.take()]
            .into_iter()
            .flatten()
        {
            task.cancel();
        }

        for id in self.charts.drain(..) {
            self.renderer.release_chart(id);
        }
        info!("Dashboard shut down");
    }
}

fn render_stats<R: Renderer + ?Sized>(renderer: &R, stats: &Stats) {
    renderer.set_text(ids::TOTAL_MATCHES, &format_thousands(stats.total_matches));
    renderer.set_text(ids::AVG_GOALS, &stats.avg_goals_per_match.to_string());
    renderer.set_text(ids::AVG_CORNERS, PLACEHOLDER_AVG_CORNERS);
    renderer.set_text(ids::AVG_YELLOW_CARDS, PLACEHOLDER_AVG_YELLOW_CARDS);
}

fn update_time<R: Renderer + ?Sized>(renderer: &R) {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    renderer.set_text(ids::CURRENT_TIME, &now);
}

fn set_last_update<R: Renderer + ?Sized>(renderer: &R) {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    renderer.set_text(ids::LAST_UPDATE, &now);
}

/// `12345` -> `12,345`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{LeagueSummary, PredictionRequest, PredictionResult, TeamHistoryEntry};
    use crate::render::recording::RecordingRenderer;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time;

    #[derive(Clone, Copy, PartialEq)]
    enum Outcome {
        Ok,
        Api,
        Network,
    }

    struct FakeApi {
        stats: Outcome,
        leagues: Outcome,
        matches: Outcome,
        stats_calls: AtomicUsize,
        total_matches: AtomicUsize,
    }

    impl FakeApi {
        fn new(stats: Outcome, leagues: Outcome, matches: Outcome) -> Self {
            Self {
                stats,
                leagues,
                matches,
                stats_calls: AtomicUsize::new(0),
                total_matches: AtomicUsize::new(1234),
            }
        }

        fn fail<T>(outcome: Outcome) -> ClientResult<T> {
            match outcome {
                Outcome::Network => Err(ClientError::Network("connection refused".to_string())),
                _ => Err(ClientError::Api("boom".to_string())),
            }
        }
    }

    fn record(league: &str, date: &str, home: u32, away: u32) -> MatchRecord {
        MatchRecord {
            id: None,
            league: league.to_string(),
            date: date.to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            home_goals: home,
            away_goals: away,
            home_corners: 6,
            away_corners: 4,
            home_yellow_cards: 2,
            away_yellow_cards: 1,
        }
    }

    impl FootballApi for FakeApi {
        async fn stats(&self) -> ClientResult<Stats> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            if self.stats != Outcome::Ok {
                return Self::fail(self.stats);
            }
            Ok(Stats {
                total_matches: self.total_matches.load(Ordering::SeqCst) as u64,
                avg_goals_per_match: 2.75,
                total_goals: 0,
                league_distribution: BTreeMap::new(),
                system_status: None,
                last_update: None,
            })
        }

        async fn leagues(&self) -> ClientResult<LeagueStats> {
            if self.leagues != Outcome::Ok {
                return Self::fail(self.leagues);
            }
            let mut map = BTreeMap::new();
            for (name, count) in [("La Liga", 10), ("Premier League", 30)] {
                map.insert(
                    name.to_string(),
                    LeagueSummary {
                        match_count: count,
                        avg_goals: 2.5,
                        avg_corners: 9.0,
                        avg_yellow_cards: 3.0,
                        latest_match_date: None,
                    },
                );
            }
            Ok(map)
        }

        async fn matches(&self) -> ClientResult<Vec<MatchRecord>> {
            if self.matches != Outcome::Ok {
                return Self::fail(self.matches);
            }
            Ok((0..12)
                .map(|i| record("PL", &format!("2024-03-{:02} 15:00", 12 - i), i, 1))
                .collect())
        }

        async fn teams(&self) -> ClientResult<Vec<String>> {
            Ok(vec![])
        }

        async fn predict(&self, _request: &PredictionRequest) -> ClientResult<PredictionResult> {
            Err(ClientError::Api("unused".to_string()))
        }

        async fn team_history(&self, _team: &str) -> ClientResult<Vec<TeamHistoryEntry>> {
            Ok(vec![])
        }
    }

    fn controller(api: FakeApi) -> (DashboardController<FakeApi, RecordingRenderer>, Arc<FakeApi>, Arc<RecordingRenderer>) {
        let api = Arc::new(api);
        let renderer = Arc::new(RecordingRenderer::new());
        let dashboard = DashboardController::new(api.clone(), renderer.clone(), DashboardConfig::default());
        (dashboard, api, renderer)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[tokio::test]
    async fn test_full_load_updates_every_view() {
        let (mut dashboard, _api, renderer) = controller(FakeApi::new(Outcome::Ok, Outcome::Ok, Outcome::Ok));

        dashboard.load_initial_data().await.unwrap();

        assert_eq!(renderer.text(ids::TOTAL_MATCHES).as_deref(), Some("1,234"));
        assert_eq!(renderer.text(ids::AVG_GOALS).as_deref(), Some("2.75"));
        assert_eq!(renderer.text(ids::AVG_CORNERS).as_deref(), Some("5.2"));
        assert_eq!(renderer.text(ids::AVG_YELLOW_CARDS).as_deref(), Some("2.8"));
        assert!(renderer.text(ids::LAST_UPDATE).is_some());

        let league = renderer.chart(ids::LEAGUE_CHART).unwrap();
        assert_eq!(league.kind, ChartKind::Doughnut);
        assert_eq!(league.labels, vec!["La Liga", "Premier League"]);
        assert_eq!(league.values, vec![10.0, 30.0]);

        let trend = renderer.chart(ids::TREND_CHART).unwrap();
        assert_eq!(trend.kind, ChartKind::Line);
        assert_eq!(trend.labels.len(), 10);
        assert_eq!(trend.labels.first().unwrap(), "03-03");
        assert_eq!(trend.labels.last().unwrap(), "03-12");

        let rows = renderer.list(ids::MATCHES_TABLE).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], vec!["PL", "03-12", "Home", "0-1", "Away", "6-4", "2-1"]);

        assert!(renderer.errors().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_shows_single_error_and_keeps_partial_views() {
        let (mut dashboard, _api, renderer) =
            controller(FakeApi::new(Outcome::Ok, Outcome::Network, Outcome::Network));

        let err = dashboard.load_initial_data().await.unwrap_err();

        assert!(matches!(err, ClientError::PartialData(ref s) if s == "leagues, matches"));
        assert_eq!(renderer.errors(), vec![LOAD_ERROR.to_string()]);
        assert_eq!(renderer.text(ids::TOTAL_MATCHES).as_deref(), Some("1,234"));
        assert!(renderer.chart(ids::LEAGUE_CHART).is_none());
        assert!(renderer.text(ids::LAST_UPDATE).is_none());
    }

    #[tokio::test]
    async fn test_api_error_only_skips_that_widget() {
        let (mut dashboard, _api, renderer) =
            controller(FakeApi::new(Outcome::Api, Outcome::Ok, Outcome::Ok));

        assert!(dashboard.load_initial_data().await.is_err());

        assert!(renderer.errors().is_empty());
        assert!(renderer.text(ids::TOTAL_MATCHES).is_none());
        assert!(renderer.chart(ids::LEAGUE_CHART).is_some());
        assert!(renderer.chart(ids::TREND_CHART).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_refresh_fetches_stats_every_interval() {
        let (mut dashboard, api, renderer) = controller(FakeApi::new(Outcome::Ok, Outcome::Ok, Outcome::Ok));

        dashboard.start().await.unwrap();
        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 1);

        api.total_matches.store(2000, Ordering::SeqCst);
        time::sleep(Duration::from_secs(30)).await;
        settle().await;

        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 2);
        assert_eq!(renderer.text(ids::TOTAL_MATCHES).as_deref(), Some("2,000"));
        assert_eq!(renderer.visible(ids::LOADING_OVERLAY), Some(false));

        dashboard.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_failure_is_skipped_silently() {
        let (mut dashboard, api, renderer) =
            controller(FakeApi::new(Outcome::Network, Outcome::Ok, Outcome::Ok));

        let _ = dashboard.start().await;
        assert_eq!(renderer.errors().len(), 1);

        time::sleep(Duration::from_secs(61)).await;
        settle().await;

        assert_eq!(api.stats_calls.load(Ordering::SeqCst), 3);
        assert_eq!(renderer.errors().len(), 1);

        dashboard.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_timers_and_releases_charts() {
        let (mut dashboard, api, renderer) = controller(FakeApi::new(Outcome::Ok, Outcome::Ok, Outcome::Ok));

        dashboard.start().await.unwrap();
        assert!(dashboard.is_running());

        dashboard.shutdown();
        dashboard.shutdown();

        assert!(!dashboard.is_running());
        assert!(renderer.released(ids::LEAGUE_CHART));
        assert!(renderer.released(ids::TREND_CHART));

        let calls = api.stats_calls.load(Ordering::SeqCst);
        let clock_ticks = renderer
            .events()
            .iter()
            .filter(|e| matches!(e, crate::render::recording::Event::Text(id, _) if id == ids::CURRENT_TIME))
            .count();

        time::sleep(Duration::from_secs(120)).await;
        settle().await;

        assert_eq!(api.stats_calls.load(Ordering::SeqCst), calls);
        let clock_after = renderer
            .events()
            .iter()
            .filter(|e| matches!(e, crate::render::recording::Event::Text(id, _) if id == ids::CURRENT_TIME))
            .count();
        assert_eq!(clock_after, clock_ticks);
    }
}
