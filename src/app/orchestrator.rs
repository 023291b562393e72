use std::sync::Arc;

use log::{error, info};

use crate::cache::Cache;
use crate::config::{CalendarZone, Config};
use crate::error::{AppError, Result};
use crate::fetch::{ArchiveLister, Endpoints, FetchScheduler, ProfileCache, ProfileLookup, Transport};
use crate::records::{aggregate_daily, extract_observations, Mode};

use super::RatingChart;

/// Finished charts keyed by [`cache_key`].
pub type ResultCache = Cache<String, Arc<RatingChart>>;

pub const GENERIC_FAILURE: &str = "An unexpected error occurred.";

/// What the presentation layer receives: a chart, or a message safe to show.
#[derive(Debug, Clone)]
pub enum ChartOutcome {
    Ready(Arc<RatingChart>),
    Failed(String),
}

pub fn cache_key(username: &str, mode: Mode) -> String {
    format!("{username}_{mode}")
}

/// Runs profile check, archive listing, concurrent month fetch, extraction and
/// aggregation, then maps failures to user-facing outcomes.
pub struct Orchestrator<T> {
    transport: Arc<T>,
    endpoints: Arc<Endpoints>,
    profiles: Arc<ProfileCache>,
    results: Arc<ResultCache>,
    concurrency_limit: usize,
    calendar: CalendarZone,
}

impl<T: Transport + 'static> Orchestrator<T> {
    pub fn new(
        config: &Config,
        transport: Arc<T>,
        profiles: Arc<ProfileCache>,
        results: Arc<ResultCache>,
    ) -> Self {
        Self {
            transport,
            endpoints: Arc::new(Endpoints::new(config.http.api_base_url.as_str())),
            profiles,
            results,
            concurrency_limit: config.concurrency_limit,
            calendar: config.calendar,
        }
    }

    /// Serve from the result cache when fresh, otherwise build and cache the chart.
    pub async fn chart_for(&self, username: &str, mode: Mode) -> ChartOutcome {
        let key = cache_key(username, mode);
        if let Some(chart) = self.results.get(&key) {
            info!("Cache hit for {key}");
            return ChartOutcome::Ready(chart);
        }

        match self.build_chart(username, mode).await {
            Ok(chart) => {
                let chart = Arc::new(chart);
                self.results.set(key, Arc::clone(&chart));
                ChartOutcome::Ready(chart)
            }
            Err(err) => ChartOutcome::Failed(user_message(&err)),
        }
    }

    pub async fn build_chart(&self, username: &str, mode: Mode) -> Result<RatingChart> {
        let transport = self.transport.as_ref();

        ProfileLookup::new(transport, &self.endpoints, &self.profiles)
            .lookup(username)
            .await?;

        let periods = ArchiveLister::new(transport, &self.endpoints)
            .list_periods(username)
            .await?;
        if periods.is_empty() {
            return Err(AppError::empty("No games found for this user."));
        }

        info!("Fetching {} months of data for {username}", periods.len());
        let scheduler = FetchScheduler::with_concurrency_limit(
            Arc::clone(&self.transport),
            Arc::clone(&self.endpoints),
            self.concurrency_limit,
        );
        let games = scheduler.fetch_all(username, &periods, mode).await;

        let observations = extract_observations(&games, username, self.calendar)?;
        if observations.is_empty() {
            return Err(AppError::empty(format!(
                "No {mode} games found for {username}."
            )));
        }
        info!("Found {} {mode} games for {username}", observations.len());

        let bars = aggregate_daily(&observations)?;
        Ok(RatingChart::new(username, mode, bars))
    }
}

fn user_message(err: &AppError) -> String {
    if err.is_user_facing() {
        err.to_string()
    } else {
        error!("Unexpected error: {err}");
        GENERIC_FAILURE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::{archives_body, games_body, StubTransport, BASE};
    use crate::records::DailyBar;
    use chrono::NaiveDate;
    use std::time::Duration;

    const PROFILE: &str = r#"{"username": "alice", "player_id": 1}"#;

    fn orchestrator(transport: StubTransport) -> (Orchestrator<StubTransport>, Arc<StubTransport>) {
        let mut config = Config::builtin();
        config.http.api_base_url = BASE.to_string();
        config.calendar = CalendarZone::Utc;

        let transport = Arc::new(transport);
        let orchestrator = Orchestrator::new(
            &config,
            Arc::clone(&transport),
            Arc::new(ProfileCache::lru(8)),
            Arc::new(ResultCache::ttl(config.cache.result_ttl)),
        );
        (orchestrator, transport)
    }

    fn failure(outcome: ChartOutcome) -> String {
        match outcome {
            ChartOutcome::Failed(message) => message,
            ChartOutcome::Ready(chart) => panic!("expected failure, got {chart:?}"),
        }
    }

    fn ready(outcome: ChartOutcome) -> Arc<RatingChart> {
        match outcome {
            ChartOutcome::Ready(chart) => chart,
            ChartOutcome::Failed(message) => panic!("expected chart, got {message}"),
        }
    }

    #[tokio::test]
    async fn missing_user_stops_before_archives() {
        let (orch, transport) = orchestrator(StubTransport::new().route("/ghost", 404, ""));

        let message = failure(orch.chart_for("ghost", Mode::Blitz).await);
        assert_eq!(message, "User not found.");
        assert_eq!(transport.calls(), vec![format!("{BASE}/ghost")]);
    }

    #[tokio::test]
    async fn empty_archive_skips_fetching() {
        let (orch, transport) = orchestrator(
            StubTransport::new()
                .route("/alice", 200, PROFILE)
                .route("/alice/games/archives", 200, r#"{"archives": []}"#),
        );

        let message = failure(orch.chart_for("alice", Mode::Blitz).await);
        assert_eq!(message, "No games found for this user.");
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn all_months_failing_reports_no_games_of_mode() {
        let (orch, _) = orchestrator(
            StubTransport::new()
                .route("/alice", 200, PROFILE)
                .route(
                    "/alice/games/archives",
                    200,
                    archives_body("alice", &[(2024, 1), (2024, 2)]),
                )
                .route("/alice/games/2024/01", 500, "")
                .route("/alice/games/2024/02", 502, ""),
        );

        let message = failure(orch.chart_for("alice", Mode::Bullet).await);
        assert_eq!(message, "No bullet games found for alice.");
    }

    #[tokio::test]
    async fn archive_failure_is_reported_as_network_error() {
        let (orch, _) = orchestrator(
            StubTransport::new()
                .route("/alice", 200, PROFILE)
                .route("/alice/games/archives", 503, "upstream trace"),
        );

        let message = failure(orch.chart_for("alice", Mode::Blitz).await);
        assert_eq!(message, "API error: 503");
    }

    #[tokio::test]
    async fn malformed_archive_hides_internal_detail() {
        let (orch, _) = orchestrator(
            StubTransport::new()
                .route("/alice", 200, PROFILE)
                .route(
                    "/alice/games/archives",
                    200,
                    r#"{"archives": ["https://x/games/not-a-month"]}"#,
                ),
        );

        let message = failure(orch.chart_for("alice", Mode::Blitz).await);
        assert_eq!(message, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn builds_gap_filled_chart_and_caches_it() {
        // 2024-01-01 10:00, 2024-01-03 09:00 and 21:00 UTC.
        let (orch, transport) = orchestrator(
            StubTransport::new()
                .route("/alice", 200, PROFILE)
                .route(
                    "/alice/games/archives",
                    200,
                    archives_body("alice", &[(2023, 12), (2024, 1)]),
                )
                .route("/alice/games/2023/12", 404, "")
                .route(
                    "/alice/games/2024/01",
                    200,
                    games_body(&[
                        ("Alice", 1000, "bob", 990, 1_704_103_200, "blitz"),
                        ("bob", 1000, "alice", 1040, 1_704_272_400, "blitz"),
                        ("alice", 1050, "carol", 1100, 1_704_315_600, "blitz"),
                        ("alice", 1500, "dave", 1400, 1_704_200_000, "rapid"),
                    ]),
                ),
        );

        let chart = ready(orch.chart_for("alice", Mode::Blitz).await);
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(chart.title, "Blitz Rating History");
        assert_eq!(
            chart.bars,
            vec![
                DailyBar::flat(day(1), 1000),
                DailyBar::flat(day(2), 1000),
                DailyBar {
                    date: day(3),
                    open: 1040,
                    high: 1050,
                    low: 1040,
                    close: 1050,
                },
            ]
        );

        let calls_after_first = transport.call_count();
        let again = ready(orch.chart_for("alice", Mode::Blitz).await);
        assert!(Arc::ptr_eq(&chart, &again));
        assert_eq!(transport.call_count(), calls_after_first);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (orch, transport) = orchestrator(StubTransport::new().route("/ghost", 404, ""));

        failure(orch.chart_for("ghost", Mode::Rapid).await);
        failure(orch.chart_for("ghost", Mode::Rapid).await);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn abandoned_request_lets_month_fetches_finish() {
        let (orch, transport) = orchestrator(
            StubTransport::new()
                .route("/alice", 200, PROFILE)
                .route(
                    "/alice/games/archives",
                    200,
                    archives_body("alice", &[(2024, 1), (2024, 2)]),
                )
                .delayed_route(
                    "/alice/games/2024/01",
                    200,
                    games_body(&[("alice", 1200, "bob", 1100, 1_704_103_200, "blitz")]),
                    Duration::from_millis(100),
                )
                .delayed_route(
                    "/alice/games/2024/02",
                    200,
                    games_body(&[("alice", 1210, "bob", 1100, 1_706_781_600, "blitz")]),
                    Duration::from_millis(100),
                ),
        );

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), orch.chart_for("alice", Mode::Blitz))
                .await;
        assert!(abandoned.is_err());
        // Profile and archive list have answered; both months are still sleeping.
        assert_eq!(transport.completed(), 2);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(transport.completed(), 4);
        assert!(orch.results.get(&cache_key("alice", Mode::Blitz)).is_none());
    }
}
