use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::sleep;

use crate::error::AppError;

use super::{FetchResult, HttpResponse, Transport};

pub(crate) const BASE: &str = "http://stub/pub/player";

#[derive(Clone)]
struct Route {
    status: StatusCode,
    body: String,
    delay: Duration,
}

/// In-memory upstream: canned replies per URL, unknown URLs fail like a refused connection.
#[derive(Default)]
pub(crate) struct StubTransport {
    routes: HashMap<String, Route>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    completed: AtomicUsize,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn route(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.insert(path, status, body.into(), Duration::ZERO);
        self
    }

    pub(crate) fn delayed_route(
        mut self,
        path: &str,
        status: u16,
        body: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.insert(path, status, body.into(), delay);
        self
    }

    fn insert(&mut self, path: &str, status: u16, body: String, delay: Duration) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.routes
            .insert(format!("{BASE}{path}"), Route { status, body, delay });
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Requests that ran to the end of their delay and produced a reply.
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl Transport for StubTransport {
    async fn get(&self, url: &str) -> FetchResult<HttpResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        let route = self.routes.get(url).cloned();

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        let delay = route.as_ref().map(|r| r.delay).unwrap_or_default();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);

        match route {
            Some(route) => Ok(HttpResponse::new(route.status, route.body)),
            None => Err(AppError::Network(
                "Network error: connection refused".to_string(),
            )),
        }
    }
}

/// JSON body for a month of games; each tuple is (white, white rating, black, black rating, end_time, time_class).
pub(crate) fn games_body(games: &[(&str, i64, &str, i64, i64, &str)]) -> String {
    let games: Vec<serde_json::Value> = games
        .iter()
        .map(|(white, white_rating, black, black_rating, end_time, class)| {
            serde_json::json!({
                "white": {"username": white, "rating": white_rating},
                "black": {"username": black, "rating": black_rating},
                "end_time": end_time,
                "time_class": class,
            })
        })
        .collect();
    serde_json::json!({ "games": games }).to_string()
}

pub(crate) fn archives_body(username: &str, periods: &[(i32, u32)]) -> String {
    let archives: Vec<String> = periods
        .iter()
        .map(|(year, month)| format!("{BASE}/{username}/games/{year}/{month:02}"))
        .collect();
    serde_json::json!({ "archives": archives }).to_string()
}
