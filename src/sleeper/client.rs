use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{League, Matchup, Roster, ScheduleMatchup, User};
use super::provider::LeagueProvider;

/// Failure talking to the fantasy API. Every variant names the endpoint path.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}")]
    Status { endpoint: String, status: StatusCode },
    #[error("failed to decode {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Client for the Sleeper read-only league API.
#[derive(Clone)]
pub struct SleeperClient {
    http: Client,
    base_url: String,
    league_id: String,
}

impl SleeperClient {
    pub fn new(base_url: &str, league_id: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(SleeperClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            league_id: league_id.to_string(),
        })
    }

    pub fn league_id(&self) -> &str {
        &self.league_id
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                endpoint: path.to_string(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                endpoint: path.to_string(),
                status: resp.status(),
            });
        }

        resp.json::<T>().await.map_err(|source| FetchError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl LeagueProvider for SleeperClient {
    async fn users(&self) -> Result<Vec<User>, FetchError> {
        self.get_json(&format!("/league/{}/users", self.league_id)).await
    }

    async fn rosters(&self) -> Result<Vec<Roster>, FetchError> {
        self.get_json(&format!("/league/{}/rosters", self.league_id)).await
    }

    async fn league(&self) -> Result<League, FetchError> {
        self.get_json(&format!("/league/{}", self.league_id)).await
    }

    async fn matchups(&self, week: u32) -> Result<Vec<Matchup>, FetchError> {
        self.get_json(&format!("/league/{}/matchups/{}", self.league_id, week))
            .await
    }

    async fn user(&self, user_id: &str) -> Result<User, FetchError> {
        self.get_json(&format!("/user/{}", user_id)).await
    }

    async fn schedule(&self) -> Result<Vec<ScheduleMatchup>, FetchError> {
        let by_week: BTreeMap<String, Vec<ScheduleMatchup>> = self
            .get_json(&format!("/league/{}/schedule", self.league_id))
            .await?;
        Ok(flatten_schedule(by_week))
    }

    fn name(&self) -> &str {
        "Sleeper"
    }
}

/// The schedule payload is keyed by week number as a string.
fn flatten_schedule(by_week: BTreeMap<String, Vec<ScheduleMatchup>>) -> Vec<ScheduleMatchup> {
    let mut all: Vec<ScheduleMatchup> = by_week.into_values().flatten().collect();
    all.sort_by_key(|m| (m.week, m.roster_id));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Json, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base: &str) -> SleeperClient {
        SleeperClient::new(base, "42", Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_users_and_matchups() {
        let app = Router::new()
            .route(
                "/league/42/users",
                get(|| async {
                    Json(serde_json::json!([
                        {"user_id": "u1", "display_name": "Alice", "avatar": "abc"},
                        {"user_id": "u2", "display_name": "Bob"}
                    ]))
                }),
            )
            .route(
                "/league/42/matchups/:week",
                get(|Path(week): Path<u32>| async move {
                    Json(serde_json::json!([
                        {"roster_id": 1, "matchup_id": 1, "points": 100.5 + week as f64},
                        {"roster_id": 2, "matchup_id": 1, "points": 90.0}
                    ]))
                }),
            );
        let base = serve(app).await;
        let c = client(&base);

        let users = c.users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].avatar.as_deref(), Some("abc"));

        let matchups = c.matchups(3).await.unwrap();
        assert_eq!(matchups.len(), 2);
        assert!((matchups[0].points() - 103.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_status_error_names_endpoint() {
        let app = Router::new().route(
            "/league/42/rosters",
            get(|| async { (AxumStatus::NOT_FOUND, "nope") }),
        );
        let base = serve(app).await;
        let err = client(&base).rosters().await.unwrap_err();
        match err {
            FetchError::Status { endpoint, status } => {
                assert_eq!(endpoint, "/league/42/rosters");
                assert_eq!(status, StatusCode::NOT_FOUND);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_decode_error_on_bad_body() {
        let app = Router::new().route("/league/42", get(|| async { "not json" }));
        let base = serve(app).await;
        let err = client(&base).league().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let err = client("http://127.0.0.1:1").users().await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    #[tokio::test]
    async fn test_schedule_is_flattened_by_week() {
        let app = Router::new().route(
            "/league/42/schedule",
            get(|| async {
                Json(serde_json::json!({
                    "2": [{"roster_id": 1, "opponent_id": 2, "week": 2}],
                    "1": [
                        {"roster_id": 2, "opponent_id": 1, "week": 1},
                        {"roster_id": 1, "opponent_id": 2, "week": 1}
                    ]
                }))
            }),
        );
        let base = serve(app).await;
        let schedule = client(&base).schedule().await.unwrap();
        let keys: Vec<(u32, u32)> = schedule.iter().map(|m| (m.week, m.roster_id)).collect();
        assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1)]);
    }
}
