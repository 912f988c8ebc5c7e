use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::Client;
use tracing::{debug, warn};

/// Where a wheel index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Read from the service
    Stored(usize),
    /// Drawn locally after the service failed
    Local(usize),
}

/// Client for the random-number microservice that stores the current wheel index.
#[derive(Clone)]
pub struct RandomClient {
    http: Client,
    base_url: String,
    option_count: usize,
}

impl RandomClient {
    pub fn new(base_url: &str, option_count: usize, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(RandomClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            option_count,
        })
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    /// Stored index from the service. Errors on transport failures, bad
    /// payloads and indices outside `[0, option_count)`.
    pub async fn fetch_number(&self) -> Result<usize> {
        let url = format!("{}/number", self.base_url);
        debug!("Fetching wheel index from {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("Random service request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Random service error: {}", resp.status());
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse random service response")?;
        parse_index(&raw, self.option_count)
    }

    /// Stored index, or a locally drawn one when the service can't provide it.
    /// Always in `[0, option_count)`.
    pub async fn get_number(&self) -> Pick {
        match self.fetch_number().await {
            Ok(n) => Pick::Stored(n),
            Err(e) => {
                warn!("Random service unavailable, drawing locally: {:#}", e);
                Pick::Local(local_index(self.option_count))
            }
        }
    }

    pub async fn set_number(&self, number: usize) -> Result<()> {
        let url = format!("{}/number", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "value": number }))
            .send()
            .await
            .context("Failed to store wheel index")?;

        if !resp.status().is_success() {
            anyhow::bail!("Random service store failed: {}", resp.status());
        }
        Ok(())
    }
}

/// Uniform index in `[0, option_count)`; `0` for an empty wheel.
pub fn local_index(option_count: usize) -> usize {
    if option_count == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..option_count)
}

fn parse_index(raw: &serde_json::Value, option_count: usize) -> Result<usize> {
    let number = raw["number"]
        .as_i64()
        .or_else(|| {
            raw["number"]
                .as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        })
        .or_else(|| raw["number"].as_str().and_then(|s| s.trim().parse().ok()))
        .context("Random service response has no numeric `number` field")?;

    if number < 0 || number as usize >= option_count {
        anyhow::bail!(
            "Random service index {} out of range for {} options",
            number,
            option_count
        );
    }
    Ok(number as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_index_variants() {
        assert_eq!(parse_index(&serde_json::json!({"number": 4}), 9).unwrap(), 4);
        assert_eq!(parse_index(&serde_json::json!({"number": 2.0}), 9).unwrap(), 2);
        assert_eq!(parse_index(&serde_json::json!({"number": "7"}), 9).unwrap(), 7);
        assert!(parse_index(&serde_json::json!({"number": 9}), 9).is_err());
        assert!(parse_index(&serde_json::json!({"number": 2.7}), 9).is_err());
        assert!(parse_index(&serde_json::json!({"number": -1}), 9).is_err());
        assert!(parse_index(&serde_json::json!({}), 9).is_err());
    }

    #[test]
    fn test_local_index_in_range() {
        for _ in 0..200 {
            assert!(local_index(9) < 9);
        }
        assert_eq!(local_index(0), 0);
    }

    #[tokio::test]
    async fn test_get_number_falls_back_when_unreachable() {
        let client = RandomClient::new("http://127.0.0.1:1", 9, Duration::from_secs(1)).unwrap();
        for _ in 0..5 {
            let pick = client.get_number().await;
            assert!(matches!(pick, Pick::Local(i) if i < 9));
        }
        assert!(client.set_number(3).await.is_err());
    }

    #[tokio::test]
    async fn test_get_and_set_round_trip_through_service() {
        let stored = Arc::new(Mutex::new(6i64));
        let get_state = stored.clone();
        let post_state = stored.clone();
        let app = Router::new().route(
            "/number",
            get(move || {
                let n = *get_state.lock().unwrap();
                async move { Json(serde_json::json!({ "number": n })) }
            })
            .post(move |Json(body): Json<serde_json::Value>| {
                *post_state.lock().unwrap() = body["value"].as_i64().unwrap();
                async {}
            }),
        );
        let base = serve(app).await;
        let client = RandomClient::new(&base, 9, Duration::from_secs(2)).unwrap();

        assert_eq!(client.get_number().await, Pick::Stored(6));
        client.set_number(2).await.unwrap();
        assert_eq!(*stored.lock().unwrap(), 2);
        assert_eq!(client.fetch_number().await.unwrap(), 2);
    }
}
