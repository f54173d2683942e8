use super::*;
use serde::{Deserialize, Serialize};

/// Counter backed by an external HTTP service
pub struct HttpCounter {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GameStartedRequest {
    players: usize,
}

#[derive(Debug, Deserialize)]
struct TotalResponse {
    total: u64,
}

impl HttpCounter {
    pub fn new(base_url: &str, timeout: Duration) -> MetricsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MetricsError::RequestFailed(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> MetricsError {
        if e.is_timeout() {
            MetricsError::Timeout(self.timeout)
        } else {
            MetricsError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl PlayCounter for HttpCounter {
    async fn record_game_started(&self, players: usize) -> MetricsResult<()> {
        let url = format!("{}/games", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&GameStartedRequest { players })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(MetricsError::RequestFailed(format!(
                "Counter service returned status: {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn fetch_total(&self) -> MetricsResult<u64> {
        let url = format!("{}/games/total", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(MetricsError::RequestFailed(format!(
                "Counter service returned status: {}",
                response.status()
            )));
        }

        let body: TotalResponse = response
            .json()
            .await
            .map_err(|e| MetricsError::ParseError(e.to_string()))?;
        Ok(body.total)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let counter = HttpCounter::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(counter.base_url, "http://localhost:9000");
    }

    #[tokio::test]
    async fn test_unreachable_service_errors() {
        // Port 9 (discard) is not expected to run an HTTP server
        let counter = HttpCounter::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        assert!(counter.record_game_started(3).await.is_err());
        assert!(counter.fetch_total().await.is_err());
    }

    #[tokio::test]
    #[ignore] // Only run with a counter service running locally
    async fn test_live_counter() {
        let counter = HttpCounter::new("http://localhost:9000", Duration::from_secs(3)).unwrap();
        counter.record_game_started(4).await.unwrap();
        assert!(counter.fetch_total().await.unwrap() >= 1);
    }
}
