//! Analysis service client (`POST /analyze`, `GET /health`)

use super::endpoint;
use crate::error::{AnalysisError, DashError, Result};
use crate::model::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote service that produces an [`AnalysisResult`] for a symbol
///
/// Implementations classify every failure into an [`AnalysisError`]. They
/// do not enforce a deadline; the orchestrator owns the timeout.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Request an analysis for one symbol
    async fn analyze(&self, request: &AnalysisRequest)
    -> std::result::Result<AnalysisResult, AnalysisError>;

    /// Check whether the service is up
    async fn health(&self) -> std::result::Result<(), AnalysisError>;

    /// Service name for logs
    fn name(&self) -> &str;
}

/// HTTP client for the analysis service
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    analyze_url: Url,
    health_url: Url,
}

impl HttpAnalysisClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("stockdash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let resolve = |path: &str| {
            endpoint(base_url, path).map_err(|e| {
                DashError::ConfigError(format!("Invalid analysis base URL {base_url}: {e}"))
            })
        };

        Ok(Self {
            client,
            analyze_url: resolve("analyze")?,
            health_url: resolve("health")?,
        })
    }

    pub fn analyze_url(&self) -> &Url {
        &self.analyze_url
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> std::result::Result<AnalysisResult, AnalysisError> {
        debug!(symbol = %request.symbol, url = %self.analyze_url, "Sending analysis request");

        let response = self
            .client
            .post(self.analyze_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| AnalysisError::TransportFailure(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::TransportFailure(format!("Failed to read response body: {e}")))?;

        let result = classify_response(status, &body)?;
        if !result.stock.symbol.eq_ignore_ascii_case(&request.symbol) {
            warn!(
                requested = %request.symbol,
                returned = %result.stock.symbol,
                "Analysis service echoed a different symbol"
            );
        }
        Ok(result)
    }

    async fn health(&self) -> std::result::Result<(), AnalysisError> {
        let response = self
            .client
            .get(self.health_url.clone())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout(HEALTH_TIMEOUT)
                } else {
                    AnalysisError::TransportFailure(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AnalysisError::ServiceError {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    fn name(&self) -> &str {
        "http-analysis"
    }
}

/// Classify a received `/analyze` response
///
/// Non-2xx statuses keep the body as opaque text; 2xx bodies must match
/// the analysis schema.
pub fn classify_response(
    status: u16,
    body: &str,
) -> std::result::Result<AnalysisResult, AnalysisError> {
    if !(200..300).contains(&status) {
        return Err(AnalysisError::ServiceError {
            status,
            body: body.to_string(),
        });
    }
    AnalysisResult::from_json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnalysisParams;
    use crate::model::fixtures::AAPL_ANALYSIS;

    #[test]
    fn test_classify_success() {
        let result = classify_response(200, AAPL_ANALYSIS).unwrap();
        assert_eq!(result.technical_analysis.trend, "Bullish");
    }

    #[test]
    fn test_classify_server_error() {
        let err = classify_response(500, "server error").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ServiceError {
                status: 500,
                body: "server error".to_string()
            }
        );
    }

    #[test]
    fn test_classify_client_error_keeps_body() {
        let err = classify_response(404, r#"{"detail":"Not Found"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::ServiceError { status: 404, body } if body.contains("Not Found")));
    }

    #[test]
    fn test_classify_malformed_success_body() {
        let err = classify_response(200, r#"{"stock": null}"#).unwrap_err();
        assert_eq!(err.kind(), crate::error::AnalysisErrorKind::MalformedResponse);
    }

    #[test]
    fn test_client_urls() {
        let client = HttpAnalysisClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.analyze_url().as_str(), "http://localhost:8000/analyze");
        assert!(HttpAnalysisClient::new("::not a url::").is_err());
    }

    /// Serve one canned HTTP response on a loopback port, returning its base URL
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the whole request so closing does not reset the connection
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_analyze_surfaces_server_error_body() {
        let base = serve_once("500 Internal Server Error", "server error").await;
        let client = HttpAnalysisClient::new(&base).unwrap();
        let request = AnalysisParams::default().request_for("AAPL");

        let err = client.analyze(&request).await.unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ServiceError {
                status: 500,
                body: "server error".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_success_body() {
        let base = serve_once("200 OK", r#"{"stock": {"symbol": "AAPL"}}"#).await;
        let client = HttpAnalysisClient::new(&base).unwrap();
        let request = AnalysisParams::default().request_for("AAPL");

        let err = client.analyze(&request).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_analyze_parses_success_body() {
        let base = serve_once("200 OK", AAPL_ANALYSIS).await;
        let client = HttpAnalysisClient::new(&base).unwrap();
        let request = AnalysisParams::default().request_for("AAPL");

        let result = client.analyze(&request).await.unwrap();
        assert_eq!(result.technical_analysis.trend, "Bullish");
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_failure() {
        // Port 1 on loopback is not expected to accept connections
        let client = HttpAnalysisClient::new("http://127.0.0.1:1").unwrap();
        let request = AnalysisParams::default().request_for("AAPL");

        let err = client.analyze(&request).await.unwrap_err();
        assert!(matches!(err, AnalysisError::TransportFailure(_)), "{err:?}");
    }

    #[tokio::test]
    #[ignore] // Requires a running analysis service on localhost:8000
    async fn test_live_health() {
        let client = HttpAnalysisClient::new("http://localhost:8000").unwrap();
        assert!(client.health().await.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires a running analysis service on localhost:8000
    async fn test_live_analyze() {
        let client = HttpAnalysisClient::new("http://localhost:8000").unwrap();
        let request = AnalysisParams::default().request_for("AAPL");
        let result = client.analyze(&request).await.unwrap();
        assert_eq!(result.stock.symbol, "AAPL");
    }
}
