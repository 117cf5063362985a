//! HTTP client for the Open-Meteo historical forecast API.

use crate::types::forecast::WeatherResponse;
use crate::types::weather_query::WeatherQuery;
use crate::weather_data::error::WeatherDataError;
use async_trait::async_trait;
use bon::bon;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Historical forecast endpoint of Open-Meteo.
pub const DEFAULT_BASE_URL: &str = "https://historical-forecast-api.open-meteo.com/v1/forecast";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A source of daily weather series for a batch of co-dated locations.
///
/// The enrichment pipeline only talks to the weather service through this
/// trait, so alternative backends (or test doubles) can be plugged in.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetches one forecast per location of `query`, positionally aligned.
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResponse, WeatherDataError>;
}

/// [`WeatherSource`] backed by the Open-Meteo HTTP API.
///
/// Holds one connection pool that is reused for every request made through it.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

#[bon]
impl OpenMeteoClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `.base_url(String)`: Optional. Endpoint to query. Defaults to [`DEFAULT_BASE_URL`].
    /// * `.timeout(Duration)`: Optional. Per-request timeout. Defaults to [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDataError::ClientBuild`] if the underlying HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use stranding_context::OpenMeteoClient;
    /// use std::time::Duration;
    ///
    /// let client = OpenMeteoClient::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()?;
    /// # Ok::<(), stranding_context::WeatherDataError>(())
    /// ```
    #[builder(finish_fn = build)]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, WeatherDataError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("stranding-context/", env!("CARGO_PKG_VERSION"))),
        );
        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(WeatherDataError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResponse, WeatherDataError> {
        let params = query.to_params();
        debug!("Requesting {} with {:?}", self.base_url, params);

        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherDataError::from_request(&self.base_url, self.timeout, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WeatherDataError::from_request(&self.base_url, self.timeout, e))?;

        // Error payloads arrive with a 4xx status, so the body is decoded first.
        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) if !status.is_success() => {
                warn!("HTTP {} from {}: {:?}", status, self.base_url, e);
                return Err(WeatherDataError::HttpStatus {
                    url: self.base_url.clone(),
                    status,
                });
            }
            Err(e) => return Err(WeatherDataError::Decode(e)),
        };

        let parsed = WeatherResponse::from_json(body)?;
        if !status.is_success() {
            return Err(WeatherDataError::HttpStatus {
                url: self.base_url.clone(),
                status,
            });
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::stranding_record::StrandingRecord;
    use chrono::NaiveDate;

    #[test]
    fn test_client_defaults() -> Result<(), WeatherDataError> {
        let client = OpenMeteoClient::builder().build()?;
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout, Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn test_client_overrides() -> Result<(), WeatherDataError> {
        let client = OpenMeteoClient::builder()
            .base_url("http://localhost:9999/v1/forecast")
            .timeout(Duration::from_secs(5))
            .build()?;
        assert_eq!(client.base_url(), "http://localhost:9999/v1/forecast");
        assert_eq!(client.timeout, Duration::from_secs(5));
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() -> Result<(), WeatherDataError> {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = OpenMeteoClient::builder()
            .base_url("http://127.0.0.1:9/v1/forecast")
            .timeout(Duration::from_secs(5))
            .build()?;
        let date = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let records = vec![StrandingRecord::new(0, 35.0, -75.0, Some(date))];
        let query = WeatherQuery::for_records(
            &records,
            date,
            3,
            &["temperature_2m_max".to_string()],
            "America/New_York",
        )
        .expect("valid query");

        let result = client.fetch(&query).await;
        assert!(matches!(
            result,
            Err(WeatherDataError::Transport { .. }) | Err(WeatherDataError::Timeout { .. })
        ));
        Ok(())
    }

    /// Serves one canned HTTP response on a local port and hands back the request line.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        body: String,
    ) -> std::io::Result<(String, tokio::task::JoinHandle<String>)> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}/v1/forecast", listener.local_addr()?);

        let handle = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return String::new();
            };
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        Ok((url, handle))
    }

    fn two_location_query() -> WeatherQuery {
        let date = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let records = vec![
            StrandingRecord::new(0, 35.0, -75.0, Some(date)),
            StrandingRecord::new(1, 36.0, -76.0, Some(date)),
        ];
        WeatherQuery::for_records(
            &records,
            date,
            3,
            &["temperature_2m_max".to_string()],
            "America/New_York",
        )
        .expect("valid query")
    }

    async fn fetch_from(url: &str) -> Result<WeatherResponse, WeatherDataError> {
        let client = OpenMeteoClient::builder()
            .base_url(url)
            .timeout(Duration::from_secs(5))
            .build()?;
        client.fetch(&two_location_query()).await
    }

    #[tokio::test]
    async fn test_error_body_wins_over_status() -> Result<(), Box<dyn std::error::Error>> {
        let body = r#"{"error":true,"reason":"Invalid coordinates"}"#.to_string();
        let (url, server) = serve_once("400 Bad Request", "application/json", body).await?;

        let result = fetch_from(&url).await;
        match result {
            Err(WeatherDataError::UpstreamApi { reason }) => assert_eq!(reason, "Invalid coordinates"),
            other => panic!("expected an upstream error, got {other:?}"),
        }
        assert_eq!(
            server.await?,
            "GET /v1/forecast?latitude=35%2C36&longitude=-75%2C-76&start_date=2019-04-29\
             &end_date=2019-05-01&daily=temperature_2m_max&timezone=America%2FNew_York HTTP/1.1"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_non_json_error_is_http_status() -> Result<(), Box<dyn std::error::Error>> {
        let body = "<html><body>Internal Server Error</body></html>".to_string();
        let (url, server) = serve_once("500 Internal Server Error", "text/html", body).await?;

        let result = fetch_from(&url).await;
        match result {
            Err(WeatherDataError::HttpStatus { status, .. }) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected an HTTP status error, got {other:?}"),
        }
        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() -> Result<(), Box<dyn std::error::Error>> {
        let body = "<html><body>Down for maintenance</body></html>".to_string();
        let (url, server) = serve_once("200 OK", "text/html", body).await?;

        let result = fetch_from(&url).await;
        assert!(matches!(result, Err(WeatherDataError::Decode(_))), "{result:?}");
        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_response() -> Result<(), Box<dyn std::error::Error>> {
        let forecast = |lat: f64| {
            serde_json::json!({
                "latitude": lat,
                "longitude": -75.0,
                "daily": {
                    "time": ["2019-04-29", "2019-04-30", "2019-05-01"],
                    "temperature_2m_max": [20.1, null, 22.5]
                }
            })
        };
        let body = serde_json::json!([forecast(35.0), forecast(36.0)]).to_string();
        let (url, server) = serve_once("200 OK", "application/json", body).await?;

        let forecasts = fetch_from(&url).await?.into_forecasts();
        assert_eq!(forecasts.len(), 2);
        assert_eq!(forecasts[1].latitude, Some(36.0));
        let daily = forecasts[0].daily.as_ref().expect("daily block");
        assert_eq!(
            daily.series("temperature_2m_max"),
            Some(vec![Some(20.1), None, Some(22.5)])
        );
        server.await?;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "hits the live Open-Meteo API"]
    async fn test_fetch_live_batch() -> Result<(), WeatherDataError> {
        let client = OpenMeteoClient::builder().build()?;
        let date = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let records = vec![
            StrandingRecord::new(0, 35.224, -75.533, Some(date)),
            StrandingRecord::new(1, 34.7, -76.667, Some(date)),
        ];
        let query = WeatherQuery::for_records(
            &records,
            date,
            7,
            &["temperature_2m_max".to_string(), "precipitation_sum".to_string()],
            "America/New_York",
        )
        .expect("valid query");

        let forecasts = client.fetch(&query).await?.into_forecasts();
        assert_eq!(forecasts.len(), 2);
        let daily = forecasts[0].daily.as_ref().expect("daily block");
        assert_eq!(daily.time.len(), 7);
        assert_eq!(daily.time.last().map(String::as_str), Some("2019-05-01"));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "hits the live Open-Meteo API"]
    async fn test_fetch_live_invalid_coordinates() -> Result<(), WeatherDataError> {
        let client = OpenMeteoClient::builder().build()?;
        let date = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap();
        let records = vec![StrandingRecord::new(0, 135.0, -75.0, Some(date))];
        let query = WeatherQuery::for_records(
            &records,
            date,
            3,
            &["temperature_2m_max".to_string()],
            "America/New_York",
        )
        .expect("valid query");

        let result = client.fetch(&query).await;
        assert!(matches!(result, Err(WeatherDataError::UpstreamApi { .. })));
        Ok(())
    }
}
