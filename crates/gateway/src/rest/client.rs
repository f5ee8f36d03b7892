use std::time::Duration;

use async_trait::async_trait;
use depthwatch_core::RawSnapshot;
use depthwatch_ports::{FetchError, MarketDataSource};
use reqwest::Client;
use serde::Deserialize;

use super::depth::parse_depth;
use crate::error::RestError;

/// Public Binance spot REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Upper bound for a single depth request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for a Binance-compatible exchange
/// Infrastructure component - handles HTTP communication
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(RestClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Get an order book depth snapshot
    pub async fn get_depth(&self, symbol: &str, limit: u32) -> Result<RawSnapshot, RestError> {
        let url = format!("{}/api/v3/depth", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        let body = self.handle_response(resp).await?;
        parse_depth(&body)
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<String, RestError> {
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            if let Ok(err) = serde_json::from_str::<ApiError>(&text) {
                return Err(RestError::Api {
                    code: err.code,
                    msg: err.msg,
                });
            }
            return Err(RestError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

#[derive(Deserialize)]
struct ApiError {
    code: i32,
    msg: String,
}

/// Implement MarketDataSource for RestClient (Dependency Inversion)
///
/// Converts infrastructure RestError to port FetchError.
#[async_trait]
impl MarketDataSource for RestClient {
    async fn fetch(&self, symbol: &str, depth_limit: u32) -> Result<RawSnapshot, FetchError> {
        self.get_depth(symbol, depth_limit)
            .await
            .map_err(FetchError::from)
    }
}
