use depthwatch_core::RawSnapshot;
use serde::Deserialize;

use crate::error::RestError;

/// Depth response body (Binance `/api/v3/depth` shape)
///
/// Both sides are optional here so that a missing side surfaces as
/// [`RestError::MissingSide`] rather than a generic parse failure.
#[derive(Debug, Deserialize)]
struct DepthResponse {
    #[serde(rename = "lastUpdateId")]
    #[allow(dead_code)]
    last_update_id: Option<u64>,
    bids: Option<Vec<(String, String)>>,
    asks: Option<Vec<(String, String)>>,
}

/// Parse and validate a depth payload
pub fn parse_depth(body: &str) -> Result<RawSnapshot, RestError> {
    let response: DepthResponse =
        serde_json::from_str(body).map_err(|e| RestError::Parse(e.to_string()))?;

    let bids = response.bids.ok_or(RestError::MissingSide("bids"))?;
    let asks = response.asks.ok_or(RestError::MissingSide("asks"))?;

    Ok(RawSnapshot::new(bids, asks))
}
