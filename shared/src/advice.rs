//! Advice endpoint handler, proxying the Advice Slip API.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::fetch::OutboundFetch;
use crate::http::ApiResponse;
use crate::models::{timestamp_now, AdviceData, AdviceQuery, AdviceSlip, ADVICE_SOURCE};
use crate::{Config, Error, Result};

const INVALID_ID_MESSAGE: &str = "the 'id' parameter must be a valid positive number";
const UNAVAILABLE_MESSAGE: &str = "unable to fetch advice at this time";

/// Validates the optional advice id, fetches a slip and normalizes it.
#[derive(Clone)]
pub struct AdviceHandler {
    fetcher: Arc<dyn OutboundFetch>,
    config: Arc<Config>,
}

impl AdviceHandler {
    pub fn new(fetcher: Arc<dyn OutboundFetch>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// Serve one request. Never fails: every error becomes an envelope.
    pub async fn handle(&self, query: AdviceQuery) -> (u16, ApiResponse<AdviceData>) {
        match self.fetch_advice(query).await {
            Ok(data) => {
                info!(advice_id = data.id, "advice fetched");
                (200, ApiResponse::success(data))
            }
            Err(e) => {
                let status = e.status_code();
                if status >= 500 {
                    error!(error = %e, "advice request failed");
                } else {
                    warn!(status, error = %e, "advice request rejected");
                }
                (status, ApiResponse::error(e.public_message(self.config.environment)))
            }
        }
    }

    async fn fetch_advice(&self, query: AdviceQuery) -> Result<AdviceData> {
        let id = query.id.as_deref().map(parse_advice_id).transpose()?;

        let url = match &id {
            Some(id) => format!("{}/advice/{}", self.config.advice_api_base_url, id),
            None => format!("{}/advice", self.config.advice_api_base_url),
        };

        info!(url = %url, "querying advice api");

        let response = self
            .fetcher
            .get(&url, &[("Accept", "application/json")])
            .await?;

        if response.status == 404 {
            return Err(not_found(id.as_deref()));
        }
        if !response.is_success() {
            return Err(Error::Upstream(format!(
                "advice api responded with status {}",
                response.status
            )));
        }

        let body: serde_json::Value = serde_json::from_slice(&response.body)?;
        let slip = AdviceSlip::from_upstream(&body).ok_or_else(|| not_found(id.as_deref()))?;

        Ok(AdviceData {
            id: slip.id,
            advice: slip.advice,
            source: ADVICE_SOURCE.to_string(),
            timestamp: timestamp_now(),
        })
    }
}

/// Accept only integers strictly greater than zero, of any length.
///
/// Returns the digits without a sign or leading zeros.
fn parse_advice_id(raw: &str) -> Result<String> {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let canonical = digits.trim_start_matches('0');

    if canonical.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Validation(INVALID_ID_MESSAGE.to_string()));
    }
    Ok(canonical.to_string())
}

fn not_found(id: Option<&str>) -> Error {
    match id {
        Some(id) => Error::NotFound(format!("no advice found with id {}", id)),
        None => Error::NotFound(UNAVAILABLE_MESSAGE.to_string()),
    }
}
