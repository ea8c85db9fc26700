//! HTTP rail client
//!
//! Speaks the rail's HAL-style transfer API: POST a body linking the source
//! and destination funding sources, read the `Location` header of the 2xx
//! response as the confirmation handle. Rejections come back as a structured
//! error list under `_embedded.errors`; classification of that list into
//! source/destination/unclassified is a pure function so it can be tested
//! without a network.

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::ledger::entry::fixed_2dp;

use super::error::RailError;
use super::{RailTransferResult, TransferRail};

/// Currency is fixed to a single unit of account.
const CURRENCY: &str = "USD";

/// HTTP implementation of [`TransferRail`].
pub struct RailClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RailClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new(base_url: Url, key: &str, secret: &str, timeout: Duration) -> Result<Self, RailError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let credentials = format!("{key}:{secret}");
        let auth_value = format!(
            "Basic {}",
            base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                credentials.as_bytes()
            )
        );
        let mut auth_header = reqwest::header::HeaderValue::from_str(&auth_value)
            .map_err(|e| RailError::Unclassified {
                detail: format!("Invalid rail credentials: {e}"),
            })?;
        auth_header.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_header);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| RailError::Unclassified {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, base_url })
    }

    fn transfers_url(&self) -> Result<Url, RailError> {
        self.base_url
            .join("transfers")
            .map_err(|e| RailError::Unclassified {
                detail: format!("Invalid rail base URL: {e}"),
            })
    }
}

#[async_trait::async_trait]
impl TransferRail for RailClient {
    fn name(&self) -> &'static str {
        "rail"
    }

    async fn execute(
        &self,
        source: &Url,
        destination: &Url,
        amount: Decimal,
    ) -> Result<RailTransferResult, RailError> {
        let body = TransferBody {
            links: TransferLinks {
                source: Href {
                    href: source.to_string(),
                },
                destination: Href {
                    href: destination.to_string(),
                },
            },
            amount: WireAmount {
                currency: CURRENCY,
                value: fixed_2dp(amount).to_string(),
            },
        };

        debug!(amount = %body.amount.value, "Submitting transfer to rail");

        let response = match self.http.post(self.transfers_url()?).json(&body).send().await {
            Ok(r) => r,
            Err(e) if e.is_connect() => {
                // The connection was never established: the request did not
                // reach the rail, so money cannot have moved.
                return Err(RailError::Unclassified {
                    detail: format!("Could not reach rail: {e}"),
                });
            }
            Err(e) => {
                // Sent (or possibly sent) but the response never arrived.
                warn!(error = %e, "Rail call failed after the request may have been accepted");
                return Err(RailError::Indeterminate {
                    detail: format!("No response read from rail: {e}"),
                });
            }
        };

        let status = response.status();

        if status.is_success() {
            return match response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                Some(location) if !location.is_empty() => {
                    debug!(location = location, "Rail confirmed transfer");
                    Ok(RailTransferResult {
                        location_handle: location.to_string(),
                    })
                }
                // Accepted, but the confirmation handle is unreadable. The
                // transfer may have committed; only reconciliation can tell.
                _ => Err(RailError::Indeterminate {
                    detail: format!("Rail answered {status} without a confirmation handle"),
                }),
            };
        }

        if status.is_server_error() {
            // The rail faulted mid-processing; acceptance is unknown.
            let text = response.text().await.unwrap_or_default();
            return Err(RailError::Indeterminate {
                detail: format!("Rail server error {status}: {text}"),
            });
        }

        // 4xx: the rail looked at the request and said no. Money did not move.
        let text = response.text().await.unwrap_or_default();
        let parsed: RailErrorBody = serde_json::from_str(&text).unwrap_or_default();
        Err(classify_rejection(status, &parsed, &text))
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct TransferBody {
    #[serde(rename = "_links")]
    links: TransferLinks,
    amount: WireAmount,
}

#[derive(Debug, Serialize)]
struct TransferLinks {
    source: Href,
    destination: Href,
}

#[derive(Debug, Serialize)]
struct Href {
    href: String,
}

#[derive(Debug, Serialize)]
struct WireAmount {
    currency: &'static str,
    value: String,
}

/// Error payload shape for structured rejections.
#[derive(Debug, Default, Deserialize)]
pub struct RailErrorBody {
    #[serde(rename = "_embedded", default)]
    embedded: Option<EmbeddedErrors>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EmbeddedErrors {
    #[serde(default)]
    errors: Vec<RailErrorItem>,
}

#[derive(Debug, Default, Deserialize)]
struct RailErrorItem {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

/// Classify a structured 4xx rejection.
///
/// Any embedded error whose path references the destination wins first;
/// source-path errors and balance-mentioning messages point at the sender;
/// everything else falls into the unclassified bucket.
pub fn classify_rejection(status: StatusCode, body: &RailErrorBody, raw: &str) -> RailError {
    let errors: &[RailErrorItem] = body
        .embedded
        .as_ref()
        .map(|e| e.errors.as_slice())
        .unwrap_or_default();

    if errors.is_empty() {
        let detail = body
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Rail answered {status}: {raw}"));
        return RailError::Unclassified { detail };
    }

    let detail = errors
        .iter()
        .filter_map(|e| e.message.as_deref())
        .collect::<Vec<_>>()
        .join(", ");

    let path_contains = |needle: &str| {
        errors
            .iter()
            .filter_map(|e| e.path.as_deref())
            .any(|p| p.contains(needle))
    };
    let message_mentions_balance = || {
        errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .any(|m| {
                let m = m.to_lowercase();
                m.contains("balance") || m.contains("insufficient")
            })
    };

    if path_contains("destination") {
        RailError::DestinationRejected { detail }
    } else if path_contains("source") || message_mentions_balance() {
        RailError::SourceRejected { detail }
    } else {
        let codes = errors
            .iter()
            .filter_map(|e| e.code.as_deref())
            .collect::<Vec<_>>()
            .join(",");
        RailError::Unclassified {
            detail: if detail.is_empty() { codes } else { detail },
        }
    }
}
