//! `LedgerClient` for an HTTP ledger gateway.
//!
//! The gateway holds the signing key and fronts the on-chain registry:
//!
//! | Call     | Request                          | Success body                          |
//! |----------|----------------------------------|---------------------------------------|
//! | submit   | `POST /transactions`             | `{"txId": "…"}`                       |
//! | status   | `GET /transactions/{txId}`       | `{"status": "pending" \| "confirmed", …}` |
//! | lookup   | `GET /datasets/{datasetHash}`    | `{"txId": "…"}`, or 404 when absent   |

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use attest_contracts::{
    error::{AttestError, AttestResult},
    identity::Digest,
    ledger::{LedgerError, LedgerReceipt, LedgerSubmission, TransactionId, TransactionStatus},
};
use attest_core::traits::LedgerClient;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxIdBody {
    tx_id: TransactionId,
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum StatusBody {
    Pending,
    #[serde(rename_all = "camelCase")]
    Confirmed {
        dataset_hash: Digest,
        block: Option<u64>,
        confirmed_at: DateTime<Utc>,
    },
}

/// Blocking HTTP client for a ledger gateway.
pub struct HttpLedgerClient {
    client: Client,
    base_url: String,
}

impl HttpLedgerClient {
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AttestResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| AttestError::ConfigError {
            reason: format!("failed to build ledger client: {}", e),
        })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network(e: reqwest::Error) -> LedgerError {
    LedgerError::Network { reason: e.to_string() }
}

/// Map a non-success gateway status to a ledger error.
///
/// Timeouts, throttling and server faults may clear up on retry; auth
/// failures mean the gateway could not sign; any other client error is a
/// rejection.
pub fn classify_status(status: StatusCode, body: &str) -> LedgerError {
    let reason = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.trim())
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => LedgerError::Network { reason },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LedgerError::Signing { reason },
        s if s.is_server_error() => LedgerError::Network { reason },
        _ => LedgerError::Rejected { reason },
    }
}

fn ensure_success(response: Response) -> Result<Response, LedgerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(classify_status(status, &body))
}

fn decode<T: DeserializeOwned>(response: Response) -> Result<T, LedgerError> {
    response.json().map_err(|e| LedgerError::Rejected {
        reason: format!("unexpected gateway response: {}", e),
    })
}

impl LedgerClient for HttpLedgerClient {
    fn submit(&self, submission: &LedgerSubmission) -> Result<TransactionId, LedgerError> {
        let response = self.client.post(self.url("/transactions")).json(submission).send().map_err(network)?;
        let body: TxIdBody = decode(ensure_success(response)?)?;
        debug!(tx_id = %body.tx_id, dataset_hash = %submission.dataset_hash, "gateway accepted transaction");
        Ok(body.tx_id)
    }

    fn status(&self, tx_id: &TransactionId) -> Result<TransactionStatus, LedgerError> {
        let response = self
            .client
            .get(self.url(&format!("/transactions/{}", tx_id)))
            .send()
            .map_err(network)?;
        let body: StatusBody = decode(ensure_success(response)?)?;
        match body {
            StatusBody::Pending => Ok(TransactionStatus::Pending),
            StatusBody::Confirmed { dataset_hash, block, confirmed_at } => {
                Ok(TransactionStatus::Confirmed(LedgerReceipt {
                    tx_id: tx_id.clone(),
                    dataset_hash,
                    block,
                    confirmed_at,
                }))
            }
        }
    }

    fn lookup(&self, dataset_hash: &Digest) -> Result<Option<TransactionId>, LedgerError> {
        let response = self
            .client
            .get(self.url(&format!("/datasets/{}", dataset_hash)))
            .send()
            .map_err(network)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: TxIdBody = decode(ensure_success(response)?)?;
        Ok(Some(body.tx_id))
    }
}
