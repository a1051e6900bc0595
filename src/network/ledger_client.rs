use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::core::config::HarnessConfig;
use crate::core::errors::{HarnessError, Result};
use crate::harness::steps::Step;
use crate::security::redaction::redact_json_body;

/// Status and text body of one service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResponse {
    pub status: StatusCode,
    pub body: String,
}

impl StepResponse {
    /// Only an exact 200 counts; other 2xx codes fail the step.
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// Thin HTTP client for the rollup wallet endpoints.
pub struct LedgerClient {
    client: Client,
    base_url: Url,
}

impl LedgerClient {
    /// Build a client for `base_url`, which must end with `/` so paths join under it.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn from_config(cfg: &HarnessConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HarnessError::Config(format!("cannot build http client: {}", e)))?;
        Self::with_client(&cfg.base_url, client)
    }

    fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            HarnessError::Config(format!("invalid base_url {:?}: {}", base_url, e))
        })?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| HarnessError::Config(format!("cannot join {:?}: {}", path, e)))
    }

    /// POST `body` as JSON to the step's endpoint.
    ///
    /// Any HTTP response, whatever its status, is returned as `Ok`; only
    /// transport faults are errors.
    pub async fn post<B: Serialize>(&self, step: Step, body: &B) -> Result<StepResponse> {
        let url = self.endpoint(step.path())?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            let rendered = serde_json::to_value(body)
                .map(|v| redact_json_body(&v))
                .unwrap_or_else(|_| "<unserializable>".to_string());
            tracing::debug!(%url, body = %rendered, "POST");
        }

        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| HarnessError::Transport { step, source })?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| HarnessError::Transport { step, source })?;

        tracing::debug!(step = %step, status = status.as_u16(), "Response received");
        Ok(StepResponse { status, body })
    }

    /// GET a status path; used by poll settlement.
    pub async fn probe(&self, step: Step, path: &str) -> Result<StatusCode> {
        let url = self.endpoint(path)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HarnessError::Transport { step, source })?;
        Ok(resp.status())
    }
}
