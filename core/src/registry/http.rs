//! REST implementation of the directory service contract

use super::{CapabilityBackend, GENERIC_FAILURE_DETAIL};
use crate::config::BackendConfig;
use crate::error::{CapdirError, Result};
use crate::model::Snapshot;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, Response};
use serde_json::Value;
use std::time::Duration;

pub struct HttpBackend {
    base_url: String,
    timeout: Duration,
    http_client: HttpClient,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CapdirError::Http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            http_client,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/capabilities/{name}/{verb}?email={email}` with both segments
    /// percent-encoded.
    pub fn roster_url(&self, capability: &str, verb: &str, email: &str) -> String {
        format!(
            "{}/capabilities/{}/{}?email={}",
            self.base_url,
            urlencoding::encode(capability),
            verb,
            urlencoding::encode(email)
        )
    }

    fn transport_error(&self, err: reqwest::Error) -> CapdirError {
        if err.is_timeout() {
            CapdirError::Timeout {
                duration: self.timeout,
            }
        } else {
            err.into()
        }
    }

    async fn read_json(&self, response: Response) -> Result<Value> {
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn roster_change(&self, method: Method, verb: &str, capability: &str, email: &str) -> Result<String> {
        let url = self.roster_url(capability, verb, email);
        crate::debug_log!("{} {}", method, url);

        let response = self
            .http_client
            .request(method, &url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = self.read_json(response).await?;

        if status.is_success() {
            Ok(body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string())
        } else {
            Err(CapdirError::Status {
                status: status.as_u16(),
                detail: detail_of(&body),
            })
        }
    }
}

/// Pull `detail` out of an error body. Non-string details (validation error
/// lists) are shown as compact JSON.
fn detail_of(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | None => GENERIC_FAILURE_DETAIL.to_string(),
        Some(Value::String(_)) => GENERIC_FAILURE_DETAIL.to_string(),
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl CapabilityBackend for HttpBackend {
    async fn fetch_capabilities(&self) -> Result<Snapshot> {
        let url = format!("{}/capabilities", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = self.read_json(response).await.unwrap_or(Value::Null);
            return Err(CapdirError::Status {
                status: status.as_u16(),
                detail: detail_of(&body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn register(&self, capability: &str, email: &str) -> Result<String> {
        self.roster_change(Method::POST, "register", capability, email)
            .await
    }

    async fn unregister(&self, capability: &str, email: &str) -> Result<String> {
        self.roster_change(Method::DELETE, "unregister", capability, email)
            .await
    }
}
