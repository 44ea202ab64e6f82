//! Reading store reached over a JSON document API.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use super::ReadingStore;
use crate::error::FetchError;
use crate::models::RawReading;

// ---

/// Queries `GET {url}?order_by=timestamp&direction=desc&limit=N`.
///
/// The response is either a bare array of documents or an object with a
/// `results` array.
#[derive(Debug, Clone)]
pub struct HttpStore {
    // ---
    client: Client,
    url: Url,
    token: Option<String>,
}

impl HttpStore {
    // ---
    /// Build the client once. Failure here is fatal to startup.
    pub fn new(url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        // ---
        let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid store URL '{}': {}", url, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("Invalid store URL '{}': scheme must be http or https", url);
        }
        if timeout.is_zero() {
            bail!("Invalid store timeout: must be greater than zero");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client for '{}': {}", url, e))?;

        Ok(Self {
            client,
            url: parsed,
            token,
        })
    }
}

#[async_trait]
impl ReadingStore for HttpStore {
    // ---
    async fn latest(&self, limit: u32) -> Result<Vec<RawReading>, FetchError> {
        // ---
        let limit_param = limit.to_string();
        let mut request = self.client.get(self.url.clone()).query(&[
            ("order_by", "timestamp"),
            ("direction", "desc"),
            ("limit", limit_param.as_str()),
        ]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::StoreUnavailable(format!(
                "HTTP {} from {}",
                status, self.url
            )));
        }
        if !status.is_success() {
            return Err(FetchError::StoreQuery(format!(
                "HTTP {} from {}",
                status, self.url
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::StoreQuery(format!("undecodable body: {}", e)))?;

        tracing::debug!("Store response: {}", body);
        decode_body(&body)
    }

    fn description(&self) -> String {
        format!("http store at {}", self.url)
    }
}

// ---

fn map_transport_error(e: reqwest::Error) -> FetchError {
    // ---
    if e.is_connect() || e.is_timeout() {
        FetchError::StoreUnavailable(e.to_string())
    } else {
        FetchError::StoreQuery(e.to_string())
    }
}

/// Turn a response body into raw readings, keeping store order.
fn decode_body(body: &Value) -> Result<Vec<RawReading>, FetchError> {
    // ---
    let docs = match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("results").and_then(Value::as_array) {
            Some(items) => items,
            None => {
                return Err(FetchError::StoreQuery(
                    "response missing 'results' array".to_string(),
                ))
            }
        },
        other => {
            return Err(FetchError::StoreQuery(format!(
                "unexpected response shape: {}",
                other
            )))
        }
    };

    let mut readings = Vec::with_capacity(docs.len());
    for (i, doc) in docs.iter().enumerate() {
        if !doc.is_object() {
            tracing::debug!("Skipping non-object document {}: {}", i, doc);
            continue;
        }
        readings.push(RawReading::from_json(doc));
    }
    Ok(readings)
}
