//! Search service client
//!
//! The service is opaque: it takes a query string and answers with a list of
//! candidate papers. Ranking happens locally afterwards.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{AppError, OracleError};
use crate::search::Candidate;

/// Anything that can answer a search query with candidates
#[async_trait]
pub trait SearchOracle: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, OracleError>;
}

/// HTTP search service: `GET {base}/search?query=<q>`
pub struct HttpOracle {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpOracle {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let endpoint = search_endpoint(base_url)?;
        let client = crate::http::client_with_timeout(timeout)
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);
        url
    }
}

#[async_trait]
impl SearchOracle for HttpOracle {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, OracleError> {
        let url = self.request_url(query);
        debug!("Searching: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status { status, body });
        }

        let body: Value = response.json().await?;
        let candidates = parse_candidates(body)?;
        debug!("Search service returned {} candidates", candidates.len());

        Ok(candidates)
    }
}

/// Resolve the search endpoint from a base URL, with or without trailing slash
fn search_endpoint(base_url: &str) -> Result<Url, AppError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    Url::parse(&base)
        .and_then(|url| url.join("search"))
        .map_err(|e| AppError::Config(format!("Invalid oracle URL '{}': {}", base_url, e)))
}

/// Decode a response body into candidates
///
/// Accepts either a bare array or an object with a `results` array. Entries
/// that are not valid candidates are skipped, as are repeated identifiers
/// (the first occurrence wins).
pub fn parse_candidates(body: Value) -> Result<Vec<Candidate>, OracleError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(OracleError::Malformed(
                    "expected an array or an object with a 'results' array".to_string(),
                ))
            }
        },
        other => {
            return Err(OracleError::Malformed(format!(
                "expected an array of results, got {}",
                kind(&other)
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let candidate: Candidate = match serde_json::from_value(item) {
            Ok(c) => c,
            Err(e) => {
                warn!("Skipping result #{}: {}", index, e);
                continue;
            }
        };

        if !seen.insert(candidate.id.clone()) {
            warn!("Skipping duplicate result id {}", candidate.id);
            continue;
        }

        candidates.push(candidate);
    }

    Ok(candidates)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
