//! Classifier Client
//!
//! Thin HTTP client for the external ingredient classification endpoint. The
//! classifier itself is a black box: recognized label text goes in, a list of
//! flagged ingredient strings comes out. Network failures surface as typed
//! errors for the caller to present; they never panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::analysis::FlaggedTerm;
use crate::config::ClassifierSettings;

/// Errors from the classification call
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to create async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("classifier request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("classifier returned status {0}")]
    Status(u16),
    #[error("classifier error: {0}")]
    Api(String),
}

/// Request body for the analyze endpoint
#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

/// Response body from the analyze endpoint.
///
/// An absent `bad_ingredients` field is identical to an empty list; a
/// present `error` field is a failed classification even on HTTP 200.
#[derive(Debug, Default, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    bad_ingredients: Vec<String>,
    error: Option<String>,
}

impl AnalyzeResponse {
    fn into_terms(self) -> Result<Vec<FlaggedTerm>, ClassifierError> {
        if let Some(message) = self.error {
            return Err(ClassifierError::Api(message));
        }
        Ok(self.bad_ingredients.into_iter().map(FlaggedTerm::new).collect())
    }
}

/// Client for the ingredient classification endpoint
pub struct ClassifierClient {
    endpoint: String,
    client: reqwest::Client,
}

impl ClassifierClient {
    /// Create a client from classifier settings
    pub fn new(settings: &ClassifierSettings) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            client,
        })
    }

    /// Submit recognized label text and return the flagged ingredient terms.
    ///
    /// Blocking call site driving the async client, matching how the rest of
    /// the application runs one scan at a time.
    pub fn classify(&self, text: &str) -> Result<Vec<FlaggedTerm>, ClassifierError> {
        debug!("Sending {} chars of label text to classifier", text.len());

        let rt = Runtime::new()?;
        let response: AnalyzeResponse = rt.block_on(async {
            let resp = self
                .client
                .post(&self.endpoint)
                .json(&AnalyzeRequest { text })
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(ClassifierError::Status(resp.status().as_u16()));
            }

            Ok(resp.json::<AnalyzeResponse>().await?)
        })?;

        let terms = response.into_terms()?;
        info!("Classifier flagged {} ingredients", terms.len());

        Ok(terms)
    }
}
