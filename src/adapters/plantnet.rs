//! Pl@ntNet-compatible recognition client.

use crate::domain::model::{IdentificationCandidate, ImageUpload};
use crate::domain::ports::{ConfigProvider, RecognitionService};
use crate::utils::error::{PlantError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("plant-profile/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    results: Option<Vec<IdentifyResult>>,
}

#[derive(Debug, Deserialize)]
struct IdentifyResult {
    species: Option<IdentifySpecies>,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IdentifySpecies {
    #[serde(rename = "scientificNameWithoutAuthor")]
    scientific_name_without_author: Option<String>,
}

pub struct PlantNetClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl PlantNetClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.recognition_endpoint(),
            config.api_key(),
            config.recognition_timeout(),
        )
    }

    fn candidates(body: IdentifyResponse) -> Vec<IdentificationCandidate> {
        let results = body.results.unwrap_or_default();
        let total = results.len();

        let candidates: Vec<IdentificationCandidate> = results
            .into_iter()
            .filter_map(|result| {
                let name = result.species?.scientific_name_without_author?;
                let score = result.score?;
                if name.trim().is_empty() {
                    return None;
                }
                Some(IdentificationCandidate::new(name, score))
            })
            .collect();

        if candidates.len() < total {
            tracing::warn!(
                "Dropped {} recognition results without a species name or score",
                total - candidates.len()
            );
        }
        candidates
    }
}

#[async_trait]
impl RecognitionService for PlantNetClient {
    async fn identify(&self, image: &ImageUpload) -> Result<Vec<IdentificationCandidate>> {
        let part = Part::bytes(image.bytes.clone()).file_name(image.filename.clone());
        let form = Form::new().part("images", part);

        tracing::debug!("Posting {} to recognition service", image.filename);
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("api-key", self.api_key.as_str())])
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Recognition response status: {}", status);

        if !status.is_success() {
            return Err(PlantError::UpstreamError {
                status: status.as_u16(),
            });
        }

        let body: IdentifyResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                PlantError::UpstreamTimeout
            } else {
                PlantError::internal(format!("Malformed recognition response: {}", e))
            }
        })?;

        Ok(Self::candidates(body))
    }
}
