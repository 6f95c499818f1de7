//! GBIF-compatible biodiversity registry client.
//!
//! Registry payloads are read leniently: an entry missing a field, or carrying it
//! with an unexpected JSON type, yields `None` for that field rather than failing
//! the whole response.

use crate::domain::model::RegistrySpecies;
use crate::domain::ports::{BiodiversityRegistry, ConfigProvider};
use crate::utils::error::{PlantError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub struct GbifClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GbifClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.registry_base_url(), config.registry_timeout())
    }

    /// `{base_url}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            PlantError::internal(format!("Invalid registry URL {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                PlantError::internal(format!("Registry URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_results(&self, url: Url, query: &[(&str, String)]) -> Result<Vec<Value>> {
        tracing::debug!("Registry request: {}", url);
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlantError::UpstreamError {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        Ok(match body.get("results") {
            Some(Value::Array(results)) => results.clone(),
            _ => Vec::new(),
        })
    }
}

fn string_field(entry: &Value, field: &str) -> Option<String> {
    entry.get(field).and_then(Value::as_str).map(str::to_string)
}

fn key_field(entry: &Value) -> Option<String> {
    match entry.get("key")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn species_from(entry: &Value) -> RegistrySpecies {
    RegistrySpecies {
        key: key_field(entry),
        kingdom: string_field(entry, "kingdom"),
        phylum: string_field(entry, "phylum"),
        class: string_field(entry, "class"),
        order: string_field(entry, "order"),
        family: string_field(entry, "family"),
    }
}

#[async_trait]
impl BiodiversityRegistry for GbifClient {
    async fn search_species(&self, scientific_name: &str) -> Result<Vec<RegistrySpecies>> {
        let url = self.endpoint(&["species"])?;
        let results = self
            .get_results(url, &[("name", scientific_name.to_string())])
            .await?;
        Ok(results.iter().map(species_from).collect())
    }

    async fn distribution_areas(&self, species_key: &str) -> Result<Vec<Option<String>>> {
        let url = self.endpoint(&["species", species_key, "distributions"])?;
        let results = self.get_results(url, &[]).await?;
        Ok(results.iter().map(|entry| string_field(entry, "area")).collect())
    }

    async fn occurrence_countries(
        &self,
        species_key: &str,
        limit: usize,
    ) -> Result<Vec<Option<String>>> {
        let url = self.endpoint(&["occurrence", "search"])?;
        let results = self
            .get_results(
                url,
                &[
                    ("taxonKey", species_key.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(results
            .iter()
            .map(|entry| string_field(entry, "country"))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> GbifClient {
        GbifClient::new(server.url("/v1"), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_search_species() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/species")
                .query_param("name", "Aloe vera");
            then.status(200).json_body(serde_json::json!({
                "offset": 0,
                "results": [
                    {"key": 2777724, "kingdom": "Plantae", "phylum": "Tracheophyta", "class": "Liliopsida", "order": "Asparagales", "family": "Asphodelaceae"},
                    {"key": "5290145", "kingdom": "Plantae", "family": null}
                ]
            }));
        });

        let species = client(&server).search_species("Aloe vera").await.unwrap();

        api_mock.assert();
        assert_eq!(species.len(), 2);
        assert_eq!(species[0].key.as_deref(), Some("2777724"));
        assert_eq!(species[0].family.as_deref(), Some("Asphodelaceae"));
        assert_eq!(species[1].key.as_deref(), Some("5290145"));
        assert_eq!(species[1].family, None);
    }

    #[tokio::test]
    async fn test_distribution_areas() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/species/2777724/distributions");
            then.status(200).json_body(serde_json::json!({
                "results": [
                    {"area": "Arabian Peninsula", "establishmentMeans": "NATIVE"},
                    {"locality": "Somewhere"},
                    {"area": 42}
                ]
            }));
        });

        let areas = client(&server).distribution_areas("2777724").await.unwrap();
        assert_eq!(areas, vec![Some("Arabian Peninsula".to_string()), None, None]);
    }

    #[tokio::test]
    async fn test_occurrence_countries_passes_limit() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/occurrence/search")
                .query_param("taxonKey", "2777724")
                .query_param("limit", "10");
            then.status(200).json_body(serde_json::json!({
                "results": [{"country": "ES"}, {"country": "US"}, {"basisOfRecord": "HUMAN_OBSERVATION"}]
            }));
        });

        let countries = client(&server)
            .occurrence_countries("2777724", 10)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(
            countries,
            vec![Some("ES".to_string()), Some("US".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_error_status_and_missing_results() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/species");
            then.status(503);
        });
        server.mock(|when, then| {
            when.method(GET).path("/v1/species/1/distributions");
            then.status(200).json_body(serde_json::json!({"message": "no results key"}));
        });

        let gbif = client(&server);
        assert!(gbif.search_species("Aloe vera").await.is_err());
        assert!(gbif.distribution_areas("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/species/1/distributions");
            then.status(200).body("not json");
        });

        assert!(client(&server).distribution_areas("1").await.is_err());
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let gbif = GbifClient::new("https://api.gbif.org/v1/", Duration::from_secs(1));
        let url = gbif.endpoint(&["species", "12", "distributions"]).unwrap();
        assert_eq!(url.as_str(), "https://api.gbif.org/v1/species/12/distributions");
    }
}
