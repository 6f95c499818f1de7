use crate::domain::model::{IdentificationCandidate, ImageUpload, RegistrySpecies};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Writes `data` and returns the location it was stored at.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn recognition_endpoint(&self) -> &str;
    fn api_key(&self) -> &str;
    fn recognition_timeout(&self) -> Duration;
    fn registry_base_url(&self) -> &str;
    fn registry_timeout(&self) -> Duration;
    fn occurrence_limit(&self) -> usize;
}

/// Visual identification of a photograph.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Candidates in the order the service returned them. An empty list means no identification.
    async fn identify(&self, image: &ImageUpload) -> Result<Vec<IdentificationCandidate>>;
}

/// Biodiversity registry lookups used to enrich an identification.
#[async_trait]
pub trait BiodiversityRegistry: Send + Sync {
    async fn search_species(&self, scientific_name: &str) -> Result<Vec<RegistrySpecies>>;

    /// `area` of every distribution record; `None` where the record has none.
    async fn distribution_areas(&self, species_key: &str) -> Result<Vec<Option<String>>>;

    /// `country` of up to `limit` occurrence records; `None` where the record has none.
    async fn occurrence_countries(
        &self,
        species_key: &str,
        limit: usize,
    ) -> Result<Vec<Option<String>>>;
}
