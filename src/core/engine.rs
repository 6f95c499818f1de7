use crate::core::assembler::assemble_profile;
use crate::core::reference::ReferenceTables;
use crate::core::resolver::TaxonomyResolver;
use crate::core::selector::select_best;
use crate::domain::model::{ImageUpload, SpeciesProfile};
use crate::domain::ports::{BiodiversityRegistry, RecognitionService};
use crate::utils::error::{PlantError, Result};
use std::sync::Arc;

/// Runs one photograph through recognition, selection, registry resolution and assembly.
pub struct IdentificationEngine<V: RecognitionService, R: BiodiversityRegistry> {
    recognition: V,
    resolver: TaxonomyResolver<R>,
    references: Arc<ReferenceTables>,
}

impl<V: RecognitionService, R: BiodiversityRegistry> IdentificationEngine<V, R> {
    pub fn new(
        recognition: V,
        resolver: TaxonomyResolver<R>,
        references: Arc<ReferenceTables>,
    ) -> Self {
        Self {
            recognition,
            resolver,
            references,
        }
    }

    pub fn references(&self) -> &ReferenceTables {
        &self.references
    }

    pub async fn run(&self, image: &ImageUpload) -> Result<SpeciesProfile> {
        if image.filename.trim().is_empty() {
            return Err(PlantError::input("No selected file"));
        }
        if image.bytes.is_empty() {
            return Err(PlantError::input("Uploaded file is empty"));
        }

        tracing::info!(
            "Identifying {} ({} bytes)",
            image.filename,
            image.bytes.len()
        );

        let candidates = self.recognition.identify(image).await?;
        tracing::debug!("Recognition returned {} candidates", candidates.len());

        let best = select_best(&candidates)?;
        tracing::info!(
            "Best match: {} ({:.2}%)",
            best.species_key,
            best.confidence_score * 100.0
        );

        let resolved = self.resolver.resolve(&best.species_key).await;
        let profile = assemble_profile(best, &self.references, &resolved);

        tracing::info!("Profile ready for {}", profile.scientific_name);
        Ok(profile)
    }
}
