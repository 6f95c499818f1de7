use crate::core::reference::ReferenceTables;
use crate::domain::model::{IdentificationCandidate, ResolvedSpecies, SpeciesProfile};

/// `0.8734` -> `"87.34%"`
pub fn format_confidence(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}

pub fn assemble_profile(
    candidate: &IdentificationCandidate,
    references: &ReferenceTables,
    resolved: &ResolvedSpecies,
) -> SpeciesProfile {
    let scientific_name = candidate.species_key.clone();

    SpeciesProfile {
        common_name: references.common_name(&scientific_name),
        ayurvedic_use: references.ayurvedic_use(&scientific_name),
        confidence: format_confidence(candidate.confidence_score),
        taxonomy: resolved.taxonomy_display(),
        distribution: resolved.distribution_display(),
        scientific_name,
    }
}
