use crate::domain::model::{
    Distribution, DistributionSet, RegistrySpecies, ResolvedSpecies, Taxonomy, TaxonomyRecord,
};
use crate::domain::ports::BiodiversityRegistry;

pub const DEFAULT_OCCURRENCE_LIMIT: usize = 10;

/// Progress of one resolution. Every step either advances or settles on defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStage {
    Searching,
    SpeciesFound(RegistrySpecies),
    TaxonomyExtracted {
        taxonomy: TaxonomyRecord,
        species_key: Option<String>,
    },
    DistributionFallback {
        taxonomy: TaxonomyRecord,
        species_key: String,
    },
    DistributionFound {
        taxonomy: TaxonomyRecord,
        distribution: Distribution,
    },
    DistributionUnknown {
        taxonomy: Taxonomy,
    },
}

impl ResolutionStage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolutionStage::DistributionFound { .. } | ResolutionStage::DistributionUnknown { .. }
        )
    }

    /// Result carried by a stage. Non-terminal stages report what is known so far.
    pub fn into_resolved(self) -> ResolvedSpecies {
        match self {
            ResolutionStage::Searching => ResolvedSpecies::default(),
            ResolutionStage::SpeciesFound(species) => ResolvedSpecies {
                taxonomy: Taxonomy::Found(species.taxonomy()),
                distribution: Distribution::Unknown,
            },
            ResolutionStage::TaxonomyExtracted { taxonomy, .. }
            | ResolutionStage::DistributionFallback { taxonomy, .. } => ResolvedSpecies {
                taxonomy: Taxonomy::Found(taxonomy),
                distribution: Distribution::Unknown,
            },
            ResolutionStage::DistributionFound {
                taxonomy,
                distribution,
            } => ResolvedSpecies {
                taxonomy: Taxonomy::Found(taxonomy),
                distribution,
            },
            ResolutionStage::DistributionUnknown { taxonomy } => ResolvedSpecies {
                taxonomy,
                distribution: Distribution::Unknown,
            },
        }
    }
}

/// Taxonomy and distribution lookup against a biodiversity registry.
///
/// Never fails: a registry error at any stage is logged and the resolution
/// settles on whatever defaults apply at that point.
pub struct TaxonomyResolver<R: BiodiversityRegistry> {
    registry: R,
    occurrence_limit: usize,
}

impl<R: BiodiversityRegistry> TaxonomyResolver<R> {
    pub fn new(registry: R) -> Self {
        Self::with_occurrence_limit(registry, DEFAULT_OCCURRENCE_LIMIT)
    }

    pub fn with_occurrence_limit(registry: R, occurrence_limit: usize) -> Self {
        Self {
            registry,
            occurrence_limit,
        }
    }

    pub async fn resolve(&self, scientific_name: &str) -> ResolvedSpecies {
        let mut stage = ResolutionStage::Searching;
        while !stage.is_terminal() {
            stage = self.advance(scientific_name, stage).await;
        }

        let resolved = stage.into_resolved();
        tracing::debug!(
            "Resolved {}: taxonomy={:?}, distribution={}",
            scientific_name,
            resolved.taxonomy_display(),
            resolved.distribution_display()
        );
        resolved
    }

    pub async fn advance(&self, scientific_name: &str, stage: ResolutionStage) -> ResolutionStage {
        match stage {
            ResolutionStage::Searching => match self.search_species(scientific_name).await {
                Some(species) => ResolutionStage::SpeciesFound(species),
                None => ResolutionStage::DistributionUnknown {
                    taxonomy: Taxonomy::NotFound,
                },
            },
            ResolutionStage::SpeciesFound(species) => ResolutionStage::TaxonomyExtracted {
                taxonomy: species.taxonomy(),
                species_key: species.key,
            },
            ResolutionStage::TaxonomyExtracted {
                taxonomy,
                species_key: None,
            } => {
                tracing::debug!("Registry entry for {} has no key", scientific_name);
                ResolutionStage::DistributionUnknown {
                    taxonomy: Taxonomy::Found(taxonomy),
                }
            }
            ResolutionStage::TaxonomyExtracted {
                taxonomy,
                species_key: Some(species_key),
            } => {
                let areas = self.primary_distribution(&species_key).await;
                if areas.is_empty() {
                    ResolutionStage::DistributionFallback {
                        taxonomy,
                        species_key,
                    }
                } else {
                    ResolutionStage::DistributionFound {
                        taxonomy,
                        distribution: Distribution::Areas(areas),
                    }
                }
            }
            ResolutionStage::DistributionFallback {
                taxonomy,
                species_key,
            } => {
                let countries = self.fallback_distribution(&species_key).await;
                if countries.is_empty() {
                    ResolutionStage::DistributionUnknown {
                        taxonomy: Taxonomy::Found(taxonomy),
                    }
                } else {
                    ResolutionStage::DistributionFound {
                        taxonomy,
                        distribution: Distribution::Countries(countries),
                    }
                }
            }
            terminal => terminal,
        }
    }

    /// First registry hit for the name. Later hits are ignored.
    pub async fn search_species(&self, scientific_name: &str) -> Option<RegistrySpecies> {
        match self.registry.search_species(scientific_name).await {
            Ok(results) => {
                if results.len() > 1 {
                    tracing::debug!(
                        "{} registry matches for {}, using the first",
                        results.len(),
                        scientific_name
                    );
                }
                results.into_iter().next()
            }
            Err(e) => {
                tracing::warn!("Species search failed for {}: {}", scientific_name, e);
                None
            }
        }
    }

    pub async fn primary_distribution(&self, species_key: &str) -> DistributionSet {
        match self.registry.distribution_areas(species_key).await {
            Ok(areas) => collect_locations(areas),
            Err(e) => {
                tracing::warn!("Distribution lookup failed for key {}: {}", species_key, e);
                DistributionSet::new()
            }
        }
    }

    pub async fn fallback_distribution(&self, species_key: &str) -> DistributionSet {
        match self
            .registry
            .occurrence_countries(species_key, self.occurrence_limit)
            .await
        {
            Ok(countries) => collect_locations(countries),
            Err(e) => {
                tracing::warn!("Occurrence lookup failed for key {}: {}", species_key, e);
                DistributionSet::new()
            }
        }
    }
}

fn collect_locations(values: Vec<Option<String>>) -> DistributionSet {
    values
        .into_iter()
        .flatten()
        .filter(|value| !value.trim().is_empty())
        .collect()
}
