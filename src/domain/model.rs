use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const UNKNOWN: &str = "Unknown";
pub const TAXONOMY_NOT_FOUND: &str = "Not Found";
pub const NO_AYURVEDIC_USE: &str = "No Ayurvedic uses found.";

/// One species guess returned by the recognition service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationCandidate {
    pub species_key: String,
    pub confidence_score: f64,
}

impl IdentificationCandidate {
    pub fn new(species_key: impl Into<String>, confidence_score: f64) -> Self {
        Self {
            species_key: species_key.into(),
            confidence_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyRecord {
    pub kingdom: String,
    pub phylum: String,
    pub class: String,
    pub order: String,
    pub family: String,
}

impl Default for TaxonomyRecord {
    fn default() -> Self {
        Self {
            kingdom: UNKNOWN.to_string(),
            phylum: UNKNOWN.to_string(),
            class: UNKNOWN.to_string(),
            order: UNKNOWN.to_string(),
            family: UNKNOWN.to_string(),
        }
    }
}

impl TaxonomyRecord {
    /// `Kingdom: .., Phylum: .., Class: .., Order: .., Family: ..`
    pub fn display(&self) -> String {
        format!(
            "Kingdom: {}, Phylum: {}, Class: {}, Order: {}, Family: {}",
            self.kingdom, self.phylum, self.class, self.order, self.family
        )
    }
}

/// Taxonomy outcome of a resolution. `NotFound` when the species search had no usable hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Taxonomy {
    Found(TaxonomyRecord),
    NotFound,
}

impl Taxonomy {
    pub fn display(&self) -> String {
        match self {
            Taxonomy::Found(record) => record.display(),
            Taxonomy::NotFound => TAXONOMY_NOT_FOUND.to_string(),
        }
    }
}

/// Deduplicated location names. Ordered so the joined form is stable.
pub type DistributionSet = BTreeSet<String>;

/// Where a species occurs. Named areas and country codes are never mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    /// Named areas from the registry's distribution records.
    Areas(DistributionSet),
    /// Country codes from occurrence records, used when no areas exist.
    Countries(DistributionSet),
    Unknown,
}

impl Distribution {
    pub fn display(&self) -> String {
        match self {
            Distribution::Areas(set) | Distribution::Countries(set) if !set.is_empty() => set
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            _ => UNKNOWN.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            Distribution::Areas(set) | Distribution::Countries(set) => set.is_empty(),
            Distribution::Unknown => true,
        }
    }
}

/// Registry enrichment for one species.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpecies {
    pub taxonomy: Taxonomy,
    pub distribution: Distribution,
}

impl Default for ResolvedSpecies {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::NotFound,
            distribution: Distribution::Unknown,
        }
    }
}

impl ResolvedSpecies {
    pub fn taxonomy_display(&self) -> String {
        self.taxonomy.display()
    }

    pub fn distribution_display(&self) -> String {
        self.distribution.display()
    }
}

/// An uploaded photograph handed to the recognition service.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// First-stage registry hit. Fields the registry omits stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySpecies {
    pub key: Option<String>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
}

impl RegistrySpecies {
    pub fn taxonomy(&self) -> TaxonomyRecord {
        let rank = |value: &Option<String>| value.clone().unwrap_or_else(|| UNKNOWN.to_string());
        TaxonomyRecord {
            kingdom: rank(&self.kingdom),
            phylum: rank(&self.phylum),
            class: rank(&self.class),
            order: rank(&self.order),
            family: rank(&self.family),
        }
    }
}

/// Final response record. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub scientific_name: String,
    pub common_name: String,
    pub confidence: String,
    pub taxonomy: String,
    pub distribution: String,
    pub ayurvedic_use: String,
}
