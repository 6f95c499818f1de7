pub mod assembler;
pub mod classifier;
pub mod engine;
pub mod reference;
pub mod resolver;
pub mod selector;

pub use crate::domain::model::{
    Distribution, IdentificationCandidate, ImageUpload, ResolvedSpecies, SpeciesProfile, Taxonomy,
    TaxonomyRecord,
};
pub use crate::domain::ports::{BiodiversityRegistry, ConfigProvider, RecognitionService, Storage};
pub use crate::utils::error::Result;
