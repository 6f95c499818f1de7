use crate::domain::model::IdentificationCandidate;
use crate::utils::error::{PlantError, Result};

/// Highest-scoring candidate. Ties go to the earliest candidate in input order;
/// a NaN score never beats a real one.
pub fn select_best(candidates: &[IdentificationCandidate]) -> Result<&IdentificationCandidate> {
    let mut iter = candidates.iter();
    let first = iter.next().ok_or(PlantError::NoIdentification)?;

    let best = iter.fold(first, |best, candidate| {
        if (best.confidence_score.is_nan() && !candidate.confidence_score.is_nan())
            || candidate.confidence_score > best.confidence_score
        {
            candidate
        } else {
            best
        }
    });

    tracing::debug!(
        "Selected {} ({:.4}) out of {} candidates",
        best.species_key,
        best.confidence_score,
        candidates.len()
    );
    Ok(best)
}
