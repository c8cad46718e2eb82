// Domain rules - Business logic and policies

use crate::domain::errors::*;
use crate::domain::model::*;

/// Canonical filename for a source reference
///
/// Staged files land under this name, so two clips referring to the same
/// object share one input. Trailing separators are ignored.
pub fn source_key(source_ref: &str) -> String {
    source_ref
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_ref)
        .to_string()
}

/// Business rules for the shared output frame
pub struct CanvasNormalizer;

impl CanvasNormalizer {
    /// Canvas over all probed sources, independent of their order
    pub fn canvas(sources: &[ProbedSource]) -> Result<Canvas, DomainError> {
        sources
            .iter()
            .map(|s| s.dimensions)
            .reduce(Dimensions::max)
            .ok_or_else(|| DomainError::Composition("no sources to size a canvas from".to_string()))
    }

    /// Compute the canvas and decide which sources get scale+pad
    ///
    /// A source matching the canvas on both axes is left untouched.
    pub fn normalize(sources: &[ProbedSource]) -> Result<(Canvas, Vec<SourceVideo>), DomainError> {
        let canvas = Self::canvas(sources)?;

        let videos = sources
            .iter()
            .map(|probed| SourceVideo {
                key: probed.source.key.clone(),
                path: probed.source.path.clone(),
                dimensions: probed.dimensions,
                needs_scaling: probed.dimensions.smaller_than_on_any_axis(&canvas),
            })
            .collect();

        Ok((canvas, videos))
    }
}

#[cfg(test)]
mod tests;
