//! Source resolution: timeline references to staged local files

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{StagedSource, Timeline};
use crate::domain::rules::source_key;

/// Timeline whose every reference has a local file
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTimeline {
    /// Unique sources in first-seen order
    pub sources: Vec<StagedSource>,
    /// For each clip, index into `sources`
    pub clip_sources: Vec<usize>,
    pub audio: Option<PathBuf>,
}

/// Maps timeline references onto staged files
pub struct SourceResolver;

impl SourceResolver {
    /// Resolve every clip (and the audio track) or fail on the first gap
    ///
    /// No partial result is ever returned.
    pub fn resolve(
        timeline: &Timeline,
        staged: &HashMap<String, PathBuf>,
    ) -> Result<ResolvedTimeline, DomainError> {
        let mut sources: Vec<StagedSource> = Vec::new();
        let mut clip_sources = Vec::with_capacity(timeline.clips().len());

        for clip in timeline.clips() {
            let key = source_key(&clip.source_ref);

            if let Some(position) = sources.iter().position(|s| s.key == key) {
                let existing = &sources[position];
                if existing.source_ref != clip.source_ref {
                    return Err(DomainError::resolution(
                        &clip.source_ref,
                        format!(
                            "filename '{}' is already used by '{}'",
                            key, existing.source_ref
                        ),
                    ));
                }
                clip_sources.push(position);
                continue;
            }

            let path = staged.get(&clip.source_ref).ok_or_else(|| {
                DomainError::resolution(&clip.source_ref, "no staged file for this reference")
            })?;

            debug!("Resolved {} -> {}", clip.source_ref, path.display());
            clip_sources.push(sources.len());
            sources.push(StagedSource {
                key,
                source_ref: clip.source_ref.clone(),
                path: path.clone(),
            });
        }

        let audio = match timeline.audio_ref() {
            Some(audio_ref) => {
                let key = source_key(audio_ref);
                if let Some(existing) = sources
                    .iter()
                    .find(|s| s.key == key && s.source_ref != audio_ref)
                {
                    return Err(DomainError::resolution(
                        audio_ref,
                        format!(
                            "filename '{}' is already used by '{}'",
                            key, existing.source_ref
                        ),
                    ));
                }
                Some(staged.get(audio_ref).cloned().ok_or_else(|| {
                    DomainError::resolution(audio_ref, "no staged file for the audio track")
                })?)
            }
            None => None,
        };

        Ok(ResolvedTimeline {
            sources,
            clip_sources,
            audio,
        })
    }
}
