//! Local staging adapter
//!
//! Logical references are paths relative to a source root. Each found file
//! is copied into the request's work directory under its canonical filename.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::rules::source_key;
use crate::ports::*;

/// Stages references found under a local directory
pub struct LocalStagingAdapter {
    source_root: PathBuf,
}

impl LocalStagingAdapter {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    fn locate(&self, reference: &str) -> PathBuf {
        self.source_root.join(reference.trim_start_matches('/'))
    }
}

#[async_trait]
impl StagingPort for LocalStagingAdapter {
    async fn stage(
        &self,
        references: &[String],
        dest_dir: &Path,
    ) -> Result<HashMap<String, PathBuf>, DomainError> {
        let mut staged = HashMap::new();

        for reference in references {
            if staged.contains_key(reference) {
                continue;
            }

            let source = self.locate(reference);
            let is_file = tokio::fs::metadata(&source)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file {
                warn!("Source not found: {}", source.display());
                continue;
            }

            let dest = dest_dir.join(source_key(reference));
            if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
                // Another reference already owns this filename; let the resolver report it.
                debug!("{} already staged, skipping {}", dest.display(), reference);
                continue;
            }

            tokio::fs::copy(&source, &dest).await.map_err(|e| {
                DomainError::FsFail(format!(
                    "Failed to stage {} into {}: {}",
                    source.display(),
                    dest.display(),
                    e
                ))
            })?;
            debug!("Staged {} -> {}", reference, dest.display());
            staged.insert(reference.clone(), dest);
        }

        Ok(staged)
    }
}
