// Local filesystem adapter - work directories and output handling

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::ports::*;

/// Filesystem adapter rooted at a work directory
pub struct LocalFsAdapter {
    work_root: PathBuf,
}

impl LocalFsAdapter {
    /// Create adapter, making sure the work root exists
    pub fn new(work_root: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let work_root = work_root.into();
        std::fs::create_dir_all(&work_root).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create work root {}: {}",
                work_root.display(),
                e
            ))
        })?;
        Ok(Self { work_root })
    }

    pub fn work_root(&self) -> &Path {
        &self.work_root
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn create_work_dir(&self, prefix: &str) -> Result<tempfile::TempDir, DomainError> {
        tempfile::Builder::new()
            .prefix(prefix)
            .tempdir_in(&self.work_root)
            .map_err(|e| DomainError::FsFail(format!("Failed to create work directory: {}", e)))
    }

    async fn file_size(&self, file_path: &Path) -> Result<Option<u64>, DomainError> {
        match tokio::fs::metadata(file_path).await {
            Ok(metadata) if metadata.is_file() => Ok(Some(metadata.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to get file size of {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    async fn remove_file(&self, file_path: &Path) -> Result<(), DomainError> {
        match tokio::fs::remove_file(file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to delete file {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        if let Some(parent) = to.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::FsFail(format!("Failed to create directory: {}", e))
            })?;
        }

        tokio::fs::copy(from, to).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to copy file from {} to {}: {}",
                from.display(),
                to.display(),
                e
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_work_dir_prefix_and_cleanup() {
        let root = TempDir::new().unwrap();
        let fs = LocalFsAdapter::new(root.path()).unwrap();

        let work = fs.create_work_dir("media_processing_").await.unwrap();
        let path = work.path().to_path_buf();
        assert!(path.starts_with(root.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("media_processing_"));

        drop(work);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_file_size_absent_is_none() {
        let root = TempDir::new().unwrap();
        let fs = LocalFsAdapter::new(root.path()).unwrap();

        assert_eq!(fs.file_size(&root.path().join("nope.mp4")).await.unwrap(), None);

        let file = root.path().join("out.mp4");
        std::fs::write(&file, vec![0u8; 42]).unwrap();
        assert_eq!(fs.file_size(&file).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let root = TempDir::new().unwrap();
        let fs = LocalFsAdapter::new(root.path()).unwrap();
        fs.remove_file(&root.path().join("gone.mp4")).await.unwrap();
    }

    #[tokio::test]
    async fn test_copy_creates_destination_dir() {
        let root = TempDir::new().unwrap();
        let fs = LocalFsAdapter::new(root.path()).unwrap();
        let src = root.path().join("src.mp4");
        std::fs::write(&src, b"video").unwrap();

        let dest = root.path().join("published/nested/out.mp4");
        fs.copy_file(&src, &dest).await.unwrap();
        assert_eq!(std::fs::read(dest).unwrap(), b"video");
    }
}
