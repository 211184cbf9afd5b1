use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::ImageStore;
use crate::error::StoreServiceError;

/// Stores uploaded images on local disk under a fixed directory and serves
/// them under `/uploads/`.
#[derive(Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageStore for LocalImageStore {
    async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, StoreServiceError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .context("create upload directory")?;
        let filename = format!("{}.{extension}", Uuid::new_v4());
        let path = self.root.join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .context("write uploaded image")?;
        Ok(format!("/uploads/{filename}"))
    }
}
