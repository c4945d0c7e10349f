//! Image blob store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::ImageInfo;
use crate::{PcbookError, Result};

/// Append-only store for uploaded laptop images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `data` under a fresh id and register its metadata.
    ///
    /// Metadata is only registered once the bytes are durably written.
    async fn save(&self, laptop_id: &str, image_type: &str, data: Vec<u8>) -> Result<String>;

    /// Metadata for a stored image.
    fn find(&self, image_id: &str) -> Result<Option<ImageInfo>>;
}

/// [`ImageStore`] that writes one file per image under a root directory
/// and keeps the id → metadata index in memory.
///
/// File names are `{image_id}{image_type}`. The index is not persisted.
#[derive(Debug)]
pub struct DiskImageStore {
    image_dir: PathBuf,
    images: RwLock<HashMap<String, ImageInfo>>,
}

impl DiskImageStore {
    /// Create a store rooted at `image_dir`. The directory must exist.
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            images: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store rooted at `image_dir`, creating the directory first.
    pub fn open(image_dir: impl Into<PathBuf>) -> Result<Self> {
        let image_dir = image_dir.into();
        std::fs::create_dir_all(&image_dir).map_err(|e| {
            PcbookError::Configuration(format!(
                "cannot create image directory {}: {e}",
                image_dir.display()
            ))
        })?;
        Ok(Self::new(image_dir))
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Number of registered images.
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .images
            .read()
            .map_err(|e| PcbookError::Internal(format!("image store lock poisoned: {e}")))?
            .len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(&self, laptop_id: &str, image_type: &str, data: Vec<u8>) -> Result<String> {
        let image_id = Uuid::new_v4().to_string();
        let path = self.image_dir.join(format!("{image_id}{image_type}"));

        // No lock held: each image gets its own file.
        if let Err(e) = tokio::fs::write(&path, &data).await {
            // A partial file without metadata would never be reachable.
            let _ = tokio::fs::remove_file(&path).await;
            return Err(PcbookError::Internal(format!(
                "cannot write image to file {}: {e}",
                path.display()
            )));
        }

        let info = ImageInfo {
            laptop_id: laptop_id.to_string(),
            image_type: image_type.to_string(),
            path,
        };
        self.images
            .write()
            .map_err(|e| PcbookError::Internal(format!("image store lock poisoned: {e}")))?
            .insert(image_id.clone(), info);

        Ok(image_id)
    }

    fn find(&self, image_id: &str) -> Result<Option<ImageInfo>> {
        Ok(self
            .images
            .read()
            .map_err(|e| PcbookError::Internal(format!("image store lock poisoned: {e}")))?
            .get(image_id)
            .cloned())
    }
}
