//! Image uploads through presigned object-storage URLs
//!
//! Photos use a two-phase protocol: one presigned URL per file from the
//! backend, then all PUTs issued concurrently. Progress is published on a
//! watch channel as each PUT resolves, in whatever order they finish.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use liveyst_client::{ClientError, ObjectStorageApi};
use shared::models::{PresignFile, PresignMultiplePayload, PresignObjectPayload};
use shared::util::{MAX_IMAGE_SIZE, file_extension, now_millis, validate_image_size};
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no files selected")]
    Empty,

    #[error("{file_name} is {size} bytes, images are limited to {limit} bytes")]
    TooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    #[error("failed to issue upload URL: {0}")]
    Presign(#[source] ClientError),

    #[error("backend issued {issued} upload URLs for {expected} files")]
    UrlCountMismatch { issued: usize, expected: usize },

    #[error("{failed} of {total} uploads failed")]
    Put { failed: usize, total: usize },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Image picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .to_string()
    }

    pub fn extension(&self) -> String {
        file_extension(&self.file_name)
    }

    fn check_size(&self) -> Result<(), UploadError> {
        if validate_image_size(self.size()) {
            Ok(())
        } else {
            Err(UploadError::TooLarge {
                file_name: self.file_name.clone(),
                size: self.size(),
                limit: MAX_IMAGE_SIZE,
            })
        }
    }
}

/// `{ownerId}/photos/{millis}-{uuid}.{ext}`
pub fn photo_key(owner_id: i64, extension: &str) -> String {
    format!(
        "{owner_id}/photos/{}-{}.{extension}",
        now_millis(),
        Uuid::new_v4()
    )
}

/// `{ownerId}/logo-{millis}.{ext}`
pub fn logo_key(owner_id: i64, extension: &str) -> String {
    format!("{owner_id}/logo-{}.{extension}", now_millis())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    pub uploaded: usize,
    pub total: usize,
}

impl UploadProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.uploaded == self.total
    }

    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.uploaded * 100 / self.total) as u8
    }
}

/// Uploads images on behalf of one owner
pub struct ImageUploader {
    api: Arc<dyn ObjectStorageApi>,
    owner_id: i64,
    progress: watch::Sender<UploadProgress>,
}

impl ImageUploader {
    pub fn new(api: Arc<dyn ObjectStorageApi>, owner_id: i64) -> Self {
        let (progress, _) = watch::channel(UploadProgress::default());
        Self {
            api,
            owner_id,
            progress,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    pub fn progress(&self) -> UploadProgress {
        *self.progress.borrow()
    }

    /// Upload photos; returns their object keys only if every PUT succeeded
    pub async fn upload_photos(&self, files: Vec<ImageFile>) -> Result<Vec<String>, UploadError> {
        if files.is_empty() {
            return Err(UploadError::Empty);
        }
        for file in &files {
            file.check_size()?;
        }

        let keys: Vec<String> = files
            .iter()
            .map(|f| photo_key(self.owner_id, &f.extension()))
            .collect();
        let payload = PresignMultiplePayload {
            files: files
                .iter()
                .zip(&keys)
                .map(|(f, key)| PresignFile {
                    file_name: f.file_name.clone(),
                    key: key.clone(),
                })
                .collect(),
        };
        let urls = self
            .api
            .presign_objects(&payload)
            .await
            .map_err(UploadError::Presign)?;
        if urls.len() != files.len() {
            return Err(UploadError::UrlCountMismatch {
                issued: urls.len(),
                expected: files.len(),
            });
        }

        let total = files.len();
        self.progress.send_replace(UploadProgress { uploaded: 0, total });
        tracing::info!(total, "Uploading photos");

        let puts = files.into_iter().zip(urls).map(|(file, target)| {
            let api = self.api.clone();
            let progress = self.progress.clone();
            async move {
                let content_type = file.content_type();
                let result = api.put_object(&target.url, file.bytes, &content_type).await;
                match &result {
                    Ok(()) => {
                        progress.send_modify(|p| p.uploaded += 1);
                    }
                    Err(e) => {
                        tracing::error!(file = %file.file_name, "Image upload failed: {e}");
                    }
                }
                result
            }
        });
        let results = join_all(puts).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            return Err(UploadError::Put { failed, total });
        }
        tracing::info!(total, "Photos uploaded");
        Ok(keys)
    }

    /// Upload a single logo image and return its object key
    pub async fn upload_logo(&self, file: ImageFile) -> Result<String, UploadError> {
        file.check_size()?;
        let key = logo_key(self.owner_id, &file.extension());
        let content_type = file.content_type();
        let presigned = self
            .api
            .presign_object(&PresignObjectPayload {
                file_name: key.clone(),
                file_type: content_type.clone(),
            })
            .await
            .map_err(UploadError::Presign)?;

        self.progress
            .send_replace(UploadProgress { uploaded: 0, total: 1 });
        if let Err(e) = self
            .api
            .put_object(&presigned.url, file.bytes, &content_type)
            .await
        {
            tracing::error!(file = %file.file_name, "Logo upload failed: {e}");
            return Err(UploadError::Put {
                failed: 1,
                total: 1,
            });
        }
        self.progress.send_modify(|p| p.uploaded = 1);
        tracing::info!(%key, "Logo uploaded");
        Ok(key)
    }
}
