use shared::FormDataPatch;
use shared::models::{DeleteObjectPayload, StoreId, StorePhoto, StorePhotosPayload};
use tokio::sync::watch;

use super::{PendingChanges, StepContext, StepOutcome, StepResult, request_error, step_back};
use crate::cache::QueryKey;
use crate::mode::Mode;
use crate::notice::Notice;
use crate::submit::Orchestrator;
use crate::upload::{ImageFile, ImageUploader, UploadProgress};

/// Uploaded object keys to attach, photo row ids to delete
pub type PhotoChanges = PendingChanges<String, i64>;

/// Step 6: store photos; in CREATE mode its submit creates the store
pub struct PhotosStep {
    mode: Mode,
    ctx: StepContext,
    uploader: ImageUploader,
    /// Persisted rows, UPDATE only
    existing: Vec<StorePhoto>,
    pending: PhotoChanges,
}

impl PhotosStep {
    pub async fn open(mode: Mode, ctx: StepContext) -> StepResult<Self> {
        let existing = match mode {
            Mode::Create => Vec::new(),
            Mode::Update(store_id) => {
                let store = ctx.store.clone();
                ctx.cache
                    .get_or_fetch(QueryKey::StorePhotos(store_id), || async move {
                        store.photos(store_id).await
                    })
                    .await
                    .map_err(request_error("Fetch photos error:"))?
            }
        };
        let uploader = ImageUploader::new(ctx.objects.clone(), ctx.owner_id);
        Ok(Self {
            mode,
            ctx,
            uploader,
            existing,
            pending: PhotoChanges::new(),
        })
    }

    /// Object keys shown in the gallery: uploaded in CREATE, persisted plus
    /// queued in UPDATE
    pub fn photos(&self) -> Vec<String> {
        match self.mode {
            Mode::Create => self.ctx.session.form_data().photos,
            Mode::Update(_) => self
                .existing
                .iter()
                .filter(|p| !self.pending.is_deleted(&p.id))
                .map(|p| p.path.clone())
                .chain(self.pending.adds().iter().cloned())
                .collect(),
        }
    }

    pub fn existing(&self) -> &[StorePhoto] {
        &self.existing
    }

    pub fn pending(&self) -> &PhotoChanges {
        &self.pending
    }

    pub fn progress(&self) -> watch::Receiver<UploadProgress> {
        self.uploader.subscribe()
    }

    /// Upload a batch; keys are kept only if every file made it
    pub async fn upload(&mut self, files: Vec<ImageFile>) -> StepResult<Vec<String>> {
        let keys = self.uploader.upload_photos(files).await?;
        match self.mode {
            Mode::Create => {
                let mut photos = self.ctx.session.form_data().photos;
                photos.extend(keys.iter().cloned());
                self.ctx.session.update_form_data(FormDataPatch::photos(photos));
            }
            Mode::Update(_) => {
                for key in &keys {
                    self.pending.add(key.clone());
                }
            }
        }
        Ok(keys)
    }

    /// CREATE: delete an uploaded object and drop its key
    pub async fn remove_uploaded(&mut self, key: &str) -> StepResult<()> {
        let payload = DeleteObjectPayload {
            key: key.to_string(),
        };
        self.ctx
            .objects
            .delete_object(&payload)
            .await
            .map_err(request_error("Delete photo error:"))?;
        match self.mode {
            Mode::Create => {
                let mut photos = self.ctx.session.form_data().photos;
                photos.retain(|p| p != key);
                self.ctx.session.update_form_data(FormDataPatch::photos(photos));
            }
            Mode::Update(_) => {
                self.pending.cancel_add(|k| k == key);
            }
        }
        Ok(())
    }

    /// UPDATE: queue a persisted photo for deletion
    pub fn delete_photo(&mut self, photo_id: i64) -> StepResult<()> {
        if !self.mode.is_update() {
            return Err(super::StepError::UpdateOnly("Deleting a saved photo"));
        }
        if self.existing.iter().any(|p| p.id == photo_id) {
            self.pending.delete(photo_id);
        }
        Ok(())
    }

    pub async fn submit(&mut self) -> StepResult<StepOutcome> {
        match self.mode {
            Mode::Create => {
                let done = Orchestrator::new(self.ctx.store.clone())
                    .submit(&self.ctx.session, self.ctx.owner_id)
                    .await?;
                Ok(StepOutcome::Created(done))
            }
            Mode::Update(store_id) => {
                self.flush_pending(store_id).await?;
                Ok(StepOutcome::Saved(Notice::success(
                    "Photos updated successfully",
                )))
            }
        }
    }

    pub fn back(&self) -> StepOutcome {
        step_back(self.mode, &self.ctx)
    }

    async fn flush_pending(&mut self, store_id: StoreId) -> StepResult<()> {
        for photo_id in self.pending.deletes().to_vec() {
            self.ctx
                .store
                .delete_photo(photo_id)
                .await
                .map_err(request_error("Delete photo error:"))?;
            self.pending.restore(&photo_id);
            self.existing.retain(|p| p.id != photo_id);
            self.ctx
                .cache
                .update::<Vec<StorePhoto>, _>(&QueryKey::StorePhotos(store_id), |rows| {
                    rows.retain(|p| p.id != photo_id)
                });
            tracing::debug!(store_id, photo_id, "Photo deleted");
        }

        if !self.pending.adds().is_empty() {
            let payload = StorePhotosPayload {
                store_id,
                paths: self.pending.adds().to_vec(),
            };
            let created = self
                .ctx
                .store
                .create_photos(&payload)
                .await
                .map_err(request_error("Create store photos error:"))?;
            tracing::info!(store_id, count = created.len(), "Photos attached");
            self.existing.extend(created.iter().cloned());
            self.ctx
                .cache
                .update::<Vec<StorePhoto>, _>(&QueryKey::StorePhotos(store_id), |rows| {
                    rows.extend(created)
                });
        }

        self.pending.clear();
        Ok(())
    }
}
