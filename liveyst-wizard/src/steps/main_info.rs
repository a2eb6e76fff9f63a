use shared::form::schema::{MainInfoForm, validate_form};
use shared::models::{DeleteObjectPayload, StoreMainDetail, StoreMainDetailUpdate};

use super::{StepContext, StepOutcome, StepResult, advance, request_error, step_back};
use crate::cache::QueryKey;
use crate::mode::Mode;
use crate::notice::Notice;
use crate::upload::{ImageFile, ImageUploader, UploadProgress};

/// Step 1: name, tagline, logo and contact details
pub struct MainInfoStep {
    mode: Mode,
    ctx: StepContext,
    form: MainInfoForm,
    uploader: ImageUploader,
}

impl MainInfoStep {
    pub async fn open(mode: Mode, ctx: StepContext) -> StepResult<Self> {
        let form = match mode {
            Mode::Create => MainInfoForm::from_form_data(&ctx.session.form_data()),
            Mode::Update(store_id) => {
                let store = ctx.store.clone();
                let detail: StoreMainDetail = ctx
                    .cache
                    .get_or_fetch(QueryKey::MainInfo(store_id), || async move {
                        store.main_detail(store_id).await
                    })
                    .await
                    .map_err(request_error("Fetch store error:"))?;
                form_from_detail(&detail)
            }
        };
        let uploader = ImageUploader::new(ctx.objects.clone(), ctx.owner_id);
        Ok(Self {
            mode,
            ctx,
            form,
            uploader,
        })
    }

    pub fn form(&self) -> &MainInfoForm {
        &self.form
    }

    pub fn logo_progress(&self) -> UploadProgress {
        self.uploader.progress()
    }

    /// Replace the local form; CREATE mirrors it into the session
    pub fn on_change(&mut self, mut form: MainInfoForm) {
        if form.name != self.form.name {
            let name = form.name.clone();
            form.set_name(name);
        }
        self.form = form;
        self.sync();
    }

    pub async fn upload_logo(&mut self, file: ImageFile) -> StepResult<String> {
        let key = self.uploader.upload_logo(file).await?;
        self.form.logo = key.clone();
        self.sync();
        Ok(key)
    }

    /// Delete the uploaded logo object and clear the field
    pub async fn delete_logo(&mut self) -> StepResult<()> {
        if self.form.logo.is_empty() {
            return Ok(());
        }
        let payload = DeleteObjectPayload {
            key: self.form.logo.clone(),
        };
        self.ctx
            .objects
            .delete_object(&payload)
            .await
            .map_err(request_error("Delete logo error:"))?;
        tracing::info!(key = %payload.key, "Logo deleted");
        self.form.logo.clear();
        self.sync();
        Ok(())
    }

    pub async fn submit(&mut self) -> StepResult<StepOutcome> {
        validate_form(&self.form)?;
        match self.mode {
            Mode::Create => Ok(advance(&self.ctx)),
            Mode::Update(store_id) => {
                let f = &self.form;
                let payload = StoreMainDetailUpdate {
                    name: f.name.clone(),
                    number: f.number.clone(),
                    email: f.email.clone(),
                    tagline: f.tagline.clone(),
                    logo: f.logo.clone(),
                    whatsapp_number: f.whatsapp_number.clone(),
                };
                let updated = self
                    .ctx
                    .store
                    .update_main_detail(store_id, &payload)
                    .await
                    .map_err(request_error("Update store error:"))?;
                self.ctx
                    .cache
                    .set(QueryKey::MainInfo(store_id), updated.main_detail());
                tracing::info!(store_id, "Main information saved");
                Ok(StepOutcome::Saved(Notice::success(
                    "Main information updated successfully",
                )))
            }
        }
    }

    pub fn back(&self) -> StepOutcome {
        step_back(self.mode, &self.ctx)
    }

    fn sync(&self) {
        if self.mode == Mode::Create {
            self.ctx.session.update_form_data(self.form.to_patch());
        }
    }
}

fn form_from_detail(detail: &StoreMainDetail) -> MainInfoForm {
    MainInfoForm {
        name: detail.name.clone(),
        tagline: detail.tagline.clone(),
        logo: detail.logo.clone(),
        slug: detail.slug.clone(),
        number: detail.number.clone(),
        whatsapp_number: detail.whatsapp_number.clone(),
        email: detail.email.clone(),
    }
}
