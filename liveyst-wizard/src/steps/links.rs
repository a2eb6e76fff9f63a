use shared::LinkEntry;
use shared::form::schema::{LinksForm, validate_form};
use shared::models::{
    SocialMediaPlatform, StoreId, StoreLink, StoreLinkPayload, UpdateStoreLinkPayload,
};

use super::{
    PendingChanges, StepContext, StepOutcome, StepResult, advance, request_error, step_back,
};
use crate::cache::QueryKey;
use crate::mode::Mode;
use crate::notice::Notice;

/// Platform ids to add, link row ids to delete
pub type LinkChanges = PendingChanges<String, i64>;

/// Step 5: social media links, one per platform
pub struct LinksStep {
    mode: Mode,
    ctx: StepContext,
    form: LinksForm,
    platforms: Vec<SocialMediaPlatform>,
    /// Persisted rows, UPDATE only
    existing: Vec<StoreLink>,
    pending: LinkChanges,
    /// Persisted rows whose URL changed: (row id, new URL)
    edits: Vec<(i64, String)>,
}

impl LinksStep {
    pub async fn open(mode: Mode, ctx: StepContext) -> StepResult<Self> {
        let lookup = ctx.lookup.clone();
        let platforms = ctx
            .cache
            .get_or_fetch(QueryKey::SocialPlatforms, || async move {
                lookup.social_platforms().await
            })
            .await
            .map_err(request_error("Fetch social platforms error:"))?;

        let (form, existing) = match mode {
            Mode::Create => (LinksForm::from_form_data(&ctx.session.form_data()), Vec::new()),
            Mode::Update(store_id) => {
                let store = ctx.store.clone();
                let mut rows: Vec<StoreLink> = ctx
                    .cache
                    .get_or_fetch(QueryKey::StoreLinks(store_id), || async move {
                        store.links(store_id).await
                    })
                    .await
                    .map_err(request_error("Fetch links error:"))?;
                rows.sort_by_key(|r| r.index);
                let links = rows
                    .iter()
                    .map(|r| LinkEntry {
                        social_media_id: r.social_media_id.to_string(),
                        link: r.link.clone(),
                        index: r.index,
                    })
                    .collect();
                (LinksForm { links }, rows)
            }
        };

        Ok(Self {
            mode,
            ctx,
            form,
            platforms,
            existing,
            pending: LinkChanges::new(),
            edits: Vec::new(),
        })
    }

    pub fn form(&self) -> &LinksForm {
        &self.form
    }

    pub fn pending(&self) -> &LinkChanges {
        &self.pending
    }

    /// Platforms not yet used by a row
    pub fn available_platforms(&self) -> Vec<&SocialMediaPlatform> {
        self.platforms
            .iter()
            .filter(|p| {
                let id = p.id.to_string();
                !self.form.links.iter().any(|l| l.social_media_id == id)
            })
            .collect()
    }

    pub fn add_platform(&mut self, social_media_id: i64) {
        let id = social_media_id.to_string();
        if self.form.links.iter().any(|l| l.social_media_id == id) {
            return;
        }
        self.form.add_platform(id.clone());
        if self.mode.is_update() {
            self.pending.add(id);
        }
        self.sync();
    }

    pub fn set_link(&mut self, social_media_id: i64, link: impl Into<String>) {
        let id = social_media_id.to_string();
        let link = link.into();
        self.form.set_link(&id, link.clone());
        let row = self
            .existing_row(social_media_id)
            .map(|r| (r.id, r.link != link));
        if let Some((row_id, changed)) = row {
            self.edits.retain(|(id, _)| *id != row_id);
            if changed {
                self.edits.push((row_id, link));
            }
        }
        self.sync();
    }

    pub fn remove_platform(&mut self, social_media_id: i64) {
        let id = social_media_id.to_string();
        self.form.remove_platform(&id);
        if self.mode.is_update() && self.pending.cancel_add(|p| *p == id) == 0 {
            if let Some(row_id) = self.existing_row(social_media_id).map(|r| r.id) {
                self.edits.retain(|(id, _)| *id != row_id);
                self.pending.delete(row_id);
            }
        }
        self.sync();
    }

    pub async fn submit(&mut self) -> StepResult<StepOutcome> {
        validate_form(&self.form)?;
        let Mode::Update(store_id) = self.mode else {
            return Ok(advance(&self.ctx));
        };

        self.flush_deletes(store_id).await?;
        self.flush_edits(store_id).await?;
        self.flush_adds(store_id).await?;
        self.pending.clear();
        tracing::info!(store_id, "Links saved");
        Ok(StepOutcome::Saved(Notice::success("Links updated successfully")))
    }

    pub fn back(&self) -> StepOutcome {
        step_back(self.mode, &self.ctx)
    }

    async fn flush_deletes(&mut self, store_id: StoreId) -> StepResult<()> {
        for row_id in self.pending.deletes().to_vec() {
            self.ctx
                .store
                .delete_link(row_id)
                .await
                .map_err(request_error("Delete link error:"))?;
            self.existing.retain(|r| r.id != row_id);
            self.pending.restore(&row_id);
            self.ctx
                .cache
                .update::<Vec<StoreLink>, _>(&QueryKey::StoreLinks(store_id), |rows| {
                    rows.retain(|r| r.id != row_id)
                });
            tracing::debug!(store_id, row_id, "Link deleted");
        }
        Ok(())
    }

    async fn flush_edits(&mut self, store_id: StoreId) -> StepResult<()> {
        // An edit leaves the queue only once its PUT went through
        for (row_id, link) in self.edits.clone() {
            let updated = self
                .ctx
                .store
                .update_link(row_id, &UpdateStoreLinkPayload { link })
                .await
                .map_err(request_error("Update link error:"))?;
            self.edits.retain(|(id, _)| *id != row_id);
            if let Some(row) = self.existing.iter_mut().find(|r| r.id == row_id) {
                row.link = updated.link.clone();
            }
            self.ctx
                .cache
                .update::<Vec<StoreLink>, _>(&QueryKey::StoreLinks(store_id), |rows| {
                    if let Some(row) = rows.iter_mut().find(|r| r.id == row_id) {
                        row.link = updated.link;
                    }
                });
        }
        Ok(())
    }

    async fn flush_adds(&mut self, store_id: StoreId) -> StepResult<()> {
        let rows: Vec<StoreLinkPayload> = self
            .form
            .links
            .iter()
            .filter(|l| self.pending.adds().contains(&l.social_media_id))
            .filter_map(|l| {
                Some(StoreLinkPayload {
                    link: l.link.clone(),
                    social_media_id: l.social_media_id.parse().ok()?,
                    store_id,
                    index: l.index,
                })
            })
            .collect();
        if rows.is_empty() {
            return Ok(());
        }
        let created = self
            .ctx
            .store
            .create_links(&rows)
            .await
            .map_err(request_error("Create store links error:"))?;
        tracing::info!(store_id, count = created.len(), "Links added");
        self.existing.extend(created.iter().cloned());
        self.ctx
            .cache
            .update::<Vec<StoreLink>, _>(&QueryKey::StoreLinks(store_id), |list| {
                list.extend(created)
            });
        Ok(())
    }

    fn existing_row(&self, social_media_id: i64) -> Option<&StoreLink> {
        self.existing
            .iter()
            .find(|r| r.social_media_id == social_media_id)
    }

    fn sync(&self) {
        if self.mode == Mode::Create {
            self.ctx.session.update_form_data(self.form.to_patch());
        }
    }
}
