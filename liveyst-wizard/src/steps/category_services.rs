use shared::FieldErrors;
use shared::form::schema::{CategoryServicesForm, validate_form};
use shared::models::{
    AddCategoryPayload, AddServicePayload, Category, DeleteStoreServices, Service,
    StoreCategoryBio, StoreCategoryBioUpdate, StoreId, StoreService, StoreServicePayload,
    SuggestBioPayload, SuggestServicesQuery,
};

use super::{
    PendingChanges, StepContext, StepOutcome, StepResult, advance, request_error, step_back,
};
use crate::cache::QueryKey;
use crate::mode::Mode;
use crate::notice::Notice;

/// Service ids to add, store-service row ids to delete
pub type ServiceChanges = PendingChanges<i64, i64>;

/// Step 4: business category, offered services and bio
pub struct CategoryServicesStep {
    mode: Mode,
    ctx: StepContext,
    form: CategoryServicesForm,
    categories: Vec<Category>,
    services: Vec<Service>,
    /// Persisted rows, UPDATE only
    existing: Vec<StoreService>,
    pending: ServiceChanges,
    /// Store name and city, fed to the suggestion endpoints
    store_name: String,
    city_id: String,
}

impl CategoryServicesStep {
    pub async fn open(mode: Mode, ctx: StepContext) -> StepResult<Self> {
        let lookup = ctx.lookup.clone();
        let categories = ctx
            .cache
            .get_or_fetch(QueryKey::Categories, || async move {
                lookup.categories().await
            })
            .await
            .map_err(request_error("Fetch categories error:"))?;

        let mut step = Self {
            mode,
            ctx,
            form: CategoryServicesForm::default(),
            categories,
            services: Vec::new(),
            existing: Vec::new(),
            pending: ServiceChanges::new(),
            store_name: String::new(),
            city_id: String::new(),
        };

        match mode {
            Mode::Create => {
                let data = step.ctx.session.form_data();
                step.form = CategoryServicesForm::from_form_data(&data);
                step.store_name = data.name;
                step.city_id = data.city_id;
            }
            Mode::Update(store_id) => {
                let slice = fetch_category_bio(&step.ctx, store_id).await?;
                step.existing = fetch_store_services(&step.ctx, store_id).await?;
                step.form = CategoryServicesForm {
                    category_id: slice.category.id.to_string(),
                    services: step
                        .existing
                        .iter()
                        .map(|s| s.service_id.to_string())
                        .collect(),
                    bio: slice.bio,
                };
                step.store_name = slice.name;
                step.city_id = slice
                    .store_addresses
                    .map(|a| a.city_id.to_string())
                    .unwrap_or_default();
            }
        }

        if let Some(category_id) = step.category_id() {
            step.services = step.load_services(category_id).await?;
        }
        Ok(step)
    }

    pub fn form(&self) -> &CategoryServicesForm {
        &self.form
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Services offered under the selected category
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn pending(&self) -> &ServiceChanges {
        &self.pending
    }

    /// Names of the selected services, in selection order
    pub fn selected_names(&self) -> Vec<String> {
        self.form
            .services
            .iter()
            .filter_map(|id| {
                let id: i64 = id.parse().ok()?;
                self.services
                    .iter()
                    .find(|s| s.id == id)
                    .map(|s| s.name.clone())
                    .or_else(|| {
                        self.existing
                            .iter()
                            .find(|s| s.service_id == id)
                            .map(|s| s.service.name.clone())
                    })
            })
            .collect()
    }

    pub fn set_bio(&mut self, bio: impl Into<String>) {
        self.form.bio = bio.into();
        self.sync();
    }

    /// Switch category; selected services belong to the old one and are dropped
    pub async fn select_category(&mut self, category_id: i64) -> StepResult<()> {
        if self.category_id() == Some(category_id) {
            return Ok(());
        }
        let services = self.load_services(category_id).await?;
        self.form.category_id = category_id.to_string();
        for id in std::mem::take(&mut self.form.services) {
            self.deselect(&id);
        }
        self.services = services;
        self.sync();
        Ok(())
    }

    /// Select or deselect a service of the current category
    pub fn toggle_service(&mut self, service_id: i64) {
        let id = service_id.to_string();
        if self.form.services.contains(&id) {
            self.form.remove_service(&id);
            self.deselect(&id);
        } else {
            self.form.add_service(id);
            self.select(service_id);
        }
        self.sync();
    }

    /// Create a category and select it
    pub async fn add_category(&mut self, name: &str) -> StepResult<Category> {
        let payload = AddCategoryPayload {
            name: name.trim().to_string(),
        };
        let category = self
            .ctx
            .lookup
            .add_category(&payload)
            .await
            .map_err(request_error("Add category error:"))?;
        tracing::info!(id = category.id, name = %category.name, "Category added");

        let added = category.clone();
        self.ctx
            .cache
            .update::<Vec<Category>, _>(&QueryKey::Categories, |list| list.push(added));
        self.categories.push(category.clone());
        self.select_category(category.id).await?;
        Ok(category)
    }

    /// Create a service under the current category and select it
    pub async fn add_service(&mut self, name: &str) -> StepResult<Service> {
        let Some(category_id) = self.category_id() else {
            return Err(FieldErrors::single("category_id", "Select a category first").into());
        };
        let payload = AddServicePayload {
            name: name.trim().to_string(),
            category_id,
        };
        let service = self
            .ctx
            .lookup
            .add_service(&payload)
            .await
            .map_err(request_error("Add service error:"))?;
        tracing::info!(id = service.id, category_id, "Service added");

        let added = service.clone();
        self.ctx
            .cache
            .update::<Vec<Service>, _>(&QueryKey::Services(category_id), |list| {
                list.push(added)
            });
        self.services.push(service.clone());
        self.toggle_service(service.id);
        Ok(service)
    }

    /// AI-suggested service names for the current category
    pub async fn suggest_services(&self) -> StepResult<Vec<String>> {
        let Some(category_id) = self.category_id() else {
            return Ok(Vec::new());
        };
        let lookup = self.ctx.lookup.clone();
        let query = SuggestServicesQuery {
            name: self.store_name.clone(),
            category_id: category_id.to_string(),
        };
        self.ctx
            .cache
            .get_or_fetch(QueryKey::SuggestedServices(category_id), || async move {
                lookup.suggest_services(&query).await
            })
            .await
            .map_err(request_error("Suggest services error:"))
    }

    /// Select a suggested service, creating it when the category lacks it
    pub async fn pick_suggestion(&mut self, name: &str) -> StepResult<()> {
        let known = self
            .services
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .map(|s| s.id);
        match known {
            Some(id) if self.form.services.contains(&id.to_string()) => {}
            Some(id) => self.toggle_service(id),
            None => {
                self.add_service(name).await?;
            }
        }
        Ok(())
    }

    /// Ask the backend to write a bio and put it in the form
    pub async fn suggest_bio(&mut self) -> StepResult<String> {
        let payload = SuggestBioPayload {
            name: self.store_name.clone(),
            category_id: self.form.category_id.clone(),
            city_id: self.city_id.clone(),
            services: self.selected_names(),
        };
        let suggestion = self
            .ctx
            .lookup
            .suggest_bio(&payload)
            .await
            .map_err(request_error("Suggest bio error:"))?;
        self.set_bio(suggestion.bio.clone());
        Ok(suggestion.bio)
    }

    pub async fn submit(&mut self) -> StepResult<StepOutcome> {
        validate_form(&self.form)?;
        let Mode::Update(store_id) = self.mode else {
            return Ok(advance(&self.ctx));
        };
        let category_id = self
            .category_id()
            .ok_or_else(|| FieldErrors::single("category_id", "Select a valid option"))?;

        let payload = StoreCategoryBioUpdate {
            category_id,
            bio: self.form.bio.clone(),
        };
        self.ctx
            .store
            .update_category_bio(store_id, &payload)
            .await
            .map_err(request_error("Update category error:"))?;
        self.ctx
            .cache
            .update::<StoreCategoryBio, _>(&QueryKey::CategoryBio(store_id), |slice| {
                slice.category.id = category_id;
                slice.bio = payload.bio.clone();
            });

        self.flush_pending(store_id).await?;
        tracing::info!(store_id, "Category and services saved");
        Ok(StepOutcome::Saved(Notice::success("Updated successfully")))
    }

    pub fn back(&self) -> StepOutcome {
        step_back(self.mode, &self.ctx)
    }

    /// Deletes first, then adds indexed after the surviving rows
    async fn flush_pending(&mut self, store_id: StoreId) -> StepResult<()> {
        if !self.pending.deletes().is_empty() {
            let payload = DeleteStoreServices {
                delete_ids: self.pending.deletes().to_vec(),
            };
            self.ctx
                .store
                .delete_services(&payload)
                .await
                .map_err(request_error("Delete services error:"))?;
            let deleted = payload.delete_ids;
            for row_id in &deleted {
                self.pending.restore(row_id);
            }
            self.existing.retain(|s| !deleted.contains(&s.id));
            self.ctx
                .cache
                .update::<Vec<StoreService>, _>(&QueryKey::StoreServices(store_id), |rows| {
                    rows.retain(|s| !deleted.contains(&s.id))
                });
            tracing::info!(store_id, count = deleted.len(), "Store services deleted");
        }

        if !self.pending.adds().is_empty() {
            let start = self.existing.len() as u32;
            let rows: Vec<StoreServicePayload> = self
                .pending
                .adds()
                .iter()
                .zip(1..)
                .map(|(service_id, i)| StoreServicePayload {
                    store_id,
                    service_id: *service_id,
                    index: start + i,
                })
                .collect();
            let created = self
                .ctx
                .store
                .create_services(&rows)
                .await
                .map_err(request_error("Create store service error:"))?;
            tracing::info!(store_id, count = created.len(), "Store services added");
            self.existing.extend(created.iter().cloned());
            self.ctx
                .cache
                .update::<Vec<StoreService>, _>(&QueryKey::StoreServices(store_id), |list| {
                    list.extend(created)
                });
        }

        self.pending.clear();
        Ok(())
    }

    fn category_id(&self) -> Option<i64> {
        self.form.category_id.parse().ok()
    }

    async fn load_services(&self, category_id: i64) -> StepResult<Vec<Service>> {
        let lookup = self.ctx.lookup.clone();
        self.ctx
            .cache
            .get_or_fetch(QueryKey::Services(category_id), || async move {
                lookup.services(category_id).await
            })
            .await
            .map_err(request_error("Fetch services error:"))
    }

    fn select(&mut self, service_id: i64) {
        if !self.mode.is_update() {
            return;
        }
        match self.existing.iter().find(|s| s.service_id == service_id) {
            Some(row) => {
                self.pending.restore(&row.id);
            }
            None => self.pending.add(service_id),
        }
    }

    fn deselect(&mut self, service_id: &str) {
        if !self.mode.is_update() {
            return;
        }
        let Ok(service_id) = service_id.parse::<i64>() else {
            return;
        };
        if self.pending.cancel_add(|id| *id == service_id) > 0 {
            return;
        }
        if let Some(row) = self.existing.iter().find(|s| s.service_id == service_id) {
            self.pending.delete(row.id);
        }
    }

    fn sync(&self) {
        if self.mode == Mode::Create {
            self.ctx.session.update_form_data(self.form.to_patch());
        }
    }
}

async fn fetch_category_bio(ctx: &StepContext, store_id: StoreId) -> StepResult<StoreCategoryBio> {
    let store = ctx.store.clone();
    ctx.cache
        .get_or_fetch(QueryKey::CategoryBio(store_id), || async move {
            store.category_bio(store_id).await
        })
        .await
        .map_err(request_error("Fetch store error:"))
}

async fn fetch_store_services(ctx: &StepContext, store_id: StoreId) -> StepResult<Vec<StoreService>> {
    let store = ctx.store.clone();
    ctx.cache
        .get_or_fetch(QueryKey::StoreServices(store_id), || async move {
            store.services(store_id).await
        })
        .await
        .map_err(request_error("Fetch services error:"))
}
