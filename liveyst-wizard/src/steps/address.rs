use shared::FieldErrors;
use shared::form::schema::{AddressForm, validate_form};
use shared::models::{City, State, StoreAddress, StoreAddressPayload, StoreId};

use super::{StepContext, StepOutcome, StepResult, advance, request_error, step_back};
use crate::cache::QueryKey;
use crate::mode::Mode;
use crate::notice::Notice;

/// Step 2: postal address and map location
pub struct AddressStep {
    mode: Mode,
    ctx: StepContext,
    form: AddressForm,
    /// Backend address row, UPDATE only
    address_id: Option<i64>,
    states: Vec<State>,
    cities: Vec<City>,
    /// Failed state or city lookup, CREATE only
    lookup_error: Option<Notice>,
}

impl AddressStep {
    pub async fn open(mode: Mode, ctx: StepContext) -> StepResult<Self> {
        // A CREATE draft stays editable when lookups are down
        let (states, lookup_error) = match load_states(&ctx).await {
            Ok(states) => (states, None),
            Err(e) if mode == Mode::Create => (Vec::new(), Some(e.notice())),
            Err(e) => return Err(e),
        };
        let mut step = Self {
            mode,
            ctx,
            form: AddressForm::default(),
            address_id: None,
            states,
            cities: Vec::new(),
            lookup_error,
        };

        match mode {
            Mode::Create => {
                step.form = AddressForm::from_form_data(&step.ctx.session.form_data());
                if step.lookup_error.is_none() {
                    if let Ok(state_id) = step.form.state_id.parse() {
                        match load_cities(&step.ctx, state_id).await {
                            Ok(cities) => step.cities = cities,
                            Err(e) => step.lookup_error = Some(e.notice()),
                        }
                    }
                }
                if step.lookup_error.is_some() {
                    tracing::warn!("Address step opened without lookup data");
                }
            }
            Mode::Update(store_id) => {
                let address = fetch_address(&step.ctx, store_id).await?;
                step.address_id = Some(address.id);
                step.form = form_from_address(&address);

                // The city only applies once its state's city list is loaded
                step.cities = load_cities(&step.ctx, address.state_id).await?;
                if step.cities.iter().any(|c| c.id == address.city_id) {
                    step.form.city_id = address.city_id.to_string();
                } else {
                    tracing::warn!(
                        store_id,
                        city_id = address.city_id,
                        "Stored city not in the state's city list"
                    );
                }
            }
        }
        Ok(step)
    }

    pub fn form(&self) -> &AddressForm {
        &self.form
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Lookup failure to show beside the form
    pub fn lookup_error(&self) -> Option<&Notice> {
        self.lookup_error.as_ref()
    }

    pub fn on_change(&mut self, form: AddressForm) {
        self.form = form;
        self.sync();
    }

    /// Pick a state: clears the city and loads that state's cities
    pub async fn select_state(&mut self, state_id: i64) -> StepResult<()> {
        let cities = load_cities(&self.ctx, state_id).await?;
        self.form.state_id = state_id.to_string();
        self.form.city_id.clear();
        self.cities = cities;
        self.lookup_error = None;
        self.sync();
        Ok(())
    }

    pub async fn submit(&mut self) -> StepResult<StepOutcome> {
        validate_form(&self.form)?;
        let Mode::Update(store_id) = self.mode else {
            return Ok(advance(&self.ctx));
        };
        let Some(address_id) = self.address_id else {
            return Err(FieldErrors::single("address_line1", "Address not loaded").into());
        };

        let payload = payload_from_form(&self.form, store_id)?;
        let saved = self
            .ctx
            .store
            .update_address(address_id, &payload)
            .await
            .map_err(request_error("Update address error:"))?;
        self.ctx.cache.set(QueryKey::Address(store_id), saved);
        tracing::info!(store_id, address_id, "Address saved");
        Ok(StepOutcome::Saved(Notice::success(
            "Address updated successfully",
        )))
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

async fn load_states(ctx: &StepContext) -> StepResult<Vec<State>> {
    let lookup = ctx.lookup.clone();
    ctx.cache
        .get_or_fetch(QueryKey::States, || async move { lookup.states().await })
        .await
        .map_err(request_error("Fetch states error:"))
}

async fn load_cities(ctx: &StepContext, state_id: i64) -> StepResult<Vec<City>> {
    let lookup = ctx.lookup.clone();
    ctx.cache
        .get_or_fetch(QueryKey::Cities(state_id), || async move {
            lookup.cities(state_id).await
        })
        .await
        .map_err(request_error("Fetch cities error:"))
}

async fn fetch_address(ctx: &StepContext, store_id: StoreId) -> StepResult<StoreAddress> {
    let store = ctx.store.clone();
    ctx.cache
        .get_or_fetch(QueryKey::Address(store_id), || async move {
            store.address(store_id).await
        })
        .await
        .map_err(request_error("Fetch address error:"))
}

/// City is left empty until the city list confirms it
fn form_from_address(address: &StoreAddress) -> AddressForm {
    AddressForm {
        address_line1: address.address_line1.clone(),
        address_line2: address.address_line2.clone(),
        state_id: address.state_id.to_string(),
        city_id: String::new(),
        pincode: address.pincode.to_string(),
        latitude: address.latitude.to_string(),
        longitude: address.longitude.to_string(),
        google_map_link: address.google_map_link.clone(),
    }
}

fn payload_from_form(form: &AddressForm, store_id: StoreId) -> Result<StoreAddressPayload, FieldErrors> {
    fn num<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, FieldErrors> {
        value
            .trim()
            .parse()
            .map_err(|_| FieldErrors::single(field, "Must be a number"))
    }

    Ok(StoreAddressPayload {
        store_id,
        address_line1: form.address_line1.clone(),
        address_line2: form.address_line2.clone(),
        state_id: num("state_id", &form.state_id)?,
        city_id: num("city_id", &form.city_id)?,
        latitude: num("latitude", &form.latitude)?,
        longitude: num("longitude", &form.longitude)?,
        google_map_link: form.google_map_link.clone(),
        pincode: num("pincode", &form.pincode)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::testing::{FakeLookupApi, Harness, STORE_ID};
    use shared::FormDataPatch;

    #[tokio::test]
    async fn test_create_seeds_from_session_and_loads_cities() {
        let h = Harness::new();
        h.ctx.session.update_form_data(FormDataPatch {
            state_id: Some("21".into()),
            city_id: Some("6".into()),
            ..Default::default()
        });

        let step = AddressStep::open(Mode::Create, h.ctx.clone()).await.unwrap();
        assert_eq!(step.form().city_id, "6");
        assert_eq!(step.states().len(), 2);
        assert_eq!(step.cities().len(), 2);
    }

    #[tokio::test]
    async fn test_create_opens_when_lookups_fail() {
        let h = Harness::with_lookup(FakeLookupApi {
            offline: true,
            ..Default::default()
        });
        h.ctx.session.update_form_data(FormDataPatch {
            address_line1: Some("Shop 4, Lake View".into()),
            state_id: Some("21".into()),
            pincode: Some("560001".into()),
            ..Default::default()
        });

        let step = AddressStep::open(Mode::Create, h.ctx.clone()).await.unwrap();
        assert_eq!(step.form().address_line1, "Shop 4, Lake View");
        assert_eq!(step.form().pincode, "560001");
        assert!(step.states().is_empty());
        assert!(step.cities().is_empty());
        let notice = step.lookup_error().unwrap();
        assert_eq!(notice.title, "Fetch states error:");
        assert_eq!(notice.description.as_deref(), Some("lookup unavailable"));
    }

    #[tokio::test]
    async fn test_update_fails_when_lookups_fail() {
        let h = Harness::with_lookup(FakeLookupApi {
            offline: true,
            ..Default::default()
        });
        let err = AddressStep::open(Mode::Update(STORE_ID), h.ctx.clone())
            .await
            .err()
            .unwrap();
        assert_eq!(err.notice().title, "Fetch states error:");
    }

    #[tokio::test]
    async fn test_state_change_resets_city_and_caches_per_state() {
        let h = Harness::new();
        let mut step = AddressStep::open(Mode::Create, h.ctx.clone()).await.unwrap();

        step.select_state(21).await.unwrap();
        let mut form = step.form().clone();
        form.city_id = "5".into();
        step.on_change(form);

        step.select_state(22).await.unwrap();
        assert_eq!(step.form().city_id, "");
        assert_eq!(step.cities()[0].name, "Kochi");

        step.select_state(21).await.unwrap();
        assert_eq!(h.lookup.count("cities 21"), 1);
        assert_eq!(h.lookup.count("cities 22"), 1);
        assert_eq!(h.ctx.session.form_data().state_id, "21");
    }

    #[tokio::test]
    async fn test_update_applies_city_after_city_list() {
        let h = Harness::new();
        let mut step = AddressStep::open(Mode::Update(STORE_ID), h.ctx.clone())
            .await
            .unwrap();
        assert_eq!(step.form().state_id, "21");
        assert_eq!(step.form().city_id, "5");
        assert_eq!(step.form().pincode, "560001");

        let mut form = step.form().clone();
        form.pincode = "560002".into();
        step.on_change(form);
        assert!(matches!(step.submit().await.unwrap(), StepOutcome::Saved(_)));

        let cached: StoreAddress = h.ctx.cache.get(&QueryKey::Address(STORE_ID)).unwrap();
        assert_eq!(cached.pincode, 560002);
        assert_eq!(cached.id, 100);
        assert_eq!(h.ctx.session.form_data().pincode, "");
    }

    #[tokio::test]
    async fn test_bad_coordinates_rejected() {
        let h = Harness::new();
        let mut step = AddressStep::open(Mode::Create, h.ctx.clone()).await.unwrap();
        step.on_change(AddressForm {
            address_line1: "Shop 4".into(),
            address_line2: "MG Road".into(),
            state_id: "21".into(),
            city_id: "5".into(),
            pincode: "560001".into(),
            latitude: "12.97N".into(),
            longitude: "77.59".into(),
            google_map_link: "https://maps.example.com/joe".into(),
        });
        let err = step.submit().await.unwrap_err();
        assert!(err.field_errors().unwrap().contains("latitude"));
        assert_eq!(h.ctx.session.step(), 1);
    }
}
