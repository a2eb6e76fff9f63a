//! Dashboard routes and access guards

use std::fmt;

use shared::models::StoreId;

use crate::auth::AuthState;
use crate::session::WizardStep;

/// Independently editable slice of an existing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateSlice {
    MainInformation,
    AddressInformation,
    FeedbackUpi,
    CategoryService,
    ImpotentLinks,
    Photos,
}

impl UpdateSlice {
    pub const ALL: [UpdateSlice; 6] = [
        UpdateSlice::MainInformation,
        UpdateSlice::AddressInformation,
        UpdateSlice::FeedbackUpi,
        UpdateSlice::CategoryService,
        UpdateSlice::ImpotentLinks,
        UpdateSlice::Photos,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            UpdateSlice::MainInformation => "main-information",
            UpdateSlice::AddressInformation => "address-information",
            UpdateSlice::FeedbackUpi => "feedback-upi",
            UpdateSlice::CategoryService => "category-service",
            UpdateSlice::ImpotentLinks => "impotent-links",
            UpdateSlice::Photos => "photos",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    /// Wizard step whose controller edits this slice
    pub fn step(self) -> WizardStep {
        match self {
            UpdateSlice::MainInformation => WizardStep::MainInfo,
            UpdateSlice::AddressInformation => WizardStep::Address,
            UpdateSlice::FeedbackUpi => WizardStep::FeedbackUpi,
            UpdateSlice::CategoryService => WizardStep::CategoryServices,
            UpdateSlice::ImpotentLinks => WizardStep::Links,
            UpdateSlice::Photos => WizardStep::Photos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Account,
    Onboard { email: Option<String> },
    Profiles,
    ProfileCreate,
    ProfileUpdate { store_id: StoreId, slice: UpdateSlice },
    StoreSecret { store_id: StoreId },
    StoreStatus { store_id: StoreId },
    StatusResult { open: bool, name: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Account => "/account".into(),
            Route::Onboard { email: None } => "/account/onboard".into(),
            Route::Onboard { email: Some(email) } => format!("/account/onboard?email={email}"),
            Route::Profiles => "/profile".into(),
            Route::ProfileCreate => "/profile/create".into(),
            Route::ProfileUpdate { store_id, slice } => {
                format!("/profile/update/{store_id}/{}", slice.slug())
            }
            Route::StoreSecret { store_id } => format!("/profile/secret/{store_id}"),
            Route::StoreStatus { store_id } => format!("/status-update/{store_id}"),
            Route::StatusResult { open, name } => format!(
                "/status-update/{}?name={name}",
                if *open { "open" } else { "close" }
            ),
        }
    }

    /// Account screens an authenticated owner is bounced away from
    pub fn is_account(&self) -> bool {
        matches!(self, Route::Account | Route::Onboard { .. })
    }

    /// Screens requiring an authenticated owner
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Profiles
                | Route::ProfileCreate
                | Route::ProfileUpdate { .. }
                | Route::StoreSecret { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where a controller sends the UI next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// History back
    Back,
    To(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    Redirect(Route),
    /// Auth state still loading
    Pending,
}

/// Decide whether `route` may render for the given auth state
///
/// `previous` is the route the user was on before being sent to an account
/// screen.
pub fn guard(route: &Route, auth: &AuthState, previous: Option<&Route>) -> GuardOutcome {
    match auth {
        AuthState::Loading => GuardOutcome::Pending,
        AuthState::Anonymous if route.is_protected() => GuardOutcome::Redirect(Route::Account),
        AuthState::Authenticated(_) if route.is_account() => {
            let target = previous
                .filter(|p| !p.is_account())
                .cloned()
                .unwrap_or(Route::Profiles);
            GuardOutcome::Redirect(target)
        }
        _ => GuardOutcome::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::OwnerClaims;

    fn owner() -> AuthState {
        AuthState::Authenticated(OwnerClaims {
            id: 42,
            email: "joe@cafe.in".into(),
            name: Some("Joe".into()),
            number: None,
            roles: vec!["owner".into()],
        })
    }

    #[test]
    fn test_slice_slugs() {
        for slice in UpdateSlice::ALL {
            assert_eq!(UpdateSlice::from_slug(slice.slug()), Some(slice));
        }
        assert_eq!(UpdateSlice::from_slug("impotent-links"), Some(UpdateSlice::ImpotentLinks));
        assert_eq!(UpdateSlice::from_slug("links"), None);
        assert_eq!(
            Route::ProfileUpdate {
                store_id: 7,
                slice: UpdateSlice::AddressInformation
            }
            .path(),
            "/profile/update/7/address-information"
        );
    }

    #[test]
    fn test_protected_route_guard() {
        let route = Route::ProfileCreate;
        assert_eq!(guard(&route, &AuthState::Loading, None), GuardOutcome::Pending);
        assert_eq!(
            guard(&route, &AuthState::Anonymous, None),
            GuardOutcome::Redirect(Route::Account)
        );
        assert_eq!(guard(&route, &owner(), None), GuardOutcome::Render);
    }

    #[test]
    fn test_account_route_guard() {
        assert_eq!(
            guard(&Route::Account, &AuthState::Anonymous, None),
            GuardOutcome::Render
        );
        assert_eq!(
            guard(&Route::Account, &owner(), None),
            GuardOutcome::Redirect(Route::Profiles)
        );
        let previous = Route::StoreSecret { store_id: 7 };
        assert_eq!(
            guard(&Route::Onboard { email: None }, &owner(), Some(&previous)),
            GuardOutcome::Redirect(previous.clone())
        );
    }

    #[test]
    fn test_open_routes_always_render() {
        let status = Route::StoreStatus { store_id: 7 };
        assert_eq!(guard(&status, &AuthState::Anonymous, None), GuardOutcome::Render);
        assert_eq!(guard(&Route::Home, &owner(), None), GuardOutcome::Render);
    }
}
