//! Step action mode

use std::fmt;

use shared::models::StoreId;

/// How a step controller runs
///
/// `Create` feeds the shared wizard session; `Update` edits one slice of an
/// existing store directly against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update(StoreId),
}

impl Mode {
    pub fn store_id(self) -> Option<StoreId> {
        match self {
            Mode::Create => None,
            Mode::Update(id) => Some(id),
        }
    }

    pub fn is_update(self) -> bool {
        matches!(self, Mode::Update(_))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Create => write!(f, "create"),
            Mode::Update(id) => write!(f, "update store {id}"),
        }
    }
}
