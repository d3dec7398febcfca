//! Role names as the API emits them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A role granted to a user, e.g. `"Admin"` or `"TourGuide"`.
///
/// Comparison is exact: `"admin"` and `"Admin"` are different roles, because
/// the API never normalises case and neither do we.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "Admin";
    pub const MODERATOR: &'static str = "Moderator";
    pub const TOUR_GUIDE: &'static str = "TourGuide";
    pub const CRAFT_VILLAGE_OWNER: &'static str = "CraftVillageOwner";
    pub const USER: &'static str = "User";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn moderator() -> Self {
        Self::new(Self::MODERATOR)
    }

    pub fn tour_guide() -> Self {
        Self::new(Self::TOUR_GUIDE)
    }

    pub fn craft_village_owner() -> Self {
        Self::new(Self::CRAFT_VILLAGE_OWNER)
    }

    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-friendly label for role pickers.
    pub fn label(&self) -> &str {
        match self.0.as_str() {
            Self::ADMIN => "Administrator",
            Self::MODERATOR => "Moderator",
            Self::TOUR_GUIDE => "Tour guide",
            Self::CRAFT_VILLAGE_OWNER => "Craft village owner",
            Self::USER => "Traveller",
            other => other,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for Role {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Role {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
