use serde::{Deserialize, Serialize};

use super::user::RoleName;
use crate::store::Resource;

pub const DEFAULT_ORGANIZATION_ID: &str = "default";
pub const DEFAULT_ORGANIZATION_NAME: &str = "Default";

/// A tenant. Every tenant-scoped resource and every user role points at one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Role granted by mappings and by wildcard role submissions
    #[serde(default = "default_role")]
    pub default_role: RoleName,
}

fn default_role() -> RoleName {
    RoleName::Member
}

impl Organization {
    pub fn new(id: impl Into<String>, name: impl Into<String>, default_role: RoleName) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_role,
        }
    }

    /// The organization every deployment starts with
    pub fn default_organization() -> Self {
        Self::new(DEFAULT_ORGANIZATION_ID, DEFAULT_ORGANIZATION_NAME, RoleName::Member)
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_ORGANIZATION_ID
    }
}

impl Resource for Organization {
    const KIND: &'static str = "organization";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
