use serde::{Deserialize, Serialize};

use crate::store::Resource;

/// Matches any provider, scheme or provider organization
pub const MAPPING_WILDCARD: &str = "*";

/// Declarative rule granting an organization's default role to external principals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default)]
    pub id: String,
    pub organization: String,
    pub provider: String,
    pub scheme: String,
    pub provider_organization: String,
}

impl Mapping {
    /// A mapping admitting every principal into `organization`
    pub fn wildcard(organization: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            organization: organization.into(),
            provider: MAPPING_WILDCARD.to_string(),
            scheme: MAPPING_WILDCARD.to_string(),
            provider_organization: MAPPING_WILDCARD.to_string(),
        }
    }
}

impl Resource for Mapping {
    const KIND: &'static str = "mapping";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
