use serde::{Deserialize, Serialize};

use crate::store::{Owned, Resource};

/// A time-series database connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub url: String,
    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub telegraf: String,
    #[serde(default)]
    pub organization: String,
}

impl Resource for Source {
    const KIND: &'static str = "source";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Owned for Source {
    fn organization(&self) -> &str {
        &self.organization
    }

    fn set_organization(&mut self, organization: &str) {
        self.organization = organization.to_string();
    }
}
