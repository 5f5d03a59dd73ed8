use serde::{Deserialize, Serialize};

use crate::store::{Owned, Resource};

/// A Kapacitor server attached to a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub source_id: String,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub url: String,
    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub organization: String,
}

impl Resource for Server {
    const KIND: &'static str = "server";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Owned for Server {
    fn organization(&self) -> &str {
        &self.organization
    }

    fn set_organization(&mut self, organization: &str) {
        self.organization = organization.to_string();
    }
}
