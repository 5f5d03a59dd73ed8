use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Owned, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cells: Vec<Value>,
    #[serde(default)]
    pub templates: Vec<Value>,
    #[serde(default)]
    pub organization: String,
}

impl Resource for Dashboard {
    const KIND: &'static str = "dashboard";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Owned for Dashboard {
    fn organization(&self) -> &str {
        &self.organization
    }

    fn set_organization(&mut self, organization: &str) {
        self.organization = organization.to_string();
    }
}
