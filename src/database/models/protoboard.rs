use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtoboardMeta {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub dashboard_version: String,
    #[serde(default)]
    pub measurements: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub url: String,
}

/// Dashboard template instantiated by users into their own organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protoboard {
    pub id: String,
    pub meta: ProtoboardMeta,
    #[serde(default)]
    pub data: Value,
}

impl Resource for Protoboard {
    const KIND: &'static str = "protoboard";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
