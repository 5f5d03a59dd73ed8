use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Resource;

/// Pre-built cell arrangement for one measurement. Global, never tenant scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    #[serde(rename = "app")]
    pub application: String,
    pub measurement: String,
    #[serde(default)]
    pub autoflow: bool,
    #[serde(default)]
    pub cells: Vec<Value>,
}

impl Resource for Layout {
    const KIND: &'static str = "layout";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
