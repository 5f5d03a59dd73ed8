use serde::{Deserialize, Serialize};

use crate::store::Resource;

/// Collector configuration snippet offered when wiring up a new source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub template: String,
}

impl Resource for ConfigTemplate {
    const KIND: &'static str = "config_template";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
