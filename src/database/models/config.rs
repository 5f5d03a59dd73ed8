use serde::{Deserialize, Serialize};

use crate::store::Resource;

pub const CONFIG_ID: &str = "config";

/// Global server settings administered by super admins
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Grant SuperAdmin to every user created on first login
    #[serde(default)]
    pub super_admin_new_users: bool,
}

impl Resource for Config {
    const KIND: &'static str = "config";

    fn id(&self) -> &str {
        CONFIG_ID
    }

    // singleton
    fn set_id(&mut self, _id: String) {}
}
