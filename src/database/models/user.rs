use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::Resource;

/// The only authentication scheme OAuth principals ever carry
pub const OAUTH2_SCHEME: &str = "oauth2";

/// Role vocabulary. `Wildcard` is only valid on submission and is resolved to the
/// organization's default role before a user is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Member,
    Viewer,
    Editor,
    Admin,
    #[serde(rename = "*")]
    Wildcard,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Member => "member",
            RoleName::Viewer => "viewer",
            RoleName::Editor => "editor",
            RoleName::Admin => "admin",
            RoleName::Wildcard => "*",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role {0}. Valid roles are 'member', 'viewer', 'editor', 'admin', and '*'")]
pub struct UnknownRole(pub String);

impl FromStr for RoleName {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(RoleName::Member),
            "viewer" => Ok(RoleName::Viewer),
            "editor" => Ok(RoleName::Editor),
            "admin" => Ok(RoleName::Admin),
            "*" => Ok(RoleName::Wildcard),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub organization: String,
    pub name: RoleName,
}

impl Role {
    pub fn new(organization: impl Into<String>, name: RoleName) -> Self {
        Self {
            organization: organization.into(),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub provider: String,
    pub scheme: String,
    #[serde(default)]
    pub super_admin: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    /// Role held in the given organization, if any
    pub fn role_in(&self, organization: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.organization == organization)
    }

    pub fn has_role_in(&self, organization: &str) -> bool {
        self.role_in(organization).is_some()
    }

    /// True when both records describe the same external identity
    pub fn same_identity(&self, other: &User) -> bool {
        self.name == other.name && self.provider == other.provider && self.scheme == other.scheme
    }
}

impl Resource for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
