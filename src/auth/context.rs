use crate::database::models::User;

/// Claims attached to one request. Built once by the auth middleware (or by an
/// internal caller) and never mutated; narrowing to another organization produces
/// a new value via [`AuthContext::scoped_to`].
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    is_server_call: bool,
    is_super_admin: bool,
    organization_id: Option<String>,
    user: Option<User>,
}

impl AuthContext {
    /// Trusted internal caller (start-up seeding, background jobs, login lookups)
    pub fn server() -> Self {
        Self {
            is_server_call: true,
            ..Self::default()
        }
    }

    /// No claims at all; every tenant-scoped store fails closed
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated user acting inside `organization_id`
    pub fn for_user(user: User, organization_id: Option<String>) -> Self {
        Self {
            is_server_call: false,
            is_super_admin: user.super_admin,
            organization_id,
            user: Some(user),
        }
    }

    /// Same claims, acting inside a different organization
    pub fn scoped_to(&self, organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: Some(organization_id.into()),
            ..self.clone()
        }
    }

    pub fn is_server_call(&self) -> bool {
        self.is_server_call
    }

    pub fn is_super_admin(&self) -> bool {
        self.is_super_admin
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

/// Whether a resource family is partitioned by organization or administered globally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Sources, servers, users, dashboards
    TenantScoped,
    /// Organizations, config, mappings
    Global,
}

/// Which store variant a request gets. Precedence lives here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreScope {
    Server,
    SuperAdmin,
    Tenant(String),
    Denied,
}

impl StoreScope {
    pub fn resolve(ctx: &AuthContext, class: ResourceClass) -> Self {
        if ctx.is_server_call() {
            return StoreScope::Server;
        }
        if class == ResourceClass::Global && ctx.is_super_admin() {
            return StoreScope::SuperAdmin;
        }
        match ctx.organization_id() {
            Some(org) => StoreScope::Tenant(org.to_string()),
            None => StoreScope::Denied,
        }
    }
}
