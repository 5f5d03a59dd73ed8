pub mod login_service;
pub mod organization_service;
pub mod user_service;

use thiserror::Error;

use crate::auth::RoleGuardError;
use crate::store::StoreError;

pub use login_service::LoginService;
pub use organization_service::OrganizationService;
pub use user_service::{UserPatch, UserService, UserSubmission};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    RoleGuard(#[from] RoleGuardError),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid request: {0}")]
    Invalid(String),
}
