pub mod claims;
pub mod context;
pub mod principal;
pub mod role_guard;

pub use claims::{generate_jwt, validate_jwt, Claims, JwtError};
pub use context::{AuthContext, ResourceClass, StoreScope};
pub use principal::{apply_mapping, Principal, PrincipalRoleMapper, SUPER_ADMIN_ISSUER};
pub use role_guard::{RoleGuard, RoleGuardError, RoleRequest};
