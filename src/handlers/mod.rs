// handlers/mod.rs - two handler tiers
//
// Public (no auth) → Protected (JWT auth, AuthContext in request extensions)
pub mod protected;
pub mod public;
