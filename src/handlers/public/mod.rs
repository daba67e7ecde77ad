// handlers/public/mod.rs - Public handlers (no session required)
//
// Liveness and session acquisition. Inputs are validated here since there is
// no trusted user context yet.
pub mod auth;
pub mod health;

pub use auth::{login_post, logout_post, providers_get};
pub use health::health_get;
