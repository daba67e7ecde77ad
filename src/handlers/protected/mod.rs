// handlers/protected/mod.rs - Protected handlers (signed-in session required)
//
// Every route here runs behind require_session_middleware, which puts the
// CurrentSession into request extensions. A 401 from the backend while serving
// any of these ends the session.
pub mod data;
pub mod profile;
pub mod shell;

pub use data::{record_delete, record_get, record_put, resource_get, resource_post};
pub use profile::{profile_get, profile_patch};
pub use shell::{capabilities_get, menu_get, menu_reload_post, sidebar_get};
