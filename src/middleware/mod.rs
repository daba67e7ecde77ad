pub mod gate;
pub mod response;
pub mod session;

pub use gate::route_gate_middleware;
pub use response::{ApiResponse, ApiResult};
pub use session::{require_session_middleware, resolve_session, CurrentSession};
