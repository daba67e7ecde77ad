pub mod exclusions;
pub mod gate;
pub mod path;
pub mod resolver;

pub use exclusions::ExclusionList;
pub use gate::{AccessState, GateSnapshot, GateView, RouteAccessGate};
pub use resolver::{find_node, resolve_capabilities};
