pub mod icon;
pub mod node;
pub mod store;
pub mod tree;

pub use icon::Icon;
pub use node::{Capabilities, MenuNode, MenuUrl, RawMenuNode};
pub use store::{MenuState, MenuTreeStore};
pub use tree::{MenuError, MenuTree};
