//! XML layer: arena tree, path queries, and the scoped navigator.

pub mod navigator;
pub mod path;
pub mod tree;

pub use navigator::Navigator;
pub use tree::{NodeData, NodeId, XmlNode, XmlTree};
