pub mod grid;
pub mod node;
pub mod tree;

pub use grid::Grid;
pub use node::*;
pub use tree::query::{collect_at_level, find_matching, find_node, Matches};
pub use tree::QuadrantTree;
