pub mod query;

use log::debug;

use crate::grid::Grid;
use crate::node::color::ColorModel;
use crate::node::error::QuadTreeError;
use crate::node::{Node, NodeId, NodeRef};

/// A quadrant tree built once over a square pixel grid.
///
/// All nodes live in one arena owned by the tree; subnodes and parents are
/// referenced by `NodeId`. The tree has no mutating API, so a built tree
/// can be shared between threads and queried concurrently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuadrantTree {
	nodes: Vec<Node>,
	root: NodeId,
}

impl QuadrantTree {
	/// Builds a tree covering the whole grid.
	pub fn new<M: ColorModel + ?Sized>(grid: &Grid, model: &M) -> Self {
		// A validated grid's full extent is always a valid quadrant.
		let mut nodes = Vec::with_capacity(node_count(grid.side()));
		let root = mount(&mut nodes, grid, model, 0, 0, grid.side());
		debug!("built quadrant tree of side {} with {} nodes", grid.side(), nodes.len());
		QuadrantTree { nodes, root }
	}

	/// Builds a tree covering only the `size`×`size` quadrant of `grid`
	/// anchored at `(x, y)`.
	///
	/// `size` must be a power of two and the quadrant must lie inside the
	/// grid; this is checked before any node is made.
	pub fn build<M: ColorModel + ?Sized>(
		grid: &Grid,
		model: &M,
		x: usize,
		y: usize,
		size: usize,
	) -> Result<Self, QuadTreeError> {
		grid.check_region(x, y, size)?;
		let mut nodes = Vec::with_capacity(node_count(size));
		let root = mount(&mut nodes, grid, model, x, y, size);
		debug!("built quadrant tree at ({}, {}) of side {} with {} nodes", x, y, size, nodes.len());
		Ok(QuadrantTree { nodes, root })
	}

	pub fn root(&self) -> NodeRef<'_> {
		NodeRef::new(self, self.root)
	}

	/// Looks up a node by id. `None` if the id was not issued by this tree.
	pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
		if id.0 < self.nodes.len() {
			Some(NodeRef::new(self, id))
		} else {
			None
		}
	}

	pub(crate) fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	/// Side length of the covered quadrant.
	pub fn side(&self) -> usize {
		self.node(self.root).size
	}

	/// Number of levels below the root; a single-pixel tree has height 0.
	pub fn height(&self) -> usize {
		self.side().trailing_zeros() as usize
	}

	/// Total number of nodes, branches and leaves.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always false: a tree covers at least one pixel.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Every node, in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
		(0..self.nodes.len()).map(move |i| NodeRef::new(self, NodeId(i)))
	}
}

/// Nodes in a full tree of side `size`: 1 + 4 + ... + size².
///
/// Only a capacity hint, so 0 when it doesn't fit a `usize`.
fn node_count(size: usize) -> usize {
	size.checked_mul(size)
		.and_then(|n| n.checked_mul(4))
		.map_or(0, |n| (n - 1) / 3)
}

/// Recursively lays out the quadrant at `(x, y)` into `nodes`, returning
/// its id.
///
/// Subnodes are mounted before their parent, in the order upper-left,
/// upper-right, lower-left, lower-right; their parent links are filled in
/// once the parent exists.
fn mount<M: ColorModel + ?Sized>(
	nodes: &mut Vec<Node>,
	grid: &Grid,
	model: &M,
	x: usize,
	y: usize,
	size: usize,
) -> NodeId {
	if size == 1 {
		// Bounds were checked by the caller.
		let color = grid.get(x, y).unwrap_or_default();
		nodes.push(Node { x, y, size, color, parent: None, sections: None });
		return NodeId(nodes.len() - 1);
	}
	let half = size / 2;
	let positions = [
		(x, y),
		(x + half, y),
		(x, y + half),
		(x + half, y + half),
	];
	let mut sections = [NodeId(0); 4];
	for (sect, pos) in sections.iter_mut().zip(positions.iter()) {
		*sect = mount(nodes, grid, model, pos.0, pos.1, half);
	}
	let color = model.average(grid, x, y, size);
	nodes.push(Node { x, y, size, color, parent: None, sections: Some(sections) });
	let id = NodeId(nodes.len() - 1);
	for sect in sections.iter() {
		nodes[sect.0].parent = Some(id);
	}
	id
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::color::ChannelMean;
	use crate::node::error::GridError;

	#[test]
	fn uniform_grid() {
		let grid = Grid::filled(4, 5).unwrap();
		let tree = QuadrantTree::new(&grid, &ChannelMean::default());
		let root = tree.root();
		assert_eq!((root.x(), root.y(), root.size(), root.color()), (0, 0, 4, 5));
		assert_eq!(tree.len(), 21);
		assert_eq!(tree.height(), 2);
		for child in root.children() {
			assert_eq!(child.size(), 2);
			assert_eq!(child.color(), 5);
			assert_eq!(child.parent(), Some(root));
			assert_eq!(child.children().filter(|c| c.is_leaf() && c.color() == 5).count(), 4);
		}
		assert_eq!(tree.iter().filter(|n| n.is_leaf()).count(), 16);
	}

	#[test]
	fn children_in_quadrant_order() {
		let grid = Grid::from_rows(2, vec![1, 2, 3, 4]).unwrap();
		let tree = QuadrantTree::new(&grid, &ChannelMean::default());
		let root = tree.root();
		let got = root.children().map(|c| (c.x(), c.y(), c.color())).collect::<Vec<_>>();
		assert_eq!(got, vec![(0, 0, 1), (1, 0, 2), (0, 1, 3), (1, 1, 4)]);
		assert_eq!(root.parent(), None);
	}

	#[test]
	fn child_index_out_of_range() {
		let grid = Grid::filled(2, 0).unwrap();
		let tree = QuadrantTree::new(&grid, &ChannelMean::default());
		let root = tree.root();
		assert!(root.child(3).is_ok());
		assert_eq!(root.child(4), Err(QuadTreeError::OutOfRange { index: 4 }));
		let leaf = root.child(0).unwrap();
		assert_eq!(leaf.child(0), Err(QuadTreeError::OutOfRange { index: 0 }));
	}

	#[test]
	fn single_pixel() {
		let grid = Grid::filled(1, 7).unwrap();
		let tree = QuadrantTree::new(&grid, &ChannelMean::default());
		assert!(tree.root().is_leaf());
		assert_eq!(tree.height(), 0);
		assert_eq!(tree.len(), 1);
		assert_eq!(tree.get(NodeId(0)), Some(tree.root()));
		assert_eq!(tree.get(NodeId(1)), None);
	}

	#[test]
	fn build_sub_region() {
		let grid = Grid::from_rows(4, (0..16).collect()).unwrap();
		let tree = QuadrantTree::build(&grid, &ChannelMean::default(), 2, 2, 2).unwrap();
		let root = tree.root();
		assert_eq!((root.x(), root.y(), root.size()), (2, 2, 2));
		let colors = root.children().map(|c| c.color()).collect::<Vec<_>>();
		assert_eq!(colors, vec![10, 11, 14, 15]);
	}

	#[test]
	fn build_rejects_bad_region() {
		let grid = Grid::filled(4, 0).unwrap();
		let model = ChannelMean::default();
		assert_eq!(
			QuadrantTree::build(&grid, &model, 0, 0, 3),
			Err(QuadTreeError::InvalidGrid(GridError::NonPowerOfTwo(3)))
		);
		assert_eq!(
			QuadrantTree::build(&grid, &model, 0, 0, 0),
			Err(QuadTreeError::InvalidGrid(GridError::Empty))
		);
		assert!(matches!(
			QuadrantTree::build(&grid, &model, 2, 4, 2),
			Err(QuadTreeError::InvalidGrid(GridError::RegionOutOfBounds { .. }))
		));
	}

	#[test]
	fn node_count_hint() {
		assert_eq!(node_count(1), 1);
		assert_eq!(node_count(4), 21);
		assert_eq!(node_count(1usize << (usize::BITS / 2)), 0);
	}

	#[test]
	fn tree_is_shareable() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<QuadrantTree>();
	}
}
