pub mod color;
pub mod error;
pub mod image;

use crate::tree::QuadrantTree;
use color::Color;
use error::QuadTreeError;

/// Handle to a node inside the arena of the `QuadrantTree` that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Node in a quadrant tree over a pixel grid.
///
/// Either a leaf (no subnodes, exactly one pixel) or a branch with exactly
/// four subnodes, in the order upper-left, upper-right, lower-left,
/// lower-right.
///
/// It always carries a color, such that descent can stop at any level and
/// still give a meaningful preview: a leaf holds its pixel's color, a
/// branch the average over its whole quadrant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	pub(crate) x: usize,
	pub(crate) y: usize,
	pub(crate) size: usize,
	pub(crate) color: Color,
	pub(crate) parent: Option<NodeId>,
	pub(crate) sections: Option<[NodeId; 4]>,
}

impl Node {
	/// Whether `(px, py)` lies inside this node's quadrant.
	pub fn contains(&self, px: usize, py: usize) -> bool {
		px >= self.x && px <= self.x + self.size - 1 &&
			py >= self.y && py <= self.y + self.size - 1
	}

	pub fn is_leaf(&self) -> bool {
		self.sections.is_none()
	}
}

/// A node borrowed from its tree.
///
/// Cheap to copy; this is what queries hand out, and it can walk to the
/// node's children and parent.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
	tree: &'a QuadrantTree,
	id: NodeId,
}

impl<'a> NodeRef<'a> {
	pub(crate) fn new(tree: &'a QuadrantTree, id: NodeId) -> Self {
		NodeRef { tree, id }
	}

	fn node(&self) -> &'a Node {
		self.tree.node(self.id)
	}

	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Column of the quadrant's upper-left pixel.
	pub fn x(&self) -> usize {
		self.node().x
	}

	/// Row of the quadrant's upper-left pixel.
	pub fn y(&self) -> usize {
		self.node().y
	}

	/// Side length of the quadrant.
	pub fn size(&self) -> usize {
		self.node().size
	}

	pub fn color(&self) -> Color {
		self.node().color
	}

	pub fn contains(&self, px: usize, py: usize) -> bool {
		self.node().contains(px, py)
	}

	pub fn is_leaf(&self) -> bool {
		self.node().is_leaf()
	}

	/// The subnode at `index` (0 upper-left, 1 upper-right, 2 lower-left,
	/// 3 lower-right).
	///
	/// Fails for any other index, and for every index on a leaf.
	pub fn child(&self, index: usize) -> Result<NodeRef<'a>, QuadTreeError> {
		match self.node().sections {
			Some(ref sects) if index < 4 => Ok(NodeRef::new(self.tree, sects[index])),
			_ => Err(QuadTreeError::OutOfRange { index }),
		}
	}

	/// The four subnodes in quadrant order; empty for a leaf.
	pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
		let tree = self.tree;
		self.node().sections.iter()
			.flat_map(|sects| sects.iter())
			.map(move |id| NodeRef::new(tree, *id))
	}

	pub fn parent(&self) -> Option<NodeRef<'a>> {
		self.node().parent.map(|id| NodeRef::new(self.tree, id))
	}

	/// Parent, grandparent and so on up to the root.
	pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
		std::iter::successors(self.parent(), |n| n.parent())
	}

	/// Number of steps up to the root.
	pub fn depth(&self) -> usize {
		self.ancestors().count()
	}
}

impl<'a> std::fmt::Debug for NodeRef<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NodeRef")
			.field("x", &self.x())
			.field("y", &self.y())
			.field("size", &self.size())
			.field("color", &format_args!("{:#010x}", self.color()))
			.finish()
	}
}

impl<'a> PartialEq for NodeRef<'a> {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.tree, other.tree) && self.id == other.id
	}
}

impl<'a> Eq for NodeRef<'a> {}
