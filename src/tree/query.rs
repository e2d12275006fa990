//! Read-only queries over a built tree.
//!
//! Every query walks down from a starting node and clips its descent at a
//! level, counted downward from that node: level 0 stops at the node
//! itself. Results come back in depth-first quadrant order (upper-left,
//! upper-right, lower-left, lower-right at every level).
//!
//! The free functions accept an absent starting node, for callers that
//! navigate with `Option<NodeRef>`; `QuadrantTree` has shorthands that
//! start at the root.

use log::trace;

use super::QuadrantTree;
use crate::node::color::{Color, ColorModel};
use crate::node::error::QuadTreeError;
use crate::node::NodeRef;

/// Nodes found by a matching search, with how many there are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matches<'a> {
	pub nodes: Vec<NodeRef<'a>>,
	pub count: usize,
}

impl<'a> Matches<'a> {
	fn single(node: NodeRef<'a>) -> Self {
		Matches { nodes: vec![node], count: 1 }
	}

	fn append(&mut self, mut other: Matches<'a>) {
		self.count += other.count;
		self.nodes.append(&mut other.nodes);
	}
}

/// Lists the nodes `level` steps below `node`.
///
/// A leaf reached before `level` runs out stands in for its whole branch,
/// so the result always tiles `node`'s quadrant.
///
/// Fails if `level` is negative; an absent node gives an empty list.
pub fn collect_at_level<'a>(
	node: Option<NodeRef<'a>>,
	level: i32,
) -> Result<Vec<NodeRef<'a>>, QuadTreeError> {
	if level < 0 {
		return Err(QuadTreeError::InvalidLevel(level));
	}
	let mut out = Vec::new();
	if let Some(node) = node {
		trace!("collecting level {} below ({}, {})", level, node.x(), node.y());
		collect_into(node, level, &mut out);
	}
	Ok(out)
}

fn collect_into<'a>(node: NodeRef<'a>, level: i32, out: &mut Vec<NodeRef<'a>>) {
	if level == 0 || node.is_leaf() {
		out.push(node);
		return;
	}
	for child in node.children() {
		collect_into(child, level - 1, out);
	}
}

/// Finds nodes `level` steps below `node` whose color is similar to
/// `color` under `model`.
///
/// Like `collect_at_level`, a leaf reached early is tested in place of its
/// branch. A negative `level` stops at `node` itself, as 0 does.
pub fn find_matching<'a, M: ColorModel + ?Sized>(
	node: Option<NodeRef<'a>>,
	color: Color,
	level: i32,
	model: &M,
) -> Matches<'a> {
	match node {
		Some(node) => {
			trace!("matching {:#010x} at level {} below ({}, {})", color, level, node.x(), node.y());
			match_below(node, color, level, model)
		},
		None => Matches::default(),
	}
}

fn match_below<'a, M: ColorModel + ?Sized>(
	node: NodeRef<'a>,
	color: Color,
	level: i32,
	model: &M,
) -> Matches<'a> {
	if level <= 0 || node.is_leaf() {
		return if model.similar(node.color(), color) {
			Matches::single(node)
		} else {
			Matches::default()
		};
	}
	node.children().fold(Matches::default(), |mut acc, child| {
		acc.append(match_below(child, color, level - 1, model));
		acc
	})
}

/// Finds the node containing pixel `(px, py)`, at most `level` steps
/// below `node`.
///
/// Returns `None` if `node` is absent or doesn't contain the pixel. A
/// negative `level` never clips, so the search runs down to the leaf.
pub fn find_node<'a>(
	node: Option<NodeRef<'a>>,
	level: i32,
	px: usize,
	py: usize,
) -> Option<NodeRef<'a>> {
	let node = node.filter(|n| n.contains(px, py))?;
	if level == 0 || node.is_leaf() {
		return Some(node);
	}
	let child = node.children().find(|c| c.contains(px, py));
	// Negative levels stay negative instead of counting toward 0.
	let next = if level > 0 { level - 1 } else { level };
	find_node(child, next, px, py)
}

impl QuadrantTree {
	/// `collect_at_level` from the root.
	pub fn collect_at_level(&self, level: i32) -> Result<Vec<NodeRef<'_>>, QuadTreeError> {
		collect_at_level(Some(self.root()), level)
	}

	/// Every leaf, in quadrant order.
	pub fn leaves(&self) -> Vec<NodeRef<'_>> {
		let mut out = Vec::with_capacity(self.side() * self.side());
		collect_into(self.root(), self.height() as i32, &mut out);
		out
	}

	/// `find_matching` from the root.
	pub fn find_matching<M: ColorModel + ?Sized>(
		&self,
		color: Color,
		level: i32,
		model: &M,
	) -> Matches<'_> {
		find_matching(Some(self.root()), color, level, model)
	}

	/// `find_node` from the root.
	pub fn find_node(&self, level: i32, px: usize, py: usize) -> Option<NodeRef<'_>> {
		find_node(Some(self.root()), level, px, py)
	}
}
