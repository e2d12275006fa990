use thiserror::Error;

/// Reason why a pixel grid (or a region of one) can't hold a quadrant tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
	/// The grid has no pixels at all.
	#[error("grid is empty")]
	Empty,
	/// The grid's dimensions are not equal; the grid is not a square.
	#[error("grid is not square")]
	NonSquare,
	/// The grid's (or region's) side length is not a power of two.
	#[error("side length {0} is not a power of two")]
	NonPowerOfTwo(usize),
	/// The grid's side is too large for its pixel count to be addressed.
	#[error("side length {0} is too large")]
	TooLarge(usize),
	/// The requested region extends past the edge of the grid.
	#[error("region at ({x}, {y}) of size {size} does not fit in a grid of side {side}")]
	RegionOutOfBounds {
		x: usize,
		y: usize,
		size: usize,
		side: usize,
	},
}

/// Reason why a tree operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuadTreeError {
	/// A child index outside `0..4`, or a child lookup on a leaf.
	#[error("no child at index {index}")]
	OutOfRange { index: usize },
	/// A negative level was passed to a level-bounded listing.
	#[error("level {0} is negative")]
	InvalidLevel(i32),
	/// The pixel grid can't be partitioned into quadrants.
	#[error("invalid grid: {0}")]
	InvalidGrid(#[from] GridError),
}
