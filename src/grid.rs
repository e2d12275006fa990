use crate::node::error::GridError;
use crate::node::color::Color;

/// A square grid of packed colors whose side is a power of two.
///
/// Pixels are addressed as `(x, y)`: `x` is the column, `y` the row.
/// Every constructor validates the shape, so a `Grid` that exists can
/// always be partitioned down to single pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
	side: usize,
	// Row-major
	pixels: Vec<Color>,
}

fn check_side(side: usize) -> Result<(), GridError> {
	if side == 0 {
		return Err(GridError::Empty);
	}
	if !side.is_power_of_two() {
		return Err(GridError::NonPowerOfTwo(side));
	}
	Ok(())
}

/// Number of pixels in a grid of side `side`, if it can be addressed.
fn area(side: usize) -> Result<usize, GridError> {
	check_side(side)?;
	side.checked_mul(side).ok_or(GridError::TooLarge(side))
}

impl Grid {
	/// Takes `side * side` colors in row-major order.
	pub fn from_rows(side: usize, pixels: Vec<Color>) -> Result<Self, GridError> {
		if pixels.len() != area(side)? {
			return Err(GridError::NonSquare);
		}
		Ok(Grid { side, pixels })
	}

	/// Takes a grid as a list of columns, so that `columns[x][y]` is the
	/// pixel at column `x`, row `y`.
	pub fn from_columns(columns: Vec<Vec<Color>>) -> Result<Self, GridError> {
		let side = columns.len();
		let len = area(side)?;
		if columns.iter().any(|col| col.len() != side) {
			return Err(GridError::NonSquare);
		}
		let mut pixels = vec![0; len];
		for (x, col) in columns.into_iter().enumerate() {
			for (y, color) in col.into_iter().enumerate() {
				pixels[y * side + x] = color;
			}
		}
		Ok(Grid { side, pixels })
	}

	/// A grid of one color.
	pub fn filled(side: usize, color: Color) -> Result<Self, GridError> {
		Self::from_rows(side, vec![color; area(side)?])
	}

	pub fn side(&self) -> usize {
		self.side
	}

	/// Pixel at column `x`, row `y`, if inside the grid.
	pub fn get(&self, x: usize, y: usize) -> Option<Color> {
		if x < self.side && y < self.side {
			Some(self.pixels[y * self.side + x])
		} else {
			None
		}
	}

	/// All pixels of the `size`×`size` square anchored at `(x, y)`, row by row.
	///
	/// The region is clipped to the grid.
	pub fn region(&self, x: usize, y: usize, size: usize) -> impl Iterator<Item = Color> + '_ {
		let x_end = (x + size).min(self.side);
		let y_end = (y + size).min(self.side);
		let x = x.min(x_end);
		(y..y_end).flat_map(move |row| {
			self.pixels[(row * self.side + x)..(row * self.side + x_end)].iter().copied()
		})
	}

	/// Checks that a `size`×`size` region at `(x, y)` is a valid quadrant
	/// of this grid.
	pub fn check_region(&self, x: usize, y: usize, size: usize) -> Result<(), GridError> {
		check_side(size)?;
		let past = |start: usize| start.checked_add(size).map_or(true, |end| end > self.side);
		if past(x) || past(y) {
			return Err(GridError::RegionOutOfBounds { x, y, size, side: self.side });
		}
		Ok(())
	}
}
