use crate::grid::Grid;

/// A color packed as `0xAARRGGBB`.
pub type Color = u32;

/// An unpacked color, one byte per channel.
pub type Rgba = image::Rgba<u8>;

/// Splits a packed color into its channels.
pub fn unpack(c: Color) -> Rgba {
	image::Rgba([
		(c >> 16) as u8,
		(c >> 8) as u8,
		c as u8,
		(c >> 24) as u8,
	])
}

/// Packs channels into a single color.
pub fn pack(c: Rgba) -> Color {
	(c.0[3] as u32) << 24 | (c.0[0] as u32) << 16 | (c.0[1] as u32) << 8 | c.0[2] as u32
}

fn abs_sub(a: u8, b: u8) -> u8 {
	(a as i16 - b as i16).abs() as u8
}

fn vec4_len_squared(a: u8, b: u8, c: u8, d: u8) -> u32 {
	(a as u32 * a as u32) +
	(b as u32 * b as u32) +
	(c as u32 * c as u32) +
	(d as u32 * d as u32)
}

/// Squared distance between two colors, all four channels weighted equally.
pub fn color_distance(a: Color, b: Color) -> u32 {
	let (a, b) = (unpack(a), unpack(b));
	vec4_len_squared(
		abs_sub(a.0[0], b.0[0]),
		abs_sub(a.0[1], b.0[1]),
		abs_sub(a.0[2], b.0[2]),
		abs_sub(a.0[3], b.0[3]),
	)
}

/// How a tree derives the color of an internal node and decides whether
/// two colors are alike.
///
/// Both functions must be pure: the tree calls `average` once per internal
/// node during construction and `similar` once per visited node during a
/// matching search.
pub trait ColorModel {
	/// The representative color of the `size`×`size` square at `(x, y)`.
	fn average(&self, grid: &Grid, x: usize, y: usize, size: usize) -> Color;
	/// Whether `a` is close enough to `b` to count as a match.
	fn similar(&self, a: Color, b: Color) -> bool;
}

/// Per-channel arithmetic mean, with similarity as a bound on the squared
/// channel distance.
///
/// Means are truncated toward zero. A `threshold` of 0 only accepts exact
/// matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMean {
	pub threshold: u32,
}

impl Default for ChannelMean {
	fn default() -> Self {
		ChannelMean { threshold: 256 }
	}
}

impl ColorModel for ChannelMean {
	fn average(&self, grid: &Grid, x: usize, y: usize, size: usize) -> Color {
		let (sum, count) = grid.region(x, y, size).fold(([0u64; 4], 0u64), |(mut sum, n), c| {
			let c = unpack(c);
			for (s, ch) in sum.iter_mut().zip(c.0.iter()) {
				*s += *ch as u64;
			}
			(sum, n + 1)
		});
		if count == 0 {
			return 0;
		}
		pack(image::Rgba([
			(sum[0] / count) as u8,
			(sum[1] / count) as u8,
			(sum[2] / count) as u8,
			(sum[3] / count) as u8,
		]))
	}

	fn similar(&self, a: Color, b: Color) -> bool {
		color_distance(a, b) <= self.threshold
	}
}
