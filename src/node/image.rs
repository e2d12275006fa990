use super::color::{pack, unpack, Color};
use super::error::{GridError, QuadTreeError};
use super::NodeRef;
use crate::grid::Grid;

impl Grid {
	/// Reads an image into a grid of packed colors.
	///
	/// The image must be square with a power-of-two side.
	pub fn from_image(img: &image::RgbaImage) -> Result<Self, GridError> {
		if img.width() != img.height() {
			return Err(GridError::NonSquare);
		}
		let side = img.width() as usize;
		Grid::from_rows(side, img.pixels().map(|p| pack(*p)).collect())
	}
}

/// Checks that `img` is square and that every node's quadrant lies inside it.
fn check_canvas(img: &image::RgbaImage, nodes: &[NodeRef<'_>]) -> Result<(), QuadTreeError> {
	if img.width() != img.height() {
		return Err(GridError::NonSquare.into());
	}
	let side = img.width() as usize;
	for node in nodes {
		let (x, y, size) = (node.x(), node.y(), node.size());
		if x + size > side || y + size > side {
			return Err(GridError::RegionOutOfBounds { x, y, size, side }.into());
		}
	}
	Ok(())
}

/// Paints each node's quadrant into `img`, in its own color.
///
/// Feeding it a level listing gives a preview of the image at that level
/// of detail. Nodes are placed at their grid coordinates, so every one of
/// them must fit inside the image; nothing is drawn otherwise.
pub fn draw_nodes(img: &mut image::RgbaImage, nodes: &[NodeRef<'_>]) -> Result<(), QuadTreeError> {
	check_canvas(img, nodes)?;
	for node in nodes {
		let size = node.size() as u32;
		image::imageops::replace(
			img,
			&image::RgbaImage::from_pixel(size, size, unpack(node.color())),
			node.x() as u32,
			node.y() as u32,
		);
	}
	Ok(())
}

/// Draws a one-pixel border around each node's quadrant in `color`.
///
/// Single-pixel nodes are filled. Same placement rules as `draw_nodes`.
pub fn outline_nodes(
	img: &mut image::RgbaImage,
	nodes: &[NodeRef<'_>],
	color: Color,
) -> Result<(), QuadTreeError> {
	check_canvas(img, nodes)?;
	let c = unpack(color);
	for node in nodes {
		let (x0, y0) = (node.x() as u32, node.y() as u32);
		let last = node.size() as u32 - 1;
		for i in 0..=last {
			img.put_pixel(x0 + i, y0, c);
			img.put_pixel(x0 + i, y0 + last, c);
			img.put_pixel(x0, y0 + i, c);
			img.put_pixel(x0 + last, y0 + i, c);
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::color::ChannelMean;
	use crate::tree::QuadrantTree;

	#[test]
	fn grid_from_image() {
		let mut img = image::RgbaImage::new(2, 2);
		img.put_pixel(1, 0, image::Rgba([0x12, 0x34, 0x56, 0xff]));
		let grid = Grid::from_image(&img).unwrap();
		assert_eq!(grid.get(1, 0), Some(0xff_12_34_56));
		assert_eq!(grid.get(0, 1), Some(0));
		assert_eq!(Grid::from_image(&image::RgbaImage::new(2, 4)), Err(GridError::NonSquare));
		assert_eq!(Grid::from_image(&image::RgbaImage::new(3, 3)), Err(GridError::NonPowerOfTwo(3)));
	}

	#[test]
	fn draw_level_preview() {
		let grid = Grid::from_rows(4, (0..16).map(|n| 0xff_00_00_00 | n * 16).collect()).unwrap();
		let tree = QuadrantTree::new(&grid, &ChannelMean::default());
		let mut img = image::RgbaImage::new(4, 4);
		draw_nodes(&mut img, &tree.collect_at_level(1).unwrap()).unwrap();
		// Upper-left quadrant averages 0, 16, 64, 80
		let expected = unpack(tree.root().child(0).unwrap().color());
		assert_eq!(*img.get_pixel(0, 0), expected);
		assert_eq!(*img.get_pixel(1, 1), expected);
		assert_eq!(expected, image::Rgba([0, 0, 40, 0xff]));

		draw_nodes(&mut img, &tree.leaves()).unwrap();
		assert_eq!(Grid::from_image(&img).unwrap(), grid);
	}

	#[test]
	fn outline() {
		let grid = Grid::filled(4, 0).unwrap();
		let tree = QuadrantTree::new(&grid, &ChannelMean::default());
		let mut img = image::RgbaImage::new(4, 4);
		let quads = tree.collect_at_level(1).unwrap();
		outline_nodes(&mut img, &quads[3..], 0xff_ff_00_00).unwrap();
		assert_eq!(*img.get_pixel(2, 2), image::Rgba([0xff, 0, 0, 0xff]));
		assert_eq!(*img.get_pixel(1, 1), image::Rgba([0, 0, 0, 0]));
	}

	#[test]
	fn canvas_must_be_square() {
		let tree = QuadrantTree::new(&Grid::filled(2, 0).unwrap(), &ChannelMean::default());
		let mut img = image::RgbaImage::new(2, 1);
		assert_eq!(
			draw_nodes(&mut img, &tree.leaves()),
			Err(QuadTreeError::InvalidGrid(GridError::NonSquare))
		);
	}

	#[test]
	fn larger_canvas_takes_smaller_tree() {
		let tree = QuadrantTree::new(&Grid::filled(2, 0xff_00_00_ff).unwrap(), &ChannelMean::default());
		let mut img = image::RgbaImage::new(4, 4);
		draw_nodes(&mut img, &tree.leaves()).unwrap();
		assert_eq!(*img.get_pixel(1, 1), image::Rgba([0, 0, 0xff, 0xff]));
		assert_eq!(*img.get_pixel(2, 2), image::Rgba([0, 0, 0, 0]));
	}

	#[test]
	fn sub_region_nodes_are_placed_at_their_origin() {
		let grid = Grid::from_rows(4, (0..16).map(|n| 0xff_00_00_00 | n).collect()).unwrap();
		let tree = QuadrantTree::build(&grid, &ChannelMean::default(), 2, 2, 2).unwrap();

		let mut small = image::RgbaImage::new(2, 2);
		let err = Err(QuadTreeError::InvalidGrid(GridError::RegionOutOfBounds { x: 2, y: 2, size: 1, side: 2 }));
		assert_eq!(draw_nodes(&mut small, &tree.leaves()), err);
		assert_eq!(outline_nodes(&mut small, &tree.leaves(), 0xff_ff_ff_ff), err);
		assert!(small.pixels().all(|p| *p == image::Rgba([0, 0, 0, 0])));

		let mut full = image::RgbaImage::new(4, 4);
		draw_nodes(&mut full, &tree.leaves()).unwrap();
		assert_eq!(*full.get_pixel(3, 3), image::Rgba([0, 0, 15, 0xff]));
		assert_eq!(*full.get_pixel(1, 1), image::Rgba([0, 0, 0, 0]));
	}

	#[test]
	fn nodes_from_a_larger_tree_are_refused_whole() {
		let tree = QuadrantTree::new(&Grid::filled(4, 0xff_ff_ff_ff).unwrap(), &ChannelMean::default());
		let mut img = image::RgbaImage::new(2, 2);
		let quads = tree.collect_at_level(1).unwrap();
		assert_eq!(
			outline_nodes(&mut img, &quads, 0xff_ff_00_00),
			Err(QuadTreeError::InvalidGrid(GridError::RegionOutOfBounds { x: 2, y: 0, size: 2, side: 2 }))
		);
		// The first quadrant fits, but nothing is drawn once any node doesn't.
		assert!(img.pixels().all(|p| *p == image::Rgba([0, 0, 0, 0])));
	}
}
