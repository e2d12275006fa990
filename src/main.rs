use image::error::ImageError;
use log::info;

use quadrant_tree::color::{ChannelMean, Color};
use quadrant_tree::error::QuadTreeError;
use quadrant_tree::image::{draw_nodes, outline_nodes};
use quadrant_tree::{Grid, QuadrantTree};

/// Color used to mark matching quadrants in the preview.
const HIGHLIGHT: Color = 0xff_ff_00_00;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// Everything the command line can set.
#[derive(Debug)]
struct Settings {
	input: String,
	level: i32,
	target: Option<Color>,
	threshold: u32,
	point: Option<(usize, usize)>,
	output: Option<String>,
}

/// Accepts `0xAARRGGBB`, `#AARRGGBB` or a decimal number.
///
/// Six hex digits (`#RRGGBB`) are taken as fully opaque.
fn parse_color(s: &str) -> Option<Color> {
	if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix('#')) {
		let c = Color::from_str_radix(hex, 16).ok()?;
		if hex.len() <= 6 {
			Some(0xff_00_00_00 | c)
		} else {
			Some(c)
		}
	} else {
		s.parse().ok()
	}
}

fn parse_point(s: &str) -> Option<(usize, usize)> {
	let mut parts = s.splitn(2, ',');
	let x = parts.next()?.trim().parse().ok()?;
	let y = parts.next()?.trim().parse().ok()?;
	Some((x, y))
}

impl Settings {
	fn from_args() -> Self {
		let clap_matches = clap::App::new("quadrant_tree")
			.version("0.1.0")
			.about("Builds a quadrant tree over a square image and queries it.")
			.arg_from_usage("-l, --level=[N] 'Level below the root to list, match and look up at; defaults to 0'")
			.arg_from_usage("-m, --match=[COLOR] 'Find quadrants similar to COLOR (decimal, 0xAARRGGBB or #AARRGGBB; 6 hex digits are opaque)'")
			.arg_from_usage("-t, --threshold=[N] 'Squared channel distance still counted as similar; defaults to 256'")
			.arg_from_usage("-p, --point=[X,Y] 'Find the quadrant containing pixel X,Y'")
			.arg_from_usage("-o, --output=[OUTPUT] 'Write a PNG preview of the level, with matches outlined'")
			.arg_from_usage("<INPUT> 'Path to a square image with a power-of-two side'")
			.get_matches();

		Settings {
			input: clap_matches.value_of("INPUT").unwrap_or_default().to_string(),
			level: match clap_matches.value_of("level").unwrap_or("0").parse() {
				Ok(n) => n,
				Err(_) => error_exit("Non-numeric value for level", 2)
			},
			target: clap_matches.value_of("match").map(|s| match parse_color(s) {
				Some(c) => c,
				None => error_exit("Invalid value for match", 2)
			}),
			threshold: match clap_matches.value_of("threshold").unwrap_or("256").parse() {
				Ok(n) => n,
				Err(_) => error_exit("Non-numeric value for threshold", 2)
			},
			point: clap_matches.value_of("point").map(|s| match parse_point(s) {
				Some(p) => p,
				None => error_exit("Point must be given as X,Y", 2)
			}),
			output: clap_matches.value_of("output").map(str::to_string),
		}
	}
}

/// `clap`-based CLI for inspecting an image through its quadrant tree.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 10: other, potentially unknown error
fn main() {
	env_logger::init();
	let settings = Settings::from_args();
	info!("settings: {:?}", settings);

	let source = match image::open(&settings.input) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) => ("Invalid image data", 4),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10)
			};
			error_exit(msg, code)
		}
	}.into_rgba8();
	let grid = match Grid::from_image(&source) {
		Ok(g) => g,
		Err(e) => error_exit(&format!("Input image has invalid dimensions: {}", e), 4)
	};
	let model = ChannelMean { threshold: settings.threshold };
	let tree = QuadrantTree::new(&grid, &model);
	info!("tree has {} nodes over {} levels", tree.len(), tree.height());

	let level_nodes = match tree.collect_at_level(settings.level) {
		Ok(n) => n,
		Err(QuadTreeError::InvalidLevel(_)) => error_exit("Level must not be negative", 2),
		Err(e) => error_exit(&e.to_string(), 10)
	};
	println!("{} quadrants at level {}", level_nodes.len(), settings.level);

	let matches = settings.target.map(|c| tree.find_matching(c, settings.level, &model));
	if let Some(ref m) = matches {
		println!("{} quadrants similar to {:#010x}", m.count, settings.target.unwrap_or_default());
		for n in m.nodes.iter() {
			println!("  ({}, {}) size {} color {:#010x}", n.x(), n.y(), n.size(), n.color());
		}
	}

	if let Some((px, py)) = settings.point {
		match tree.find_node(settings.level, px, py) {
			Some(n) => println!(
				"({}, {}) is in quadrant ({}, {}) size {} color {:#010x}",
				px, py, n.x(), n.y(), n.size(), n.color()
			),
			None => error_exit("Point is outside the image", 2)
		}
	}

	if let Some(ref path) = settings.output {
		let mut output = image::RgbaImage::new(source.width(), source.height());
		let drawn = draw_nodes(&mut output, &level_nodes).and_then(|_| match matches {
			Some(ref m) => outline_nodes(&mut output, &m.nodes, HIGHLIGHT),
			None => Ok(()),
		});
		if let Err(e) = drawn {
			error_exit(&e.to_string(), 10)
		}
		match output.save(path) {
			Ok(_) => (),
			Err(_) => error_exit("Could not save output", 3)
		}
	}
}
