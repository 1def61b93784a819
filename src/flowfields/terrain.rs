//! Static description of the ground: whether each cell can be walked on at all
//! (water, cliffs) and the base movement cost of open ground.
//!
//! A [TerrainMap] is sized to the playable bounds of a [GridGeometry] and is
//! indexed by [FieldCell]. It can be built by hand or loaded from disk:
//!
//! * `ron` - a serialised [TerrainMap]
//! * `csv` - one line per grid row, each value the base cost of a cell with
//!   [TerrainMap::NON_TRAVERSABLE] marking water/cliffs
//! * `heightmap` - a greyscale image where white is open ground and black is
//!   non-traversable
//!
//! For the file formats the first line (or the top of the image) is the
//! northern-most row of the grid.
//!

use crate::prelude::*;

/// Terrain information of a single cell
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainCell {
	/// Whether any ground-bound actor can enter the cell
	traversable: bool,
	/// Cost of entering the cell, at least `1.0`
	base_cost: f32,
}

impl Default for TerrainCell {
	fn default() -> Self {
		TerrainCell {
			traversable: true,
			base_cost: 1.0,
		}
	}
}

impl TerrainCell {
	/// Create a new [TerrainCell], costs below `1.0` are raised to `1.0`
	pub fn new(traversable: bool, base_cost: f32) -> Self {
		TerrainCell {
			traversable,
			base_cost: base_cost.max(1.0),
		}
	}
	/// A cell which can never be entered
	pub fn blocked() -> Self {
		TerrainCell {
			traversable: false,
			base_cost: 1.0,
		}
	}
	/// Whether ground-bound actors can enter the cell
	pub fn is_traversable(&self) -> bool {
		self.traversable
	}
	/// Get the cost of entering the cell
	pub fn get_base_cost(&self) -> f32 {
		self.base_cost
	}
}

/// Per-cell traversability and base cost of the playable bounds
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMap {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Row-major cells
	cells: Vec<TerrainCell>,
}

impl TerrainMap {
	/// Value in file based terrain that marks a cell as non-traversable
	pub const NON_TRAVERSABLE: u8 = 255;
	/// Create a [TerrainMap] of open ground
	pub fn new(width: usize, height: usize) -> Self {
		TerrainMap {
			width,
			height,
			cells: vec![TerrainCell::default(); width * height],
		}
	}
	/// Create a [TerrainMap] matching the bounds of a [GridGeometry]
	pub fn from_geometry(geometry: &GridGeometry) -> Self {
		TerrainMap::new(geometry.get_width(), geometry.get_height())
	}
	/// Get the `(width, height)` of the map
	pub fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	/// Retrieve the terrain of a cell
	pub fn get_cell(&self, field_cell: FieldCell) -> TerrainCell {
		self.cells[field_index("TerrainMap", self.width, self.height, field_cell)]
	}
	/// Replace the terrain of a cell
	pub fn set_cell(&mut self, terrain: TerrainCell, field_cell: FieldCell) {
		let index = field_index("TerrainMap", self.width, self.height, field_cell);
		self.cells[index] = terrain;
	}
	/// Whether ground-bound actors can enter a cell
	pub fn is_traversable(&self, field_cell: FieldCell) -> bool {
		self.get_cell(field_cell).is_traversable()
	}
	/// Get the cost of entering a cell
	pub fn base_cost(&self, field_cell: FieldCell) -> f32 {
		self.get_cell(field_cell).get_base_cost()
	}
	/// Convert a file value into a [TerrainCell]
	#[cfg(any(feature = "csv", feature = "heightmap"))]
	fn cell_from_value(value: u8) -> TerrainCell {
		if value == Self::NON_TRAVERSABLE {
			TerrainCell::blocked()
		} else {
			TerrainCell::new(true, value as f32)
		}
	}
	/// From a `ron` file generate the [TerrainMap]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Self {
		let file = std::fs::File::open(&path).expect("Failed opening TerrainMap file");
		let mut map: TerrainMap = match ron::de::from_reader(file) {
			Ok(map) => map,
			Err(e) => panic!("Failed deserializing TerrainMap: {}", e),
		};
		if map.cells.len() != map.width * map.height {
			panic!(
				"TerrainMap {} holds {} cells, expected {}x{}",
				path,
				map.cells.len(),
				map.width,
				map.height
			);
		}
		// the file bypasses TerrainCell::new, hold it to the same floor
		let mut raised = 0;
		for cell in map.cells.iter_mut() {
			if cell.base_cost < 1.0 || cell.base_cost.is_nan() {
				*cell = TerrainCell::new(cell.traversable, cell.base_cost);
				raised += 1;
			}
		}
		if raised > 0 {
			bevy::log::warn!(
				"TerrainMap {} has {} cells costing less than 1, raised to 1",
				path, raised
			);
		}
		map
	}
	/// From a CSV file of `u8` costs generate the [TerrainMap]
	#[cfg(feature = "csv")]
	pub fn from_csv(path: String) -> Self {
		let data = std::fs::File::open(&path).expect("Failed opening csv");
		let mut rdr = csv::ReaderBuilder::new()
			.has_headers(false)
			.from_reader(data);
		let mut lines: Vec<Vec<u8>> = Vec::new();
		for record in rdr.records() {
			let record = match record {
				Ok(record) => record,
				Err(e) => panic!("Failed reading csv record of {}: {}", path, e),
			};
			let values = record
				.iter()
				.map(|value| value.trim().parse::<u8>().expect("CSV expects u8 values"))
				.collect();
			lines.push(values);
		}
		let height = lines.len();
		let width = lines.first().map_or(0, |line| line.len());
		if width == 0 || lines.iter().any(|line| line.len() != width) {
			panic!("CSV terrain {} must be a non-empty rectangle of values", path);
		}
		let mut map = TerrainMap::new(width, height);
		// first line is the northern-most row
		for (line_number, line) in lines.iter().enumerate() {
			let row = height - 1 - line_number;
			for (column, value) in line.iter().enumerate() {
				map.set_cell(Self::cell_from_value(*value), FieldCell::new(column, row));
			}
		}
		map
	}
	/// Create a [TerrainMap] from a greyscale image where each pixel
	/// represents a cell. White is the cheapest ground, pure black is
	/// non-traversable
	#[cfg(feature = "heightmap")]
	pub fn from_heightmap(path: String) -> Self {
		use photon_rs::native::open_image;
		let img = open_image(&path).expect("Failed to open heightmap");
		let width = img.get_width() as usize;
		let height = img.get_height() as usize;
		let raw_pixels = img.get_raw_pixels();
		// raw pixels run from the top left in sets of RGB or RGBA
		let chunk_size = if raw_pixels.len() == width * height * 4 {
			4
		} else {
			3
		};
		let mut map = TerrainMap::new(width, height);
		for (index, px) in raw_pixels.chunks(chunk_size).enumerate() {
			let column = index % width;
			let row = height - 1 - index / width;
			// careful of u8 overflow
			let colour_avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
			let value = (255 - colour_avg as u8).clamp(1, 255);
			map.set_cell(Self::cell_from_value(value), FieldCell::new(column, row));
		}
		map
	}
}
