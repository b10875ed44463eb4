//! `surfaces.txt` surface definition support.
//!
//! A shell describes its visual compositions in one or more scoped text files.
//! Each `surfaceN` block lists the layers (elements) drawn for surface `N`, its
//! collision rectangles, and its animations. A single header may select many
//! surface IDs at once, in which case every body line applies to all of them.
//!
//! # Grammar Overview
//!
//! ```text
//! descript
//! {
//!     version,1
//! }
//!
//! surface0-9,!5
//! {
//!     element0,base,body.png,0,0
//!     element1,overlay,face0.png,40,60
//!     collision0,40,20,120,80,Head
//!     animation10.interval,sometimes
//!     animation10.pattern0,overlay,1000,50,40,60
//!     animation10.pattern1,overlay,-1,50,0,0
//! }
//!
//! sakura.surface.alias
//! {
//!     smile,[1,2]
//! }
//! ```
//!
//! # Usage Examples
//!
//! ```no_run
//! use mascot_types::file::surfaces::SurfaceGraph;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = SurfaceGraph::load_dir("shell/master")?;
//!
//! for (id, surface) in graph.surfaces() {
//!     println!("surface{}: {} elements, {} animations", id, surface.elements.len(), surface.animations.len());
//! }
//! # Ok(())
//! # }
//! ```

mod interval;
mod parser;
mod range;


use std::{
	collections::BTreeMap,
	fmt::Formatter,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::{error::ParseError, text::decode_text};

pub use interval::{Interval, IntervalClass};
pub use range::parse_id_set;

/// Surface definition file constants.
pub mod constants {
	/// Canonical definition file, always parsed first
	pub const CANONICAL_FILE_NAME: &str = "surfaces.txt";

	/// Prefix shared by all definition files
	pub const FILE_PREFIX: &str = "surfaces";

	/// Extension of definition files
	pub const FILE_EXTENSION: &str = "txt";

	/// Interval used for animations that never declared one
	pub const DEFAULT_INTERVAL: &str = "never";
}

/// Composition method of an element layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
	/// Base layer
	Base,
	/// Alpha-blended overlay
	#[default]
	Overlay,
	/// Replaces the pixels underneath
	Replace,
	/// Any other method, drawn like an overlay
	Unknown,
}

impl Method {
	/// Parses a method name (case-insensitive).
	///
	/// `overlayfast` and other `overlay*` variants map to [`Method::Overlay`].
	pub fn parse(value: &str) -> Self {
		let value = value.trim().to_ascii_lowercase();
		match value.as_str() {
			"base" => Self::Base,
			"replace" => Self::Replace,
			v if v.starts_with("overlay") => Self::Overlay,
			_ => Self::Unknown,
		}
	}
}

impl std::fmt::Display for Method {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Base => write!(f, "base"),
			Self::Overlay => write!(f, "overlay"),
			Self::Replace => write!(f, "replace"),
			Self::Unknown => write!(f, "unknown"),
		}
	}
}

/// A single layer of a surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
	/// Composition method
	pub method: Method,
	/// Image file name, or textually another surface ID
	pub file: String,
	/// Horizontal offset
	pub x: i32,
	/// Vertical offset
	pub y: i32,
}

impl Element {
	/// Returns the referenced surface ID if `file` is a plain integer
	pub fn surface_ref(&self) -> Option<u32> {
		self.file.trim().parse().ok()
	}
}

/// Collision rectangle, in left/top/right/bottom order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
	/// Collision ID
	pub id: u32,
	/// Left
	pub x: i32,
	/// Top
	pub y: i32,
	/// Right
	pub x2: i32,
	/// Bottom
	pub y2: i32,
	/// Hit area name
	pub name: String,
}

impl Collision {
	/// Width of the rectangle
	pub fn width(&self) -> u32 {
		self.x2.abs_diff(self.x)
	}

	/// Height of the rectangle
	pub fn height(&self) -> u32 {
		self.y2.abs_diff(self.y)
	}
}

/// One frame of an animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
	/// Composition method, kept verbatim
	pub method: String,
	/// Referenced surface, `-1` hides the layer
	pub surface_ref: String,
	/// Frame wait, either a number or a `min-max` range
	pub wait: String,
	/// Horizontal offset
	pub x: i32,
	/// Vertical offset
	pub y: i32,
}

impl Pattern {
	/// Returns the referenced surface ID, `None` for hidden or non-numeric references
	pub fn surface_id(&self) -> Option<u32> {
		self.surface_ref.trim().parse().ok()
	}
}

/// An animation: an interval class and its ordered frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
	/// When the animation plays
	pub interval: Interval,
	/// Frames in declaration order; index 0 is the default frame
	pub patterns: Vec<Pattern>,
}

impl Default for Animation {
	fn default() -> Self {
		Self {
			interval: Interval::parse(constants::DEFAULT_INTERVAL),
			patterns: Vec::new(),
		}
	}
}

/// A numbered visual composition unit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Surface {
	/// Layers in draw order
	pub elements: Vec<Element>,
	/// Hit areas in declaration order
	pub collisions: Vec<Collision>,
	/// Animations keyed by ID, iterated in ascending order
	pub animations: BTreeMap<u32, Animation>,
}

/// All surfaces of a shell, as parsed from its definition files
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurfaceGraph {
	/// Surfaces by ID
	pub surfaces: BTreeMap<u32, Surface>,
	/// Alias table entries, keyed `<scope>.<alias>`
	pub aliases: BTreeMap<String, String>,
	/// Global `descript` block settings
	pub settings: BTreeMap<String, String>,
}

impl SurfaceGraph {
	/// Parses a graph from the aggregated text of all definition files.
	pub fn parse(text: &str) -> Self {
		parser::Parser::new().parse(text)
	}

	/// Loads and parses every definition file in a shell directory.
	///
	/// `surfaces.txt` is read first, the other `surfaces*.txt` files follow in
	/// alphabetical order.
	pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ParseError> {
		let dir = dir.as_ref();
		let files = Self::definition_files(dir)?;
		if files.is_empty() {
			return Err(ParseError::NoSurfaceFiles {
				dir: dir.to_path_buf(),
			});
		}

		let mut text = String::new();
		for path in &files {
			let data = std::fs::read(path).map_err(|e| ParseError::read(path, e))?;
			let (decoded, encoding) = decode_text(&data);
			log::debug!("Read {} ({})", path.display(), encoding);
			text.push_str(&decoded);
			text.push('\n');
		}

		Ok(Self::parse(&text))
	}

	/// Lists the definition files of a directory in parse order.
	pub fn definition_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ParseError> {
		let dir = dir.as_ref();
		let mut canonical = None;
		let mut rest = Vec::new();

		for entry in std::fs::read_dir(dir).map_err(|e| ParseError::read(dir, e))? {
			let entry = entry?;
			if !entry.file_type()?.is_file() {
				continue;
			}
			let name = entry.file_name().to_string_lossy().to_lowercase();
			if name == constants::CANONICAL_FILE_NAME {
				canonical = Some(entry.path());
			} else if is_definition_file_name(&name) {
				rest.push((name, entry.path()));
			}
		}

		rest.sort();
		Ok(canonical.into_iter().chain(rest.into_iter().map(|(_, path)| path)).collect())
	}

	/// Returns the surface with the given ID
	pub fn surface(&self, id: u32) -> Option<&Surface> {
		self.surfaces.get(&id)
	}

	/// Returns `true` if the graph has a record for the ID
	pub fn contains(&self, id: u32) -> bool {
		self.surfaces.contains_key(&id)
	}

	/// Returns all surfaces in ascending ID order
	pub fn surfaces(&self) -> impl Iterator<Item = (u32, &Surface)> {
		self.surfaces.iter().map(|(id, surface)| (*id, surface))
	}

	/// Returns the number of surfaces
	pub fn len(&self) -> usize {
		self.surfaces.len()
	}

	/// Returns `true` if no surface was defined
	pub fn is_empty(&self) -> bool {
		self.surfaces.is_empty()
	}
}

/// Returns `true` for lower-cased names like `surfaces2.txt` or `surfaces_face.txt`
pub fn is_definition_file_name(name: &str) -> bool {
	name.starts_with(constants::FILE_PREFIX)
		&& Path::new(name).extension().is_some_and(|ext| ext == constants::FILE_EXTENSION)
}
