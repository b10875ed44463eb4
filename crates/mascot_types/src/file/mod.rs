//! Text file support for legacy mascot packages.

mod error;

pub mod descript;
pub mod surfaces;
pub mod text;

// Re-export unified error type
pub use error::ParseError;

// Re-export main file types
pub use descript::{Costume, DESCRIPT_FILE_NAME, Descriptor};
pub use surfaces::{
	Animation, Collision, Element, Interval, IntervalClass, Method, Pattern, Surface, SurfaceGraph,
	parse_id_set,
};
pub use text::{TextEncoding, decode_entry_name, decode_text};
