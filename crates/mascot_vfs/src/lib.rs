//! Archive extraction and package layout probing for `mascot-rs`.
//!
//! A mascot distribution is a zip archive holding a definition package
//! (`ghost/master`) and one or more appearance packages (`shell/*`). Entry
//! names in older archives are stored as Shift-JIS; they are repaired while
//! extracting, and every path is confined to the destination directory.
//!
//! # Examples
//!
//! ```no_run
//! use mascot_vfs::extract;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layout = extract("sample.nar", "work/sample")?;
//!
//! for dir in &layout.appearance_dirs {
//!     println!("shell: {}", dir.display());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod extract;
mod layout;
mod path;

pub use error::ExtractError;
pub use extract::{extract, extract_from_reader, extract_with_depth};
pub use layout::{PROBE_DEPTH, PackageLayout, PackageRole, classify_dir, probe_layout};
pub use path::sanitize_entry_path;
