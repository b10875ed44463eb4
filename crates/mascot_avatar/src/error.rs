//! Error types for avatar conversion and recomposition.

use std::path::PathBuf;

use mascot_types::file::ParseError;
use mascot_vfs::ExtractError;
use thiserror::Error;

/// Errors that abort a conversion or recomposition run
#[derive(Debug, Error)]
pub enum AvatarError {
	/// The mandatory neutral surface is neither defined nor present as an image
	#[error("Neutral surface {surface} is missing")]
	NeutralSurfaceMissing {
		/// Neutral surface ID
		surface: u32,
	},

	/// A surface flattened to no layers at all
	#[error("Surface {surface} has nothing to compose")]
	NothingToCompose {
		/// Surface ID
		surface: u32,
	},

	/// None of the layers resolved to an image on disk
	#[error("No layer image could be loaded")]
	EmptyComposition,

	/// The graph cache of a bundle is absent
	#[error("Surface cache not found: {}", path.display())]
	CacheMissing {
		/// Expected cache path
		path: PathBuf,
	},

	/// An archive contained no appearance package
	#[error("No appearance package found in {}", path.display())]
	NoAppearancePackage {
		/// Archive path
		path: PathBuf,
	},

	/// Text file error
	#[error(transparent)]
	Parse(#[from] ParseError),

	/// Archive error
	#[error(transparent)]
	Extract(#[from] ExtractError),

	/// Image decoding or encoding error
	#[error(transparent)]
	Image(#[from] image::ImageError),

	/// Bundle metadata error
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
