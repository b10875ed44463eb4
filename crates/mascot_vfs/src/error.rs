//! Error types for archive extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when extracting a package archive
#[derive(Debug, Error)]
pub enum ExtractError {
	/// The archive file could not be opened
	#[error("Cannot open archive {}: {source}", path.display())]
	Open {
		/// Archive path
		path: PathBuf,
		/// Underlying IO error
		source: std::io::Error,
	},

	/// The container is not a readable archive
	#[error(transparent)]
	Archive(#[from] zip::result::ZipError),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
