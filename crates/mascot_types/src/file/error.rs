//! Error types for package text file loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading descriptor or surface definition files
#[derive(Debug, Error)]
pub enum ParseError {
	/// No surface definition file was found in a directory
	#[error("No surface definition files found in {}", dir.display())]
	NoSurfaceFiles {
		/// Directory that was searched
		dir: PathBuf,
	},

	/// A file could not be read
	#[error("Cannot read {}: {source}", path.display())]
	Read {
		/// Path of the file
		path: PathBuf,
		/// Underlying IO error
		source: std::io::Error,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl ParseError {
	/// Creates a read error for the given path
	pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Read {
			path: path.into(),
			source,
		}
	}
}
