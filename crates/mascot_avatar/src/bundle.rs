//! Output bundle layout.
//!
//! An installed avatar is a directory holding:
//!
//! ```text
//! <avatars_root>/<avatar_id>/
//!     avatar.json                   mapping + meta, read by the renderer
//!     surfaces.json                 graph cache, read by recomposition
//!     surface0.png                  base frame per rendered surface
//!     surface0_blink_10_v1.png      derived frames
//!     surface0_talk_11_v1.png
//! ```

use std::{
	collections::{BTreeMap, BTreeSet},
	fmt::Formatter,
	fs,
	path::{Path, PathBuf},
};

use mascot_types::file::{Costume, SurfaceGraph};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::AvatarError;

/// Bundle file name constants.
pub mod constants {
	/// Metadata file read by the renderer
	pub const METADATA_FILE_NAME: &str = "avatar.json";

	/// Graph cache read by recomposition
	pub const CACHE_FILE_NAME: &str = "surfaces.json";

	/// Marker naming the archive an extraction directory was filled from
	pub const SOURCE_FILE_NAME: &str = ".source";

	/// Version of the cache layout
	pub const CACHE_VERSION: u32 = 1;
}

/// Identifier of an installed avatar, also its bundle directory name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarId(String);

impl AvatarId {
	/// Derives an ID from a display name.
	///
	/// Alphanumeric characters are kept (lower-cased), runs of anything else
	/// become a single `_`. An empty result becomes `avatar`.
	pub fn from_name(name: &str) -> Self {
		let mut slug = String::new();
		for c in name.chars() {
			if c.is_alphanumeric() {
				slug.extend(c.to_lowercase());
			} else if !slug.ends_with('_') {
				slug.push('_');
			}
		}

		let slug = slug.trim_matches('_');
		if slug.is_empty() {
			Self("avatar".to_string())
		} else {
			Self(slug.to_string())
		}
	}

	/// Returns the ID with a numeric suffix
	pub fn with_suffix(&self, n: usize) -> Self {
		Self(format!("{}_{}", self.0, n))
	}

	/// Returns the ID as a string slice
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for AvatarId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Frames of one emotion, as file names inside the bundle
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleFrames {
	/// Base frame
	pub base: String,
	/// Mouth open
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mouth_open: Option<String>,
	/// Eyes closed
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub eyes_closed: Option<String>,
	/// Mouth open and eyes closed
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mouth_open_eyes_closed: Option<String>,
}

/// Descriptive metadata of an avatar
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BundleMeta {
	/// Display name
	pub name: String,
	/// Author
	pub author: String,
	/// Available costumes
	pub costumes: Vec<Costume>,
}

/// Contents of `avatar.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarBundle {
	/// Avatar ID
	pub id: AvatarId,
	/// Emotion key to frames
	pub mapping: BTreeMap<String, StyleFrames>,
	/// Descriptive metadata
	pub meta: BundleMeta,
	/// Bind groups the images were rendered with
	#[serde(default)]
	pub active_bind_ids: BTreeSet<u32>,
}

impl AvatarBundle {
	/// Loads `avatar.json` from a bundle directory
	pub fn load(bundle_dir: impl AsRef<Path>) -> Result<Self, AvatarError> {
		read_json(&bundle_dir.as_ref().join(constants::METADATA_FILE_NAME))
	}

	/// Writes `avatar.json` into a bundle directory
	pub fn save(&self, bundle_dir: impl AsRef<Path>) -> Result<(), AvatarError> {
		write_json(&bundle_dir.as_ref().join(constants::METADATA_FILE_NAME), self)
	}
}

/// Contents of `surfaces.json`: everything recomposition needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceCache {
	/// Cache layout version
	pub version: u32,
	/// Directory the graph's image names are relative to
	pub image_dir: PathBuf,
	/// Parsed surface definitions
	pub graph: SurfaceGraph,
	/// Costumes from the descriptor
	pub costumes: Vec<Costume>,
	/// Default bind groups from the descriptor
	pub default_bind_ids: BTreeSet<u32>,
	/// Descriptive metadata
	pub meta: BundleMeta,
}

impl SurfaceCache {
	/// Loads `surfaces.json` from a bundle directory.
	///
	/// # Errors
	///
	/// Returns [`AvatarError::CacheMissing`] if the file does not exist.
	pub fn load(bundle_dir: impl AsRef<Path>) -> Result<Self, AvatarError> {
		let path = bundle_dir.as_ref().join(constants::CACHE_FILE_NAME);
		if !path.is_file() {
			return Err(AvatarError::CacheMissing {
				path,
			});
		}
		read_json(&path)
	}

	/// Writes `surfaces.json` into a bundle directory
	pub fn save(&self, bundle_dir: impl AsRef<Path>) -> Result<(), AvatarError> {
		write_json(&bundle_dir.as_ref().join(constants::CACHE_FILE_NAME), self)
	}

	/// Resolves the bind set to render with.
	///
	/// An empty selection on an avatar that has costumes means "back to the
	/// authored defaults", not "wear nothing".
	pub fn effective_binds(&self, requested: &BTreeSet<u32>) -> BTreeSet<u32> {
		if requested.is_empty() && !self.costumes.is_empty() {
			self.default_bind_ids.clone()
		} else {
			requested.clone()
		}
	}
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AvatarError> {
	let data = fs::read(path)?;
	Ok(serde_json::from_slice(&data)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AvatarError> {
	let data = serde_json::to_vec_pretty(value)?;
	fs::write(path, data)?;
	Ok(())
}
