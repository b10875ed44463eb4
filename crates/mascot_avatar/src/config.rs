//! Import configuration.
//!
//! Controls recursion limits, the directory walk depth and the emotion to
//! surface mapping used when converting a package.
//!
//! # Examples
//!
//! ```
//! use mascot_avatar::{Emotion, ImportConfig};
//!
//! // Use default configuration
//! let config = ImportConfig::default();
//! assert_eq!(config.surface_for(Emotion::Neutral), Some(0));
//!
//! // Install into a custom directory
//! let config = ImportConfig::new("avatars");
//! ```

use std::{fmt::Formatter, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Default bound on nested surface references
pub const DEFAULT_MAX_FLATTEN_DEPTH: usize = 10;

/// Emotion keys of the output bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
	/// Default expression, mandatory
	Neutral,
	/// Falls back to the neutral surface when missing
	Happy,
	/// Omitted when missing
	Angry,
	/// Omitted when missing
	Sad,
}

impl Emotion {
	/// Returns the bundle key of the emotion
	pub fn key(self) -> &'static str {
		match self {
			Self::Neutral => "neutral",
			Self::Happy => "happy",
			Self::Angry => "angry",
			Self::Sad => "sad",
		}
	}

	/// Whether a missing surface falls back to the neutral one
	pub fn falls_back_to_neutral(self) -> bool {
		matches!(self, Self::Happy)
	}
}

impl std::fmt::Display for Emotion {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.key())
	}
}

/// Canonical surface of an emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSurface {
	/// Emotion key
	pub emotion: Emotion,
	/// Surface ID rendered for it
	pub surface: u32,
}

/// Configuration for converting and recomposing avatars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
	/// Maximum nesting of surface references before flattening stops
	pub max_flatten_depth: usize,
	/// Maximum depth of the package directory walk after extraction
	pub max_probe_depth: usize,
	/// Emotion to surface mapping
	pub emotions: Vec<EmotionSurface>,
	/// Directory bundles are installed into
	pub avatars_root: PathBuf,
	/// Directory archives are extracted into, defaults to `<avatars_root>/_packages`
	pub packages_root: Option<PathBuf>,
}

impl Default for ImportConfig {
	fn default() -> Self {
		Self {
			max_flatten_depth: DEFAULT_MAX_FLATTEN_DEPTH,
			max_probe_depth: mascot_vfs::PROBE_DEPTH,
			emotions: vec![
				EmotionSurface {
					emotion: Emotion::Neutral,
					surface: 0,
				},
				EmotionSurface {
					emotion: Emotion::Happy,
					surface: 2,
				},
				EmotionSurface {
					emotion: Emotion::Angry,
					surface: 4,
				},
				EmotionSurface {
					emotion: Emotion::Sad,
					surface: 6,
				},
			],
			avatars_root: PathBuf::from("avatars"),
			packages_root: None,
		}
	}
}

impl ImportConfig {
	/// Creates a default configuration installing into `avatars_root`.
	pub fn new(avatars_root: impl Into<PathBuf>) -> Self {
		Self {
			avatars_root: avatars_root.into(),
			..Self::default()
		}
	}

	/// Returns the surface mapped to an emotion
	pub fn surface_for(&self, emotion: Emotion) -> Option<u32> {
		self.emotions.iter().find(|e| e.emotion == emotion).map(|e| e.surface)
	}

	/// Returns the neutral surface ID
	pub fn neutral_surface(&self) -> u32 {
		self.surface_for(Emotion::Neutral).unwrap_or(0)
	}

	/// Returns the directory archives are extracted into
	pub fn packages_root(&self) -> PathBuf {
		self.packages_root.clone().unwrap_or_else(|| self.avatars_root.join("_packages"))
	}
}
