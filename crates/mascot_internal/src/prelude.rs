//! Prelude module for `mascot_internal`.
//!
//! This module provides a convenient way to import commonly used types.
//!
//! # Examples
//!
//! ```rust
//! use mascot_internal::prelude::*;
//!
//! let graph = SurfaceGraph::parse("surface0\n{\nelement0,base,body.png,0,0\n}\n");
//! assert!(graph.contains(0));
//!
//! let config = ImportConfig::default();
//! assert_eq!(config.surface_for(Emotion::Neutral), Some(0));
//! ```

// Re-export everything from mascot_types::prelude
#[doc(inline)]
pub use mascot_types::prelude::*;

#[doc(inline)]
pub use mascot_avatar::{
	AvatarBundle, AvatarError, AvatarId, Emotion, ImportConfig, Importer, RecomposeQueue, StyleFrames,
	SurfaceCache,
};

#[doc(inline)]
pub use mascot_vfs::{ExtractError, PackageLayout, PackageRole, extract, probe_layout};

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use mascot_avatar;
#[doc(inline)]
pub use mascot_types;
#[doc(inline)]
pub use mascot_vfs;
