//! Avatar conversion for desktop mascot packages.
//!
//! Takes an extracted package pair, flattens its layered surface graph into
//! static frames per emotion and installs the result as an avatar bundle.
//! Installed bundles can be recomposed with another costume selection.
//!
//! # Examples
//!
//! ```no_run
//! use std::collections::BTreeSet;
//!
//! use mascot_avatar::{ImportConfig, Importer};
//!
//! let importer = Importer::new(ImportConfig::new("avatars"));
//! let id = importer.import_archive("ghost.nar")?;
//! importer.recompose(importer.bundle_dir(&id), &BTreeSet::from([3]))?;
//! # Ok::<(), mascot_avatar::AvatarError>(())
//! ```

pub mod adapter;
pub mod bundle;
pub mod compose;
pub mod config;
pub mod emotion;
mod error;
pub mod flatten;
pub mod queue;

pub use adapter::Importer;
pub use bundle::{AvatarBundle, AvatarId, BundleMeta, StyleFrames, SurfaceCache};
pub use compose::compose;
pub use config::{Emotion, EmotionSurface, ImportConfig};
pub use emotion::FrameKind;
pub use error::AvatarError;
pub use flatten::{FlattenedLayer, Flattener, Overrides};
pub use queue::RecomposeQueue;
