//! Facade crate gathering the `mascot` crates; use it through `mascot_rs`.

/// `use mascot_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export member crates for convenience
pub use mascot_avatar;
pub use mascot_types;
pub use mascot_vfs;

// Re-export commonly used types at crate root
pub use mascot_avatar::{
	AvatarBundle, AvatarError, AvatarId, ImportConfig, Importer, RecomposeQueue, SurfaceCache,
};
pub use mascot_types::file::{Descriptor, ParseError, SurfaceGraph};
pub use mascot_vfs::{ExtractError, PackageLayout};
