//! Layer compositing.
//!
//! Layers are drawn in list order with source-over alpha blending, so later
//! layers end up on top. `base`, `overlay` and `replace` are all drawn the same
//! way. The canvas takes the size of the first image that loads.

use std::{
	fs,
	path::{Path, PathBuf},
};

use image::{RgbaImage, imageops};

use crate::{error::AvatarError, flatten::FlattenedLayer};

/// Resolves a layer file name against an image directory.
///
/// Backslash separators are accepted, a missing extension defaults to `.png`,
/// and when the exact name does not exist a case-insensitive match in the same
/// directory is used.
pub fn resolve_image(image_dir: &Path, file: &str) -> Option<PathBuf> {
	let relative = file.trim().replace('\\', "/");
	if relative.is_empty() {
		return None;
	}

	let mut path = image_dir.join(&relative);
	if path.extension().is_none() {
		path.set_extension("png");
	}
	if path.is_file() {
		return Some(path);
	}

	let parent = path.parent()?;
	let wanted = path.file_name()?.to_string_lossy().to_lowercase();
	fs::read_dir(parent)
		.ok()?
		.filter_map(Result::ok)
		.find(|entry| entry.file_name().to_string_lossy().to_lowercase() == wanted)
		.map(|entry| entry.path())
		.filter(|found| found.is_file())
}

/// Composites flattened layers into one image.
///
/// # Errors
///
/// Returns [`AvatarError::EmptyComposition`] if no layer image could be
/// loaded. Individual missing or undecodable images are skipped with a warning.
pub fn compose(layers: &[FlattenedLayer], image_dir: &Path) -> Result<RgbaImage, AvatarError> {
	let mut canvas: Option<RgbaImage> = None;

	for layer in layers {
		let Some(path) = resolve_image(image_dir, &layer.file) else {
			log::warn!("Layer image not found: {}", layer.file);
			continue;
		};
		let image = match image::open(&path) {
			Ok(image) => image.to_rgba8(),
			Err(e) => {
				log::warn!("Cannot decode {}: {}", path.display(), e);
				continue;
			}
		};

		let target = canvas.get_or_insert_with(|| RgbaImage::new(image.width(), image.height()));
		imageops::overlay(target, &image, i64::from(layer.x), i64::from(layer.y));
	}

	canvas.ok_or(AvatarError::EmptyComposition)
}
