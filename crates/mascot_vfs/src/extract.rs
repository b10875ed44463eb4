//! Zip container extraction.

use std::{
	fs,
	io::{self, Read, Seek},
	path::Path,
};

use mascot_types::file::decode_entry_name;
use zip::ZipArchive;

use crate::{
	error::ExtractError,
	layout::{PROBE_DEPTH, PackageLayout, probe_layout},
	path::sanitize_entry_path,
};

/// Extracts a package archive into `dest_dir` and probes the result.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or read, or if an entry
/// cannot be written. Finding no package directory is not an error; the
/// returned layout is simply empty.
pub fn extract(
	archive_path: impl AsRef<Path>,
	dest_dir: impl AsRef<Path>,
) -> Result<PackageLayout, ExtractError> {
	extract_with_depth(archive_path, dest_dir, PROBE_DEPTH)
}

/// Same as [`extract`], probing package directories up to `max_depth` levels deep.
pub fn extract_with_depth(
	archive_path: impl AsRef<Path>,
	dest_dir: impl AsRef<Path>,
	max_depth: usize,
) -> Result<PackageLayout, ExtractError> {
	let archive_path = archive_path.as_ref();
	let file = fs::File::open(archive_path).map_err(|source| ExtractError::Open {
		path: archive_path.to_path_buf(),
		source,
	})?;

	log::info!("Extracting {}", archive_path.display());
	extract_from_reader(io::BufReader::new(file), dest_dir, max_depth)
}

/// Extracts a package archive from any seekable reader.
pub fn extract_from_reader<R: Read + Seek>(
	reader: R,
	dest_dir: impl AsRef<Path>,
	max_depth: usize,
) -> Result<PackageLayout, ExtractError> {
	let dest_dir = dest_dir.as_ref();
	let mut archive = ZipArchive::new(reader)?;
	fs::create_dir_all(dest_dir)?;

	let mut written = 0usize;
	for index in 0..archive.len() {
		let mut entry = archive.by_index(index)?;
		let name = decode_entry_name(entry.name_raw()).into_owned();

		let Some(relative) = sanitize_entry_path(&name) else {
			log::warn!("Skipping entry with unusable name: {:?}", name);
			continue;
		};
		let output_path = dest_dir.join(&relative);

		if entry.is_dir() {
			fs::create_dir_all(&output_path)?;
			continue;
		}

		if let Some(parent) = output_path.parent() {
			fs::create_dir_all(parent)?;
		}
		let mut output = fs::File::create(&output_path)?;
		io::copy(&mut entry, &mut output)?;
		log::debug!("  {} ({} bytes)", relative.display(), entry.size());
		written += 1;
	}

	log::info!("Extracted {} files into {}", written, dest_dir.display());
	Ok(probe_layout(dest_dir, max_depth))
}
