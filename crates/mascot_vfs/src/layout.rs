//! Package directory probing.
//!
//! After extraction every directory holding a `descript.txt` is a package
//! candidate. Its role comes from the descriptor's `type` field; when that is
//! missing or unrecognized, the directory contents decide.

use std::{
	fmt::Formatter,
	fs,
	path::{Path, PathBuf},
};

use mascot_types::file::{Descriptor, surfaces::is_definition_file_name};
use walkdir::WalkDir;

/// Default depth of the directory walk below the extraction root
pub const PROBE_DEPTH: usize = 3;

/// File extensions of behavior scripts and script engines
const BEHAVIOR_SCRIPT_EXTENSIONS: [&str; 2] = ["dic", "dll"];

/// Role of a package directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageRole {
	/// Mascot logic root (`type,ghost`)
	Definition,
	/// Visual shell (`type,shell`)
	Appearance,
}

impl std::fmt::Display for PackageRole {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Definition => write!(f, "definition"),
			Self::Appearance => write!(f, "appearance"),
		}
	}
}

/// Package directories found below an extraction root, in path order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageLayout {
	/// Definition package directories
	pub definition_dirs: Vec<PathBuf>,
	/// Appearance package directories
	pub appearance_dirs: Vec<PathBuf>,
}

impl PackageLayout {
	/// Returns `true` if no package directory was found
	pub fn is_empty(&self) -> bool {
		self.definition_dirs.is_empty() && self.appearance_dirs.is_empty()
	}
}

/// Walks `root` up to `max_depth` levels and classifies every package directory.
pub fn probe_layout(root: impl AsRef<Path>, max_depth: usize) -> PackageLayout {
	let mut layout = PackageLayout::default();

	let walker = WalkDir::new(root.as_ref()).max_depth(max_depth).sort_by_file_name();
	for entry in walker.into_iter().filter_map(Result::ok) {
		if !entry.file_type().is_dir() {
			continue;
		}

		match classify_dir(entry.path()) {
			Some(PackageRole::Definition) => layout.definition_dirs.push(entry.path().to_path_buf()),
			Some(PackageRole::Appearance) => layout.appearance_dirs.push(entry.path().to_path_buf()),
			None => {}
		}
	}

	log::info!(
		"Found {} definition and {} appearance packages",
		layout.definition_dirs.len(),
		layout.appearance_dirs.len()
	);
	layout
}

/// Classifies a single directory, `None` if it is not a package directory.
pub fn classify_dir(dir: impl AsRef<Path>) -> Option<PackageRole> {
	let dir = dir.as_ref();
	let descriptor_path = Descriptor::find_in(dir)?;
	let file_names = list_file_names(dir);

	let descriptor = Descriptor::open(descriptor_path);
	match descriptor.package_type().as_deref() {
		Some("ghost") => return Some(PackageRole::Definition),
		Some("shell") => return Some(PackageRole::Appearance),
		_ => {}
	}

	if file_names.iter().any(|name| is_definition_file_name(name)) {
		return Some(PackageRole::Appearance);
	}

	let has_script = file_names.iter().any(|name| {
		Path::new(name)
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| BEHAVIOR_SCRIPT_EXTENSIONS.contains(&ext))
	});
	if has_script {
		return Some(PackageRole::Definition);
	}

	log::debug!("Unclassified package directory: {}", dir.display());
	None
}

/// Lower-cased names of the regular files in a directory
fn list_file_names(dir: &Path) -> Vec<String> {
	let Ok(entries) = fs::read_dir(dir) else {
		return Vec::new();
	};

	entries
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
		.map(|entry| entry.file_name().to_string_lossy().to_lowercase())
		.collect()
}
