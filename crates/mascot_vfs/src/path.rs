//! Entry path sanitizing.

use std::path::{Component, Path, PathBuf};

/// Turns a stored entry name into a relative path that cannot leave the
/// extraction root.
///
/// Backslashes are treated as separators. Empty, `.`, root and drive
/// components are dropped, and `..` removes the previous component without
/// ever climbing above the root. Returns `None` when nothing is left.
pub fn sanitize_entry_path(name: &str) -> Option<PathBuf> {
	let normalized = name.replace('\\', "/");
	let mut parts: Vec<&str> = Vec::new();

	for part in normalized.split('/') {
		match part {
			"" | "." => {}
			".." => {
				parts.pop();
			}
			p if p.contains(':') => {}
			p => parts.push(p),
		}
	}

	if parts.is_empty() {
		return None;
	}

	let path: PathBuf = parts.iter().collect();
	debug_assert!(is_contained(&path));
	Some(path)
}

fn is_contained(path: &Path) -> bool {
	path.components().all(|c| matches!(c, Component::Normal(_)))
}
