use std::{collections::BTreeSet, fs};

use mascot_rs::{AvatarBundle, AvatarError, Importer};

use super::fixtures::{BLUE, RED, SHELL_DESCRIPT, SURFACES, config, pixel, write_shell};

fn installed(root: &std::path::Path) -> (Importer, std::path::PathBuf) {
	let shell = write_shell(&root.join("shell"), SHELL_DESCRIPT, SURFACES);
	let importer = Importer::new(config(root));
	let id = importer.convert_and_install(&shell, &shell).unwrap();
	let bundle_dir = importer.bundle_dir(&id);
	(importer, bundle_dir)
}

#[test_log::test]
fn test_recompose_removes_costume() {
	let root = tempfile::tempdir().unwrap();
	let (importer, bundle_dir) = installed(root.path());

	let bundle = importer.recompose(&bundle_dir, &BTreeSet::from([5])).unwrap();
	assert_eq!(bundle.active_bind_ids, BTreeSet::from([5]));
	assert_eq!(pixel(&bundle_dir.join("surface0.png"), 3, 1), RED);

	let bundle = importer.recompose(&bundle_dir, &BTreeSet::from([3])).unwrap();
	assert_eq!(bundle.active_bind_ids, BTreeSet::from([3]));
	assert_eq!(pixel(&bundle_dir.join("surface0.png"), 3, 1), BLUE);
}

#[test_log::test]
fn test_empty_selection_renders_defaults() {
	let root = tempfile::tempdir().unwrap();
	let (importer, bundle_dir) = installed(root.path());

	let by_default = importer.recompose(&bundle_dir, &BTreeSet::from([3])).unwrap();
	let default_png = fs::read(bundle_dir.join("surface0.png")).unwrap();

	importer.recompose(&bundle_dir, &BTreeSet::from([5])).unwrap();
	let by_empty = importer.recompose(&bundle_dir, &BTreeSet::new()).unwrap();
	let empty_png = fs::read(bundle_dir.join("surface0.png")).unwrap();

	assert_eq!(by_empty, by_default);
	assert_eq!(empty_png, default_png);
}

#[test_log::test]
fn test_recompose_keeps_identity() {
	let root = tempfile::tempdir().unwrap();
	let (importer, bundle_dir) = installed(root.path());
	let before = AvatarBundle::load(&bundle_dir).unwrap();

	let after = importer.recompose(&bundle_dir, &BTreeSet::from([5])).unwrap();
	assert_eq!(after.id, before.id);
	assert_eq!(after.meta, before.meta);
	assert_eq!(AvatarBundle::load(&bundle_dir).unwrap(), after);
}

#[test_log::test]
fn test_recompose_without_cache() {
	let root = tempfile::tempdir().unwrap();
	let (importer, bundle_dir) = installed(root.path());
	fs::remove_file(bundle_dir.join("surfaces.json")).unwrap();

	let result = importer.recompose(&bundle_dir, &BTreeSet::new());
	assert!(matches!(result, Err(AvatarError::CacheMissing { .. })));
}
