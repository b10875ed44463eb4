use std::collections::BTreeSet;

use mascot_rs::{AvatarBundle, AvatarError, Importer, SurfaceCache};

use super::fixtures::{
	BLUE, GREEN, RED, SHELL_DESCRIPT, SURFACES, config, pixel, png, shell_files, write_archive,
};

const GHOST_DESCRIPT: &str = "name,Archived Ghost\ncraftmanw,Archivist\ntype,ghost\n";

fn ghost_entries() -> Vec<(String, Vec<u8>)> {
	let mut entries = vec![
		("install.txt".to_string(), b"type,ghost\nname,Archived Ghost\n".to_vec()),
		("ghost/master/descript.txt".to_string(), GHOST_DESCRIPT.as_bytes().to_vec()),
	];
	for (name, data) in shell_files(SHELL_DESCRIPT, SURFACES) {
		entries.push((format!("shell/master/{name}"), data));
	}
	entries
}

#[test_log::test]
fn test_import_archive() {
	let root = tempfile::tempdir().unwrap();
	let archive = root.path().join("archived.nar");
	write_archive(&archive, &ghost_entries());

	let importer = Importer::new(config(root.path()));
	let id = importer.import_archive(&archive).unwrap();
	let bundle_dir = importer.bundle_dir(&id);
	let bundle = AvatarBundle::load(&bundle_dir).unwrap();

	assert_eq!(id.as_str(), "archived_ghost");
	assert_eq!(bundle.meta.author, "Archivist");
	assert_eq!(pixel(&bundle_dir.join("surface0.png"), 3, 1), BLUE);

	let cache = SurfaceCache::load(&bundle_dir).unwrap();
	assert!(cache.image_dir.ends_with("shell/master"));
	assert!(cache.image_dir.is_dir());
}

#[test_log::test]
fn test_import_archive_twice_reuses_bundle() {
	let root = tempfile::tempdir().unwrap();
	let archive = root.path().join("archived.nar");
	write_archive(&archive, &ghost_entries());

	let importer = Importer::new(config(root.path()));
	let first = importer.import_archive(&archive).unwrap();
	let second = importer.import_archive(&archive).unwrap();
	assert_eq!(first, second);
}

#[test_log::test]
fn test_import_archives_with_alike_names() {
	let root = tempfile::tempdir().unwrap();
	let first_archive = root.path().join("ghost.nar");
	let second_archive = root.path().join("Ghost.zip");
	write_archive(&first_archive, &ghost_entries());
	write_archive(
		&second_archive,
		&[
			("shell/master/descript.txt".to_string(), b"name,Other Ghost\ntype,shell\n".to_vec()),
			("shell/master/surface0.png".to_string(), png(GREEN, 4)),
		],
	);

	let importer = Importer::new(config(root.path()));
	let first = importer.import_archive(&first_archive).unwrap();
	let second = importer.import_archive(&second_archive).unwrap();
	assert_ne!(first, second);

	let first_dir = importer.bundle_dir(&first);
	let first_cache = SurfaceCache::load(&first_dir).unwrap();
	let second_cache = SurfaceCache::load(importer.bundle_dir(&second)).unwrap();
	assert_ne!(first_cache.image_dir, second_cache.image_dir);
	assert!(first_cache.image_dir.join("body.png").is_file());

	let binds: BTreeSet<u32> = AvatarBundle::load(&first_dir).unwrap().active_bind_ids;
	importer.recompose(&first_dir, &binds).unwrap();
	assert_eq!(pixel(&first_dir.join("surface0.png"), 0, 0), RED);

	let again = importer.import_archive(&first_archive).unwrap();
	assert_eq!(again, first);
}

#[test_log::test]
fn test_import_archive_without_shell() {
	let root = tempfile::tempdir().unwrap();
	let archive = root.path().join("logic.nar");
	write_archive(
		&archive,
		&[("ghost/master/descript.txt".to_string(), GHOST_DESCRIPT.as_bytes().to_vec())],
	);

	let result = Importer::new(config(root.path())).import_archive(&archive);
	assert!(matches!(result, Err(AvatarError::NoAppearancePackage { .. })));
}
