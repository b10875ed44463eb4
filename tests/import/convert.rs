use std::collections::BTreeSet;

use mascot_rs::{AvatarBundle, AvatarError, Importer, SurfaceCache};

use super::fixtures::{BLUE, GREEN, RED, SHELL_DESCRIPT, SURFACES, config, pixel, write_shell};

#[test_log::test]
fn test_install_renders_default_costume() {
	let root = tempfile::tempdir().unwrap();
	let shell = write_shell(&root.path().join("shell"), SHELL_DESCRIPT, SURFACES);

	let importer = Importer::new(config(root.path()));
	let id = importer.convert_and_install(&shell, &shell).unwrap();
	let bundle_dir = importer.bundle_dir(&id);
	let bundle = AvatarBundle::load(&bundle_dir).unwrap();

	assert_eq!(id.as_str(), "test_ghost");
	assert_eq!(bundle.meta.name, "Test Ghost");
	assert_eq!(bundle.meta.author, "Tester");
	assert_eq!(bundle.meta.costumes.len(), 2);
	assert_eq!(bundle.active_bind_ids, BTreeSet::from([3]));

	let neutral = &bundle.mapping["neutral"];
	assert_eq!(neutral.base, "surface0.png");
	assert_eq!(pixel(&bundle_dir.join(&neutral.base), 3, 1), BLUE);
	assert_eq!(pixel(&bundle_dir.join(&neutral.base), 0, 0), RED);
}

#[test_log::test]
fn test_install_mapping_fallbacks() {
	let root = tempfile::tempdir().unwrap();
	let shell = write_shell(&root.path().join("shell"), SHELL_DESCRIPT, SURFACES);

	let importer = Importer::new(config(root.path()));
	let id = importer.convert_and_install(&shell, &shell).unwrap();
	let bundle = AvatarBundle::load(importer.bundle_dir(&id)).unwrap();

	let keys: Vec<&str> = bundle.mapping.keys().map(String::as_str).collect();
	assert_eq!(keys, vec!["happy", "neutral"]);
	assert_eq!(bundle.mapping["happy"], bundle.mapping["neutral"]);
}

#[test_log::test]
fn test_install_talk_frame() {
	let root = tempfile::tempdir().unwrap();
	let shell = write_shell(&root.path().join("shell"), SHELL_DESCRIPT, SURFACES);

	let importer = Importer::new(config(root.path()));
	let id = importer.convert_and_install(&shell, &shell).unwrap();
	let bundle_dir = importer.bundle_dir(&id);
	let neutral = &AvatarBundle::load(&bundle_dir).unwrap().mapping["neutral"];

	let talk = neutral.mouth_open.as_deref().unwrap();
	assert_eq!(talk, "surface0_talk_1_v1.png");
	assert_eq!(pixel(&bundle_dir.join(talk), 2, 5), GREEN);
	assert_eq!(pixel(&bundle_dir.join(talk), 3, 1), BLUE);
	assert!(neutral.eyes_closed.is_none());
	assert!(neutral.mouth_open_eyes_closed.is_none());
}

#[test_log::test]
fn test_install_implicit_neutral() {
	let root = tempfile::tempdir().unwrap();
	let shell = write_shell(&root.path().join("shell"), "name,Plain\n", "");
	std::fs::copy(shell.join("body.png"), shell.join("surface0.png")).unwrap();

	let importer = Importer::new(config(root.path()));
	let id = importer.convert_and_install(&shell, &shell).unwrap();
	let bundle_dir = importer.bundle_dir(&id);
	let bundle = AvatarBundle::load(&bundle_dir).unwrap();

	assert_eq!(bundle.mapping["neutral"].base, "surface0.png");
	assert_eq!(pixel(&bundle_dir.join("surface0.png"), 4, 4), RED);
	assert!(SurfaceCache::load(&bundle_dir).unwrap().graph.is_empty());
}

#[test_log::test]
fn test_install_without_neutral_fails() {
	let root = tempfile::tempdir().unwrap();
	let shell = write_shell(
		&root.path().join("shell"),
		SHELL_DESCRIPT,
		"surface2\n{\nelement0,base,body.png,0,0\n}\n",
	);

	let result = Importer::new(config(root.path())).convert_and_install(&shell, &shell);
	assert!(matches!(result, Err(AvatarError::NeutralSurfaceMissing { surface: 0 })));
}

#[test_log::test]
fn test_definition_metadata_wins() {
	let root = tempfile::tempdir().unwrap();
	let ghost = root.path().join("ghost");
	std::fs::create_dir_all(&ghost).unwrap();
	std::fs::write(ghost.join("descript.txt"), "name,Ghost Name\ncraftmanw,Ghost Author\ntype,ghost\n").unwrap();
	let shell = write_shell(&root.path().join("shell"), SHELL_DESCRIPT, SURFACES);

	let importer = Importer::new(config(root.path()));
	let id = importer.convert_and_install(&ghost, &shell).unwrap();
	let bundle = AvatarBundle::load(importer.bundle_dir(&id)).unwrap();

	assert_eq!(id.as_str(), "ghost_name");
	assert_eq!(bundle.meta.author, "Ghost Author");
	assert_eq!(bundle.meta.costumes.len(), 2);
}

#[test_log::test]
fn test_spawn_convert() {
	let root = tempfile::tempdir().unwrap();
	let shell = write_shell(&root.path().join("shell"), SHELL_DESCRIPT, SURFACES);

	let importer = Importer::new(config(root.path()));
	let id = importer.spawn_convert(&shell, &shell).join().unwrap().unwrap();
	assert!(importer.bundle_dir(&id).join("avatar.json").is_file());
}
