use std::{
	fs,
	io::Write,
	path::{Path, PathBuf},
};

use image::{Rgba, RgbaImage};
use mascot_rs::ImportConfig;
use zip::{ZipWriter, write::FileOptions};

pub(super) const RED: [u8; 4] = [255, 0, 0, 255];
pub(super) const BLUE: [u8; 4] = [0, 0, 255, 255];
pub(super) const GREEN: [u8; 4] = [0, 255, 0, 255];

pub(super) const SHELL_DESCRIPT: &str = "\
name,Test Ghost
craftman,Tester
type,shell
sakura.bindgroup3.name,Accessory,Hat
sakura.bindgroup3.default,1
sakura.bindgroup5.name,Casual
";

pub(super) const SURFACES: &str = "\
surface0
{
element0,base,body.png,0,0
animation3.interval,bind
animation3.pattern0,overlay,30,0,3,1
animation1.interval,talk,2
animation1.pattern0,overlay,-1,50,0,0
animation1.pattern1,overlay,31,50,2,5
}
surface30
{
element0,overlay,hat.png,0,0
}
surface31
{
element0,overlay,mouth.png,0,0
}
";

pub(super) fn png(color: [u8; 4], size: u32) -> Vec<u8> {
	let mut data = Vec::new();
	RgbaImage::from_pixel(size, size, Rgba(color))
		.write_to(&mut std::io::Cursor::new(&mut data), image::ImageFormat::Png)
		.unwrap();
	data
}

/// Files of a shell: a red body, a blue hat and a green mouth
pub(super) fn shell_files(descript: &str, surfaces: &str) -> Vec<(&'static str, Vec<u8>)> {
	let mut files = vec![
		("descript.txt", descript.as_bytes().to_vec()),
		("body.png", png(RED, 8)),
		("hat.png", png(BLUE, 2)),
		("mouth.png", png(GREEN, 2)),
	];
	if !surfaces.is_empty() {
		files.push(("surfaces.txt", surfaces.as_bytes().to_vec()));
	}
	files
}

pub(super) fn write_shell(dir: &Path, descript: &str, surfaces: &str) -> PathBuf {
	fs::create_dir_all(dir).unwrap();
	for (name, data) in shell_files(descript, surfaces) {
		fs::write(dir.join(name), data).unwrap();
	}
	dir.to_path_buf()
}

pub(super) fn write_archive(path: &Path, entries: &[(String, Vec<u8>)]) {
	let mut writer = ZipWriter::new(fs::File::create(path).unwrap());
	for (name, data) in entries {
		writer.start_file(name.as_str(), FileOptions::default()).unwrap();
		writer.write_all(data).unwrap();
	}
	writer.finish().unwrap();
}

pub(super) fn config(root: &Path) -> ImportConfig {
	ImportConfig::new(root.join("avatars"))
}

pub(super) fn pixel(path: &Path, x: u32, y: u32) -> [u8; 4] {
	image::open(path).unwrap().to_rgba8().get_pixel(x, y).0
}
