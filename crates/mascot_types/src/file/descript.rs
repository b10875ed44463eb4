//! `descript.txt` descriptor parser.
//!
//! A descriptor is a flat, line-oriented `key,value` file. Only the first comma
//! separates key from value, so values may contain further commas. Keys are
//! case-insensitive and stored lower-cased; values keep their case.
//!
//! ```text
//! // comment
//! charset,Shift_JIS
//! type,shell
//! name,Default Shell
//! sakura.bindgroup5.name,Outfit,Casual
//! sakura.bindgroup5.default,1
//! ```
//!
//! The `sakura.bindgroupN.*` keys describe costumes (bind groups) and are
//! additionally collected into [`Costume`] records and a default bind set.

use std::{
	collections::{BTreeMap, BTreeSet},
	path::{Path, PathBuf},
	sync::LazyLock,
};

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::{TextEncoding, decode_text};

/// Conventional descriptor file name
pub const DESCRIPT_FILE_NAME: &str = "descript.txt";

static BIND_GROUP_KEY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^sakura\.bindgroup(\d+)\.(name|default)$").expect("bind group pattern is valid")
});

/// A named, independently toggleable bind group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Costume {
	/// Bind group ID
	pub id: u32,
	/// Display name of the part
	pub name: String,
	/// Category the part belongs to, when the name was given as `category,part`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	/// Whether the group is active by default
	#[serde(rename = "default")]
	pub is_default: bool,
}

/// Parsed descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Descriptor {
	/// Lower-cased key to raw value, in file order
	entries: IndexMap<String, String>,

	/// Bind groups whose `default` flag is set
	default_bind_ids: BTreeSet<u32>,

	/// Bind groups that carry a name
	costumes: Vec<Costume>,

	/// Encoding the text was decoded with
	#[serde(skip)]
	encoding: TextEncoding,
}

impl Descriptor {
	/// Creates an empty descriptor
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a descriptor from raw file bytes.
	///
	/// Never fails: malformed lines are skipped.
	pub fn from_bytes(data: &[u8]) -> Self {
		let (text, encoding) = decode_text(data);
		let mut descriptor = Self::parse_str(&text);
		descriptor.encoding = encoding;
		descriptor
	}

	/// Parses a descriptor from already decoded text.
	pub fn parse_str(text: &str) -> Self {
		let mut entries = IndexMap::new();
		let mut names: BTreeMap<u32, String> = BTreeMap::new();
		let mut defaults: BTreeSet<u32> = BTreeSet::new();

		for line in text.lines() {
			let line = line.trim();
			if line.is_empty() || line.starts_with("//") {
				continue;
			}

			let Some((key, value)) = line.split_once(',') else {
				continue;
			};
			let key = key.trim().to_lowercase();
			let value = value.trim();
			if key.is_empty() || value.is_empty() {
				continue;
			}

			if let Some(caps) = BIND_GROUP_KEY.captures(&key)
				&& let Ok(id) = caps[1].parse::<u32>()
			{
				match &caps[2] {
					"name" => {
						names.insert(id, value.to_string());
					}
					_ => {
						if value == "1" {
							defaults.insert(id);
						} else {
							defaults.remove(&id);
						}
					}
				}
			}

			entries.insert(key, value.to_string());
		}

		let costumes = names
			.into_iter()
			.map(|(id, raw)| {
				let (category, name) = match raw.split_once(',') {
					Some((category, name)) if !name.trim().is_empty() => {
						(Some(category.trim().to_string()), name.trim().to_string())
					}
					_ => (None, raw),
				};
				Costume {
					id,
					name,
					category,
					is_default: defaults.contains(&id),
				}
			})
			.collect();

		Self {
			entries,
			default_bind_ids: defaults,
			costumes,
			encoding: TextEncoding::Utf8,
		}
	}

	/// Opens a descriptor file.
	///
	/// An unreadable file yields an empty descriptor and a warning.
	pub fn open(path: impl AsRef<Path>) -> Self {
		let path = path.as_ref();
		match std::fs::read(path) {
			Ok(data) => Self::from_bytes(&data),
			Err(e) => {
				log::warn!("Cannot read descriptor {}: {}", path.display(), e);
				Self::new()
			}
		}
	}

	/// Opens `descript.txt` inside a package directory, if present.
	pub fn open_in(dir: impl AsRef<Path>) -> Self {
		let dir = dir.as_ref();
		Self::open(Self::find_in(dir).unwrap_or_else(|| dir.join(DESCRIPT_FILE_NAME)))
	}

	/// Finds the descriptor file of a directory, matching the name case-insensitively.
	pub fn find_in(dir: impl AsRef<Path>) -> Option<PathBuf> {
		let dir = dir.as_ref();
		let exact = dir.join(DESCRIPT_FILE_NAME);
		if exact.is_file() {
			return Some(exact);
		}

		std::fs::read_dir(dir)
			.ok()?
			.filter_map(Result::ok)
			.find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(DESCRIPT_FILE_NAME))
			.map(|entry| entry.path())
			.filter(|path| path.is_file())
	}

	/// Looks up a value by key (case-insensitive).
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.get(&key.to_lowercase()).map(String::as_str)
	}

	/// Returns the `name` entry
	pub fn name(&self) -> Option<&str> {
		self.get("name")
	}

	/// Returns the author, from `craftman` or `craftmanw`
	pub fn author(&self) -> Option<&str> {
		self.get("craftmanw").or_else(|| self.get("craftman")).or_else(|| self.get("author"))
	}

	/// Returns the lower-cased `type` entry
	pub fn package_type(&self) -> Option<String> {
		self.get("type").map(str::to_lowercase)
	}

	/// Returns all entries in file order
	pub fn entries(&self) -> &IndexMap<String, String> {
		&self.entries
	}

	/// Returns the default bind group IDs
	pub fn default_bind_ids(&self) -> &BTreeSet<u32> {
		&self.default_bind_ids
	}

	/// Returns the named bind groups, ordered by ID
	pub fn costumes(&self) -> &[Costume] {
		&self.costumes
	}

	/// Returns the encoding the text was decoded with
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// Returns the number of entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if no entry was parsed
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_open_in_mixed_case_name() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("Descript.txt"), "name,Mixed\ntype,shell\n").unwrap();

		assert_eq!(Descriptor::find_in(dir.path()), Some(dir.path().join("Descript.txt")));
		let descriptor = Descriptor::open_in(dir.path());
		assert_eq!(descriptor.name(), Some("Mixed"));
		assert_eq!(descriptor.package_type().as_deref(), Some("shell"));
	}

	#[test]
	fn test_parse_basic() {
		let data = b"name,TestGhost\nsakura.bindgroup0.name,Default\nsakura.bindgroup0.default,1\n";
		let descriptor = Descriptor::from_bytes(data);

		assert_eq!(descriptor.get("name"), Some("TestGhost"));
		assert_eq!(descriptor.default_bind_ids().iter().copied().collect::<Vec<_>>(), vec![0]);
		assert_eq!(
			descriptor.costumes(),
			&[Costume {
				id: 0,
				name: "Default".to_string(),
				category: None,
				is_default: true,
			}]
		);
	}

	#[test]
	fn test_costume_from_bind_group() {
		let descriptor =
			Descriptor::parse_str("sakura.bindgroup5.name,Casual\nsakura.bindgroup5.default,1\n");
		assert_eq!(descriptor.costumes().len(), 1);
		let costume = &descriptor.costumes()[0];
		assert_eq!(costume.id, 5);
		assert_eq!(costume.name, "Casual");
		assert!(costume.is_default);
	}

	#[test]
	fn test_costume_category() {
		let descriptor = Descriptor::parse_str(
			"sakura.bindgroup20.name,Hat,Straw Hat\nsakura.bindgroup21.name,Hat,Beret\nsakura.bindgroup21.default,0\n",
		);
		let costumes = descriptor.costumes();
		assert_eq!(costumes.len(), 2);
		assert_eq!(costumes[0].category.as_deref(), Some("Hat"));
		assert_eq!(costumes[0].name, "Straw Hat");
		assert!(!costumes[1].is_default);
		assert!(descriptor.default_bind_ids().is_empty());
	}

	#[test]
	fn test_keys_lowercased_values_kept() {
		let descriptor = Descriptor::parse_str("Name,MixedCase\nTYPE,Shell\n");
		assert_eq!(descriptor.get("name"), Some("MixedCase"));
		assert_eq!(descriptor.entries().get("type").map(String::as_str), Some("Shell"));
		assert_eq!(descriptor.package_type().as_deref(), Some("shell"));
	}

	#[test]
	fn test_first_comma_wins() {
		let descriptor = Descriptor::parse_str("homeurl,http://example.com/a,b\n");
		assert_eq!(descriptor.get("homeurl"), Some("http://example.com/a,b"));
	}

	#[test]
	fn test_malformed_lines_skipped() {
		let descriptor = Descriptor::parse_str("// comment\n\nno comma here\n,value\nkey,\nok,1\n");
		assert_eq!(descriptor.len(), 1);
		assert_eq!(descriptor.get("ok"), Some("1"));
	}

	#[test]
	fn test_parse_deterministic() {
		let data = "charset,UTF-8\nname,A\nsakura.bindgroup1.name,X\nsakura.bindgroup2.name,Y\nsakura.bindgroup2.default,1\n";
		assert_eq!(Descriptor::from_bytes(data.as_bytes()), Descriptor::from_bytes(data.as_bytes()));
	}

	#[test]
	fn test_shift_jis_values() {
		// "name,さくら"
		let mut data = b"name,".to_vec();
		data.extend_from_slice(&[0x82, 0xB3, 0x82, 0xAD, 0x82, 0xE7]);
		let descriptor = Descriptor::from_bytes(&data);
		assert_eq!(descriptor.name(), Some("さくら"));
		assert_eq!(descriptor.encoding(), TextEncoding::ShiftJis);
	}

	#[test]
	fn test_open_missing_file() {
		let descriptor = Descriptor::open("/nonexistent/descript.txt");
		assert!(descriptor.is_empty());
	}
}
