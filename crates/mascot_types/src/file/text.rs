//! Legacy text decoding.
//!
//! Package text files and archive entry names predate Unicode and are usually
//! stored in Shift-JIS. Newer packages use UTF-8, sometimes with a BOM. The
//! helpers here accept either and report which one was used.

use std::{borrow::Cow, fmt::Formatter};

use encoding_rs::{SHIFT_JIS, UTF_8};

/// UTF-8 byte order mark
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encoding detected for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
	/// Strictly valid UTF-8 (plain ASCII included)
	#[default]
	Utf8,
	/// Legacy Shift-JIS codepage
	ShiftJis,
}

impl std::fmt::Display for TextEncoding {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Utf8 => write!(f, "UTF-8"),
			Self::ShiftJis => write!(f, "Shift_JIS"),
		}
	}
}

/// Decodes text, preferring strict UTF-8 and falling back to Shift-JIS.
///
/// A leading UTF-8 BOM is removed. Bytes that are not valid Shift-JIS either
/// are replaced with U+FFFD rather than failing.
pub fn decode_text(bytes: &[u8]) -> (String, TextEncoding) {
	let bytes = bytes.strip_prefix(&UTF8_BOM[..]).unwrap_or(bytes);

	if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
		return (text.into_owned(), TextEncoding::Utf8);
	}

	let (cow, _encoding_used, had_error) = SHIFT_JIS.decode(bytes);
	if had_error {
		log::debug!("text is neither valid UTF-8 nor Shift_JIS, kept with replacements");
	}
	(cow.into_owned(), TextEncoding::ShiftJis)
}

/// Decodes a stored archive entry name.
///
/// The name is accepted as UTF-8 only when it decodes strictly, anything else
/// is read as Shift-JIS.
pub fn decode_entry_name(raw: &[u8]) -> Cow<'_, str> {
	if let Ok(text) = std::str::from_utf8(raw) {
		return Cow::Borrowed(text);
	}

	let (cow, _encoding_used, _had_error) = SHIFT_JIS.decode(raw);
	cow
}
