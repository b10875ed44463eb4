//! Surface ID set expressions.
//!
//! A surface header selects IDs with a comma separated list of entries:
//!
//! - `3` selects a single ID
//! - `3-5` selects an inclusive range
//! - `!4` or `!3-4` removes IDs from the selection
//!
//! Exclusions are applied after all inclusions, so `!4,3-5` and `3-5,!4` are
//! the same set.

use std::collections::BTreeSet;

/// Ranges wider than this are ignored
const MAX_RANGE_SPAN: u32 = 100_000;

/// Parses a surface ID set expression.
///
/// Entries that are not numbers or ranges are skipped.
pub fn parse_id_set(expr: &str) -> BTreeSet<u32> {
	let mut include = BTreeSet::new();
	let mut exclude = BTreeSet::new();

	for entry in expr.split(',').map(str::trim).filter(|e| !e.is_empty()) {
		let (target, entry) = match entry.strip_prefix('!') {
			Some(rest) => (&mut exclude, rest.trim()),
			None => (&mut include, entry),
		};

		match entry.split_once('-') {
			Some((start, end)) => {
				let (Ok(start), Ok(end)) = (start.trim().parse::<u32>(), end.trim().parse::<u32>())
				else {
					log::debug!("Skipping malformed surface range: {}", entry);
					continue;
				};
				let (start, end) = if start <= end {
					(start, end)
				} else {
					(end, start)
				};
				if end - start > MAX_RANGE_SPAN {
					log::warn!("Skipping oversized surface range: {}", entry);
					continue;
				}
				target.extend(start..=end);
			}
			None => {
				if let Ok(id) = entry.parse::<u32>() {
					target.insert(id);
				} else {
					log::debug!("Skipping malformed surface id: {}", entry);
				}
			}
		}
	}

	include.difference(&exclude).copied().collect()
}
