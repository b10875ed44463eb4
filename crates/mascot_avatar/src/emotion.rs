//! Derived expression frames.
//!
//! Besides the base image, each emotion may carry an "eyes closed" and a
//! "mouth open" frame. They are synthesized from animations found on the
//! emotion's surface: talk animations give the mouth frame, timer driven ones
//! the blink frame. Bind animations without an explicit class are recognized
//! by the ID ranges the most common authoring tool assigns to them.

use std::{collections::BTreeSet, fmt::Formatter, ops::Range};

use mascot_types::file::{Animation, Pattern};

use crate::flatten::CollectedAnimation;

/// Owner or animation IDs in this range are blink binds
pub const BLINK_BIND_RANGE: Range<u32> = 11000..11100;

/// Owner or animation IDs in this range are talk binds
pub const TALK_BIND_RANGE: Range<u32> = 11100..11200;

/// Kind of derived frame an animation provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
	/// Eyes closed
	Blink,
	/// Mouth open
	Talk,
}

impl FrameKind {
	/// Name used in output file names
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Blink => "blink",
			Self::Talk => "talk",
		}
	}
}

impl std::fmt::Display for FrameKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Classifies a collected animation, `None` if it provides no derived frame.
pub fn classify(collected: &CollectedAnimation<'_>, active_binds: &BTreeSet<u32>) -> Option<FrameKind> {
	let interval = &collected.animation.interval;

	if interval.is_talk() {
		return Some(FrameKind::Talk);
	}
	if interval.is_ambient() {
		return Some(FrameKind::Blink);
	}
	if interval.is_bind()
		&& active_binds.contains(&collected.id)
		&& !collected.animation.patterns.is_empty()
	{
		let in_range = |range: &Range<u32>| range.contains(&collected.owner) || range.contains(&collected.id);
		if in_range(&BLINK_BIND_RANGE) {
			return Some(FrameKind::Blink);
		}
		if in_range(&TALK_BIND_RANGE) {
			return Some(FrameKind::Talk);
		}
	}

	None
}

/// Selects the pattern rendered as the derived frame.
///
/// Blink takes the middle pattern (the only one when there is a single
/// pattern). Talk takes the first pattern showing a surface other than the
/// owner, else the second pattern, else the first.
pub fn target_pattern(kind: FrameKind, owner: u32, animation: &Animation) -> Option<&Pattern> {
	let patterns = &animation.patterns;
	match kind {
		FrameKind::Blink if patterns.len() > 1 => patterns.get(patterns.len() / 2),
		FrameKind::Blink => patterns.first(),
		FrameKind::Talk => patterns
			.iter()
			.find(|p| p.surface_id().is_some_and(|id| id != owner))
			.or_else(|| patterns.get(1))
			.or_else(|| patterns.first()),
	}
}

/// File name of a derived frame
pub fn frame_file_name(surface_id: u32, kind: FrameKind, animation_id: u32) -> String {
	format!("surface{surface_id}_{kind}_{animation_id}_v1.png")
}

/// File name of the combined mouth-open, eyes-closed frame
pub fn combined_file_name(surface_id: u32, talk_id: u32, blink_id: u32) -> String {
	format!("surface{surface_id}_talkblink_{talk_id}_{blink_id}_v1.png")
}

/// File name of a base frame
pub fn base_file_name(surface_id: u32) -> String {
	format!("surface{surface_id}.png")
}
