//! Animation interval classification.
//!
//! Interval values are free-form (`sometimes`, `periodic,5`, `talk,3`,
//! `bind+sometimes`). They are classified once, when parsed, into a small set
//! of [`IntervalClass`] values. The raw string is kept for round-tripping.

use serde::{Deserialize, Serialize};

/// What drives an animation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntervalClass {
	/// Always playing
	Always,
	/// Shown while its bind group is active
	Bind,
	/// Plays on its own timer (`periodic`, `blink`, `random`, `sometimes`)
	Ambient,
	/// Plays while talking
	Talk,
	/// Never plays on its own
	Never,
	/// Anything else, lower-cased
	Unknown(String),
}

impl IntervalClass {
	/// Classifies a single interval token
	fn classify(token: &str) -> Self {
		const AMBIENT: [&str; 4] = ["periodic", "blink", "random", "sometimes"];

		if token.contains("always") {
			Self::Always
		} else if token.contains("bind") {
			Self::Bind
		} else if token.contains("talk") {
			Self::Talk
		} else if AMBIENT.iter().any(|class| token.contains(class)) {
			Self::Ambient
		} else if token.contains("never") {
			Self::Never
		} else {
			Self::Unknown(token.to_string())
		}
	}
}

/// A parsed interval value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Interval {
	raw: String,
	classes: Vec<IntervalClass>,
}

impl Interval {
	/// Parses an interval value such as `bind+sometimes` or `periodic,5`.
	pub fn parse(raw: &str) -> Self {
		let raw = raw.trim().to_string();
		let lowered = raw.to_lowercase();
		let head = lowered.split(',').next().unwrap_or_default();

		let mut classes = Vec::new();
		for token in head.split('+').map(str::trim).filter(|t| !t.is_empty()) {
			let class = IntervalClass::classify(token);
			if !classes.contains(&class) {
				classes.push(class);
			}
		}

		Self {
			raw,
			classes,
		}
	}

	/// Returns the value as written
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Returns the classes, in the order they were written
	pub fn classes(&self) -> &[IntervalClass] {
		&self.classes
	}

	/// Returns `true` if the interval carries the class
	pub fn has(&self, class: &IntervalClass) -> bool {
		self.classes.contains(class)
	}

	/// Always visible
	pub fn is_always(&self) -> bool {
		self.has(&IntervalClass::Always)
	}

	/// Bound to a bind group
	pub fn is_bind(&self) -> bool {
		self.has(&IntervalClass::Bind)
	}

	/// Driven by a timer
	pub fn is_ambient(&self) -> bool {
		self.has(&IntervalClass::Ambient)
	}

	/// Driven by talking
	pub fn is_talk(&self) -> bool {
		self.has(&IntervalClass::Talk)
	}
}

impl From<String> for Interval {
	fn from(value: String) -> Self {
		Self::parse(&value)
	}
}

impl From<Interval> for String {
	fn from(value: Interval) -> Self {
		value.raw
	}
}
