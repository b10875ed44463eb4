//! Line-oriented parser for surface definition text.

use std::{collections::BTreeSet, sync::LazyLock};

use regex::Regex;

use super::{
	Animation, Collision, Element, Interval, Method, Pattern, SurfaceGraph, range::parse_id_set,
};

static SURFACE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)^surface(?:\.append)?\s*([0-9!][0-9,!\-\s]*)$")
		.expect("surface header pattern is valid")
});

static ALIAS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)^([a-z0-9_]+)\.surface\.alias$").expect("alias header pattern is valid")
});

static ELEMENT_KEY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^element(\d+)$").expect("element pattern is valid"));

static COLLISION_KEY: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^collision(\d+)$").expect("collision pattern is valid"));

static ANIMATION_KEY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^animation(\d+)\.(interval|pattern\d+)$").expect("animation pattern is valid")
});

static LEGACY_ANIMATION_KEY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(\d+)(interval|pattern\d+)$").expect("legacy animation pattern is valid")
});

/// Block a `{ ... }` region belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
	/// Global `descript` settings
	Descript,
	/// Surface body for the selected IDs
	Surfaces(BTreeSet<u32>),
	/// Alias table for a scope (`sakura`, `kero`, ...)
	Alias(String),
	/// Recognized nothing; contents are skipped
	Ignored,
}

/// Field order of an animation pattern line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternSyntax {
	/// `animationN.patternM,method,surface,wait,x,y`
	Modern,
	/// `NpatternM,surface,wait,method,x,y`
	Legacy,
}

/// Short-lived parser state, one per parse.
pub(super) struct Parser {
	graph: SurfaceGraph,
	depth: usize,
	pending: Option<Block>,
	block: Option<Block>,
}

impl Parser {
	pub(super) fn new() -> Self {
		let mut graph = SurfaceGraph::default();
		for (key, value) in [("version", "1"), ("collision-sort", "ascend"), ("animation-sort", "ascend")]
		{
			graph.settings.insert(key.to_string(), value.to_string());
		}

		Self {
			graph,
			depth: 0,
			pending: None,
			block: None,
		}
	}

	pub(super) fn parse(mut self, text: &str) -> SurfaceGraph {
		for line in text.lines() {
			let line = line.trim();
			if line.is_empty() || line.starts_with("//") {
				continue;
			}
			self.line(line);
		}

		if self.depth > 0 {
			log::warn!("Surface definitions end inside an unclosed block");
		}
		self.graph
	}

	/// Splits braces glued to a statement (`surface0 {`, `{`, `...}`)
	fn line(&mut self, line: &str) {
		if let Some((head, tail)) = line.split_once('{') {
			let head = head.trim();
			if !head.is_empty() {
				self.statement(head);
			}
			self.open();
			let tail = tail.trim();
			if !tail.is_empty() {
				self.line(tail);
			}
		} else if let Some(head) = line.strip_suffix('}') {
			let head = head.trim();
			if !head.is_empty() {
				self.statement(head);
			}
			self.close();
		} else {
			self.statement(line);
		}
	}

	fn open(&mut self) {
		self.depth += 1;
		if self.depth > 1 {
			return;
		}

		let block = self.pending.take().unwrap_or(Block::Ignored);
		if let Block::Surfaces(ids) = &block {
			for id in ids {
				self.graph.surfaces.entry(*id).or_default();
			}
		}
		self.block = Some(block);
	}

	fn close(&mut self) {
		if self.depth == 0 {
			log::debug!("Ignoring unmatched closing brace");
			return;
		}

		self.depth -= 1;
		if self.depth == 0 {
			self.block = None;
		}
	}

	fn statement(&mut self, line: &str) {
		if self.depth == 0 {
			self.pending = Some(header(line));
			return;
		}

		match &self.block {
			Some(Block::Descript) => {
				if let Some((key, value)) = split_pair(line) {
					self.graph.settings.insert(key.to_lowercase(), value.to_string());
				}
			}
			Some(Block::Alias(scope)) => {
				if let Some((key, value)) = split_pair(line) {
					let key = format!("{}.{}", scope, key);
					self.graph.aliases.insert(key, value.to_string());
				}
			}
			Some(Block::Surfaces(ids)) if !ids.is_empty() => {
				let ids = ids.clone();
				self.body(&ids, line);
			}
			_ => {}
		}
	}

	/// Applies one surface body line to every selected surface
	fn body(&mut self, ids: &BTreeSet<u32>, line: &str) {
		let fields: Vec<&str> = line.split(',').map(str::trim).collect();
		let key = fields[0].to_ascii_lowercase();

		if ELEMENT_KEY.is_match(&key) {
			let Some(element) = parse_element(&fields) else {
				log::debug!("Skipping malformed element line: {}", line);
				return;
			};
			for id in ids {
				self.graph.surfaces.entry(*id).or_default().elements.push(element.clone());
			}
		} else if let Some(caps) = COLLISION_KEY.captures(&key) {
			let Some(collision) = parse_collision(parse_u32(&caps[1]), &fields) else {
				log::debug!("Skipping malformed collision line: {}", line);
				return;
			};
			for id in ids {
				self.graph.surfaces.entry(*id).or_default().collisions.push(collision.clone());
			}
		} else if let Some(caps) = ANIMATION_KEY.captures(&key) {
			self.animation(ids, parse_u32(&caps[1]), &caps[2], line, PatternSyntax::Modern);
		} else if let Some(caps) = LEGACY_ANIMATION_KEY.captures(&key) {
			self.animation(ids, parse_u32(&caps[1]), &caps[2], line, PatternSyntax::Legacy);
		}
	}

	fn animation(
		&mut self,
		ids: &BTreeSet<u32>,
		animation_id: u32,
		sub_key: &str,
		line: &str,
		syntax: PatternSyntax,
	) {
		if sub_key == "interval" {
			let Some((_, value)) = line.split_once(',') else {
				return;
			};
			let interval = Interval::parse(value);
			for id in ids {
				let animation = self.animation_mut(*id, animation_id);
				animation.interval = interval.clone();
			}
			return;
		}

		let fields: Vec<&str> = line.split(',').map(str::trim).collect();
		let Some(pattern) = parse_pattern(&fields, syntax) else {
			log::debug!("Skipping malformed pattern line: {}", line);
			return;
		};
		for id in ids {
			self.animation_mut(*id, animation_id).patterns.push(pattern.clone());
		}
	}

	fn animation_mut(&mut self, surface_id: u32, animation_id: u32) -> &mut Animation {
		self.graph
			.surfaces
			.entry(surface_id)
			.or_default()
			.animations
			.entry(animation_id)
			.or_default()
	}
}

/// Interprets a top-level line as the header of the next block
fn header(line: &str) -> Block {
	if line.eq_ignore_ascii_case("descript") {
		return Block::Descript;
	}

	if let Some(caps) = SURFACE_HEADER.captures(line) {
		return Block::Surfaces(parse_id_set(&caps[1]));
	}

	if let Some(caps) = ALIAS_HEADER.captures(line) {
		return Block::Alias(caps[1].to_lowercase());
	}

	Block::Ignored
}

fn split_pair(line: &str) -> Option<(&str, &str)> {
	let (key, value) = line.split_once(',')?;
	let (key, value) = (key.trim(), value.trim());
	(!key.is_empty()).then_some((key, value))
}

fn parse_i32(value: &str) -> i32 {
	value.trim().parse().unwrap_or(0)
}

fn parse_u32(value: &str) -> u32 {
	value.trim().parse().unwrap_or(0)
}

/// `elementN,method,file,x,y`
fn parse_element(fields: &[&str]) -> Option<Element> {
	if fields.len() < 5 {
		return None;
	}

	Some(Element {
		method: Method::parse(fields[1]),
		file: fields[2].to_string(),
		x: parse_i32(fields[3]),
		y: parse_i32(fields[4]),
	})
}

/// `collisionN,x,y,x2,y2,name`
fn parse_collision(id: u32, fields: &[&str]) -> Option<Collision> {
	if fields.len() < 6 {
		return None;
	}

	Some(Collision {
		id,
		x: parse_i32(fields[1]),
		y: parse_i32(fields[2]),
		x2: parse_i32(fields[3]),
		y2: parse_i32(fields[4]),
		name: fields[5].to_string(),
	})
}

/// Pattern lines need at least a method, a surface and a wait; offsets default to 0.
fn parse_pattern(fields: &[&str], syntax: PatternSyntax) -> Option<Pattern> {
	if fields.len() < 4 {
		return None;
	}

	let offset = |index: usize| fields.get(index).map_or(0, |v| parse_i32(v));
	let (method, surface_ref, wait) = match syntax {
		PatternSyntax::Modern => (fields[1], fields[2], fields[3]),
		PatternSyntax::Legacy => (fields[3], fields[1], fields[2]),
	};

	Some(Pattern {
		method: method.to_ascii_lowercase(),
		surface_ref: surface_ref.to_string(),
		wait: wait.to_string(),
		x: offset(4),
		y: offset(5),
	})
}
