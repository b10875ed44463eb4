//! Surface flattening.
//!
//! Flattening resolves a surface into the ordered list of images that make it
//! up: an implicit base image found by file name, the surface's elements
//! (following references to other surfaces), and the default frame of every
//! animation that is visible in a static render. Offsets accumulate down the
//! recursion so every produced layer is positioned relative to the root.
//!
//! The same [`Flattener`] serves first conversion and later recomposition; only
//! the active bind set differs.

use std::{
	collections::{BTreeMap, BTreeSet},
	path::Path,
};

use mascot_types::file::{Animation, Method, SurfaceGraph};
use serde::Serialize;

use crate::compose::resolve_image;

/// Surface substitutions applied while flattening
pub type Overrides = BTreeMap<u32, u32>;

/// A drawable layer with an absolute offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlattenedLayer {
	/// Image file name, relative to the image directory
	pub file: String,
	/// Composition method
	pub method: Method,
	/// Horizontal offset from the root surface origin
	pub x: i32,
	/// Vertical offset from the root surface origin
	pub y: i32,
}

/// An animation reached while walking a surface
#[derive(Debug, Clone, Copy)]
pub struct CollectedAnimation<'a> {
	/// Surface the animation belongs to
	pub owner: u32,
	/// Animation ID within its owner
	pub id: u32,
	/// Offset of the owner relative to the walk root
	pub offset: (i32, i32),
	/// The animation itself
	pub animation: &'a Animation,
}

/// Moves an offset, clamping at the `i32` range
pub fn shift(offset: (i32, i32), dx: i32, dy: i32) -> (i32, i32) {
	(offset.0.saturating_add(dx), offset.1.saturating_add(dy))
}

/// File names probed for a surface without explicit base element
pub fn implicit_base_names(surface_id: u32) -> Vec<String> {
	let mut names = vec![format!("surface{surface_id}.png")];
	if surface_id < 10 {
		names.push(format!("surface{surface_id:02}.png"));
	}
	names
}

/// Flattens surfaces of one graph against one image directory.
#[derive(Debug, Clone, Copy)]
pub struct Flattener<'a> {
	graph: &'a SurfaceGraph,
	image_dir: &'a Path,
	active_binds: &'a BTreeSet<u32>,
	max_depth: usize,
}

impl<'a> Flattener<'a> {
	/// Creates a flattener.
	///
	/// # Arguments
	/// * `graph` - Parsed surface definitions
	/// * `image_dir` - Directory image file names are relative to
	/// * `active_binds` - Bind group IDs treated as worn
	/// * `max_depth` - Recursion bound; deeper references are dropped
	pub fn new(
		graph: &'a SurfaceGraph,
		image_dir: &'a Path,
		active_binds: &'a BTreeSet<u32>,
		max_depth: usize,
	) -> Self {
		Self {
			graph,
			image_dir,
			active_binds,
			max_depth,
		}
	}

	/// Returns the graph being flattened
	pub fn graph(&self) -> &'a SurfaceGraph {
		self.graph
	}

	/// Returns the active bind set
	pub fn active_binds(&self) -> &'a BTreeSet<u32> {
		self.active_binds
	}

	/// Returns `true` if the surface is defined or has an implicit base image
	pub fn has_surface(&self, surface_id: u32) -> bool {
		self.graph.contains(surface_id) || self.implicit_base(surface_id).is_some()
	}

	/// Finds the implicit base image of a surface
	pub fn implicit_base(&self, surface_id: u32) -> Option<String> {
		implicit_base_names(surface_id)
			.into_iter()
			.find(|name| resolve_image(self.image_dir, name).is_some())
	}

	/// Flattens a surface into drawable layers.
	///
	/// # Arguments
	/// * `surface_id` - Surface to flatten
	/// * `offset` - Offset accumulated so far
	/// * `depth` - Current recursion depth, 0 for the root
	/// * `exclude` - Animation IDs that must not be drawn
	/// * `overrides` - Surfaces substituted for others
	pub fn flatten(
		&self,
		surface_id: u32,
		offset: (i32, i32),
		depth: usize,
		exclude: &[u32],
		overrides: &Overrides,
	) -> Vec<FlattenedLayer> {
		if depth > self.max_depth {
			return Vec::new();
		}

		let effective_id = overrides.get(&surface_id).copied().unwrap_or(surface_id);
		let (ox, oy) = offset;
		let mut layers = Vec::new();

		if let Some(file) = self.implicit_base(effective_id) {
			layers.push(FlattenedLayer {
				file,
				method: Method::Base,
				x: ox,
				y: oy,
			});
		}

		let Some(surface) = self.graph.surface(effective_id) else {
			return layers;
		};

		for element in &surface.elements {
			let (x, y) = shift(offset, element.x, element.y);
			match element.surface_ref().filter(|id| self.graph.contains(*id)) {
				Some(nested) => {
					layers.extend(self.flatten(nested, (x, y), depth + 1, exclude, overrides));
				}
				None => layers.push(FlattenedLayer {
					file: element.file.clone(),
					method: element.method,
					x,
					y,
				}),
			}
		}

		for (animation_id, animation) in &surface.animations {
			if exclude.contains(animation_id) || !self.is_static_visible(*animation_id, animation) {
				continue;
			}
			let Some(pattern) = animation.patterns.first() else {
				continue;
			};
			if let Some(target) = pattern.surface_id() {
				let shifted = shift(offset, pattern.x, pattern.y);
				layers.extend(self.flatten(target, shifted, depth + 1, exclude, overrides));
			}
		}

		layers
	}

	/// Whether an animation's default frame belongs in a static render
	pub fn is_static_visible(&self, animation_id: u32, animation: &Animation) -> bool {
		let interval = &animation.interval;
		interval.is_always()
			|| (interval.is_bind() && self.active_binds.contains(&animation_id))
			|| interval.is_ambient()
	}

	/// Collects every animation reachable from a surface.
	///
	/// The walk follows the same element and default-frame references as
	/// [`Flattener::flatten`], but records every animation of every surface it
	/// visits. Bind animations owned by surfaces whose ID is in the active bind
	/// set are added afterwards if the walk did not reach them.
	pub fn collect_animations(&self, surface_id: u32) -> Vec<CollectedAnimation<'a>> {
		let mut collected = Vec::new();
		let mut seen = BTreeSet::new();
		self.collect_into(surface_id, (0, 0), 0, &mut collected, &mut seen);

		for bind_id in self.active_binds {
			let Some(surface) = self.graph.surface(*bind_id) else {
				continue;
			};
			for (animation_id, animation) in &surface.animations {
				if animation.interval.is_bind()
					&& self.active_binds.contains(animation_id)
					&& seen.insert((*bind_id, *animation_id))
				{
					collected.push(CollectedAnimation {
						owner: *bind_id,
						id: *animation_id,
						offset: (0, 0),
						animation,
					});
				}
			}
		}

		collected
	}

	fn collect_into(
		&self,
		surface_id: u32,
		offset: (i32, i32),
		depth: usize,
		collected: &mut Vec<CollectedAnimation<'a>>,
		seen: &mut BTreeSet<(u32, u32)>,
	) {
		if depth > self.max_depth {
			return;
		}
		let Some(surface) = self.graph.surface(surface_id) else {
			return;
		};

		for element in &surface.elements {
			if let Some(nested) = element.surface_ref().filter(|id| self.graph.contains(*id)) {
				let shifted = shift(offset, element.x, element.y);
				self.collect_into(nested, shifted, depth + 1, collected, seen);
			}
		}

		for (animation_id, animation) in &surface.animations {
			if !seen.insert((surface_id, *animation_id)) {
				continue;
			}
			collected.push(CollectedAnimation {
				owner: surface_id,
				id: *animation_id,
				offset,
				animation,
			});

			if !self.is_static_visible(*animation_id, animation) {
				continue;
			}
			let Some(pattern) = animation.patterns.first() else {
				continue;
			};
			if let Some(target) = pattern.surface_id() {
				let shifted = shift(offset, pattern.x, pattern.y);
				self.collect_into(target, shifted, depth + 1, collected, seen);
			}
		}
	}
}
