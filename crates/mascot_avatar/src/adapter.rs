//! Package conversion and recomposition.
//!
//! [`Importer`] turns an extracted package pair into an installed avatar
//! bundle: it parses both descriptors and the appearance package's surface
//! definitions, renders one base frame per emotion plus any derived blink and
//! talk frames, and writes `avatar.json` next to a `surfaces.json` cache.
//! Recomposition re-renders from that cache with another bind set, without
//! the original archive.

use std::{
	collections::{BTreeMap, BTreeSet},
	fs,
	path::{Path, PathBuf},
	thread::{self, JoinHandle},
};

use mascot_types::file::{Descriptor, ParseError, Pattern, SurfaceGraph};

use crate::{
	bundle::{AvatarBundle, AvatarId, BundleMeta, StyleFrames, SurfaceCache, constants},
	compose::compose,
	config::{Emotion, ImportConfig},
	emotion::{FrameKind, base_file_name, classify, combined_file_name, frame_file_name, target_pattern},
	error::AvatarError,
	flatten::{CollectedAnimation, FlattenedLayer, Flattener, Overrides, shift},
};

/// Converts packages into avatar bundles and recomposes installed ones.
#[derive(Debug, Clone, Default)]
pub struct Importer {
	config: ImportConfig,
}

impl Importer {
	/// Creates an importer
	pub fn new(config: ImportConfig) -> Self {
		Self {
			config,
		}
	}

	/// Returns the configuration
	pub fn config(&self) -> &ImportConfig {
		&self.config
	}

	/// Returns the bundle directory of an avatar
	pub fn bundle_dir(&self, id: &AvatarId) -> PathBuf {
		self.config.avatars_root.join(id.as_str())
	}

	/// Extracts an archive and installs the package pair it contains.
	///
	/// The archive is extracted below the configured packages root and stays
	/// there, since recomposition reads images from it later. The appearance
	/// directory named `master` is preferred when there are several.
	///
	/// # Errors
	///
	/// Returns [`AvatarError::NoAppearancePackage`] if the archive holds no
	/// appearance package, or any error of [`Importer::convert_and_install`].
	pub fn import_archive(&self, archive_path: impl AsRef<Path>) -> Result<AvatarId, AvatarError> {
		let archive_path = archive_path.as_ref();
		let source = fs::canonicalize(archive_path).unwrap_or_else(|_| archive_path.to_path_buf());
		let work_dir = self.work_dir(&source)?;

		let extracted =
			mascot_vfs::extract_with_depth(archive_path, &work_dir, self.config.max_probe_depth);
		let layout = match extracted {
			Ok(layout) => layout,
			Err(e) => {
				let _ = fs::remove_dir_all(&work_dir);
				return Err(e.into());
			}
		};
		fs::write(work_dir.join(constants::SOURCE_FILE_NAME), source.to_string_lossy().as_bytes())?;

		let appearance = layout
			.appearance_dirs
			.iter()
			.find(|dir| dir.file_name().is_some_and(|name| name.eq_ignore_ascii_case("master")))
			.or_else(|| layout.appearance_dirs.first())
			.ok_or_else(|| AvatarError::NoAppearancePackage {
				path: archive_path.to_path_buf(),
			})?;
		let definition = layout.definition_dirs.first().unwrap_or(appearance);

		self.convert_and_install(definition, appearance)
	}

	/// Converts an extracted package pair and installs the bundle.
	///
	/// When the archive has no separate definition package, pass the
	/// appearance directory for both.
	///
	/// # Errors
	///
	/// Returns [`AvatarError::NeutralSurfaceMissing`] if the neutral surface
	/// can be neither found nor rendered, or an IO error if the bundle cannot
	/// be written.
	pub fn convert_and_install(
		&self,
		definition_dir: impl AsRef<Path>,
		appearance_dir: impl AsRef<Path>,
	) -> Result<AvatarId, AvatarError> {
		let definition_dir = definition_dir.as_ref();
		let appearance_dir = appearance_dir.as_ref();

		let definition = Descriptor::open_in(definition_dir);
		let appearance = Descriptor::open_in(appearance_dir);

		let graph = match SurfaceGraph::load_dir(appearance_dir) {
			Ok(graph) => graph,
			Err(ParseError::NoSurfaceFiles {
				..
			}) => {
				log::warn!("No surface definitions in {}, using image files only", appearance_dir.display());
				SurfaceGraph::default()
			}
			Err(e) => return Err(e.into()),
		};

		let fallback_name = definition_dir
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default();
		let name = definition
			.name()
			.or_else(|| appearance.name())
			.map_or(fallback_name, str::to_string);
		let author = definition.author().or_else(|| appearance.author()).unwrap_or_default().to_string();

		let costume_source = if appearance.costumes().is_empty() { &definition } else { &appearance };
		let image_dir = fs::canonicalize(appearance_dir).unwrap_or_else(|_| appearance_dir.to_path_buf());

		let cache = SurfaceCache {
			version: constants::CACHE_VERSION,
			image_dir,
			graph,
			costumes: costume_source.costumes().to_vec(),
			default_bind_ids: costume_source.default_bind_ids().clone(),
			meta: BundleMeta {
				name,
				author,
				costumes: costume_source.costumes().to_vec(),
			},
		};

		let id = self.allocate_id(&cache)?;
		let bundle_dir = self.bundle_dir(&id);
		fs::create_dir_all(&bundle_dir)?;
		log::info!("Installing {} as {}", cache.meta.name, id);

		let binds = cache.default_bind_ids.clone();
		let mapping = self.render(&cache, &binds, &bundle_dir)?;
		cache.save(&bundle_dir)?;

		let bundle = AvatarBundle {
			id: id.clone(),
			mapping,
			meta: cache.meta,
			active_bind_ids: binds,
		};
		bundle.save(&bundle_dir)?;

		Ok(id)
	}

	/// Runs [`Importer::convert_and_install`] on a worker thread.
	pub fn spawn_convert(
		&self,
		definition_dir: impl Into<PathBuf>,
		appearance_dir: impl Into<PathBuf>,
	) -> JoinHandle<Result<AvatarId, AvatarError>> {
		let importer = self.clone();
		let (definition_dir, appearance_dir) = (definition_dir.into(), appearance_dir.into());
		thread::spawn(move || importer.convert_and_install(definition_dir, appearance_dir))
	}

	/// Re-renders an installed avatar with another bind set.
	///
	/// An empty selection on an avatar with costumes renders its defaults.
	/// The ID and metadata of the bundle are kept; only the mapping and the
	/// active bind set change.
	///
	/// # Errors
	///
	/// Returns [`AvatarError::CacheMissing`] if the bundle has no graph cache.
	pub fn recompose(
		&self,
		bundle_dir: impl AsRef<Path>,
		active_bind_ids: &BTreeSet<u32>,
	) -> Result<AvatarBundle, AvatarError> {
		let bundle_dir = bundle_dir.as_ref();
		let cache = SurfaceCache::load(bundle_dir)?;

		let binds = cache.effective_binds(active_bind_ids);
		if &binds != active_bind_ids {
			log::info!("Empty costume selection, rendering defaults {:?}", binds);
		}

		let mapping = self.render(&cache, &binds, bundle_dir)?;
		let id = match AvatarBundle::load(bundle_dir) {
			Ok(previous) => previous.id,
			Err(_) => {
				let dir_name = bundle_dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
				AvatarId::from_name(&dir_name)
			}
		};

		let bundle = AvatarBundle {
			id,
			mapping,
			meta: cache.meta,
			active_bind_ids: binds,
		};
		bundle.save(bundle_dir)?;
		log::info!("Recomposed {} with binds {:?}", bundle.id, bundle.active_bind_ids);

		Ok(bundle)
	}

	/// Picks the extraction directory of an archive.
	///
	/// A directory is reused, after clearing it, only when an earlier import
	/// of the same archive file owns it. Archives whose names slug alike get
	/// numbered directories.
	fn work_dir(&self, source: &Path) -> Result<PathBuf, AvatarError> {
		let stem = source.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
		let base = AvatarId::from_name(&stem);
		let mut candidate = base.clone();
		let mut n = 1;

		loop {
			let dir = self.config.packages_root().join(candidate.as_str());
			if !dir.exists() {
				return Ok(dir);
			}
			let owner = fs::read_to_string(dir.join(constants::SOURCE_FILE_NAME)).unwrap_or_default();
			if Path::new(&owner) == source {
				log::debug!("Replacing previous extraction at {}", dir.display());
				fs::remove_dir_all(&dir)?;
				return Ok(dir);
			}

			n += 1;
			candidate = base.with_suffix(n);
		}
	}

	/// Picks a free ID, reusing the directory of an earlier install from the same images
	fn allocate_id(&self, cache: &SurfaceCache) -> Result<AvatarId, AvatarError> {
		let base = AvatarId::from_name(&cache.meta.name);
		let mut candidate = base.clone();
		let mut n = 1;

		loop {
			let dir = self.bundle_dir(&candidate);
			if !dir.exists() {
				return Ok(candidate);
			}
			match SurfaceCache::load(&dir) {
				Ok(existing) if existing.image_dir == cache.image_dir => return Ok(candidate),
				Ok(_)
				| Err(AvatarError::CacheMissing {
					..
				}) => {}
				Err(e) => return Err(e),
			}

			n += 1;
			candidate = base.with_suffix(n);
		}
	}

	/// Renders every configured emotion and returns the bundle mapping
	fn render(
		&self,
		cache: &SurfaceCache,
		binds: &BTreeSet<u32>,
		bundle_dir: &Path,
	) -> Result<BTreeMap<String, StyleFrames>, AvatarError> {
		let flattener =
			Flattener::new(&cache.graph, &cache.image_dir, binds, self.config.max_flatten_depth);
		let neutral = self.config.neutral_surface();
		if !flattener.has_surface(neutral) {
			return Err(AvatarError::NeutralSurfaceMissing {
				surface: neutral,
			});
		}

		let mut targets: Vec<(Emotion, u32)> = Vec::new();
		for entry in &self.config.emotions {
			if flattener.has_surface(entry.surface) {
				targets.push((entry.emotion, entry.surface));
			} else if entry.emotion.falls_back_to_neutral() {
				log::info!("Surface {} missing, {} uses neutral", entry.surface, entry.emotion);
				targets.push((entry.emotion, neutral));
			} else {
				log::info!("Surface {} missing, {} omitted", entry.surface, entry.emotion);
			}
		}

		let mut rendered: BTreeMap<u32, StyleFrames> = BTreeMap::new();
		let mut failed = BTreeSet::new();
		for (emotion, surface_id) in &targets {
			if rendered.contains_key(surface_id) || failed.contains(surface_id) {
				continue;
			}
			match self.render_surface(&flattener, *surface_id, &cache.image_dir, bundle_dir) {
				Ok(frames) => {
					rendered.insert(*surface_id, frames);
				}
				Err(e) if *surface_id == neutral => return Err(e),
				Err(e) => {
					log::warn!("Skipping {} (surface {}): {}", emotion, surface_id, e);
					failed.insert(*surface_id);
				}
			}
		}

		Ok(targets
			.into_iter()
			.filter_map(|(emotion, surface_id)| {
				rendered.get(&surface_id).map(|frames| (emotion.key().to_string(), frames.clone()))
			})
			.collect())
	}

	/// Renders the base frame of a surface and whatever derived frames it supports
	fn render_surface(
		&self,
		flattener: &Flattener<'_>,
		surface_id: u32,
		image_dir: &Path,
		bundle_dir: &Path,
	) -> Result<StyleFrames, AvatarError> {
		let layers = flattener.flatten(surface_id, (0, 0), 0, &[], &Overrides::new());
		if layers.is_empty() {
			return Err(AvatarError::NothingToCompose {
				surface: surface_id,
			});
		}

		let base = compose(&layers, image_dir)?;
		let base_name = base_file_name(surface_id);
		base.save(bundle_dir.join(&base_name))?;
		log::debug!("Surface {}: {} layers", surface_id, layers.len());

		let mut blink = None;
		let mut talk = None;
		for collected in flattener.collect_animations(surface_id) {
			match classify(&collected, flattener.active_binds()) {
				Some(FrameKind::Blink) if blink.is_none() => blink = Some(collected),
				Some(FrameKind::Talk) if talk.is_none() => talk = Some(collected),
				_ => {}
			}
		}

		let derived = DerivedFrames {
			flattener,
			root: surface_id,
			image_dir,
			bundle_dir,
		};

		let mut frames = StyleFrames {
			base: base_name,
			..StyleFrames::default()
		};
		if let Some(blink) = &blink {
			let name = frame_file_name(surface_id, FrameKind::Blink, blink.id);
			frames.eyes_closed = derived.render(&[(FrameKind::Blink, blink)], name)?;
		}
		if let Some(talk) = &talk {
			let name = frame_file_name(surface_id, FrameKind::Talk, talk.id);
			frames.mouth_open = derived.render(&[(FrameKind::Talk, talk)], name)?;
		}
		if let (Some(blink), Some(talk)) = (&blink, &talk)
			&& frames.eyes_closed.is_some()
			&& frames.mouth_open.is_some()
		{
			let name = combined_file_name(surface_id, talk.id, blink.id);
			frames.mouth_open_eyes_closed =
				derived.render(&[(FrameKind::Talk, talk), (FrameKind::Blink, blink)], name)?;
		}

		Ok(frames)
	}
}

/// Renders frames of one root surface with some animations switched to a target pattern
struct DerivedFrames<'a> {
	flattener: &'a Flattener<'a>,
	root: u32,
	image_dir: &'a Path,
	bundle_dir: &'a Path,
}

impl DerivedFrames<'_> {
	/// Renders and saves one derived frame, `None` if there is nothing to show
	fn render(
		&self,
		parts: &[(FrameKind, &CollectedAnimation<'_>)],
		file_name: String,
	) -> Result<Option<String>, AvatarError> {
		let Some(layers) = self.layers(parts) else {
			return Ok(None);
		};

		match compose(&layers, self.image_dir) {
			Ok(image) => {
				image.save(self.bundle_dir.join(&file_name))?;
				Ok(Some(file_name))
			}
			Err(AvatarError::EmptyComposition) => {
				log::warn!("Derived frame {} has no loadable layer", file_name);
				Ok(None)
			}
			Err(e) => Err(e),
		}
	}

	/// The root flattened without the switched animations, then each target on top
	fn layers(&self, parts: &[(FrameKind, &CollectedAnimation<'_>)]) -> Option<Vec<FlattenedLayer>> {
		let mut exclude = Vec::new();
		let mut overrides = Overrides::new();
		let mut targets = Vec::new();

		for (kind, collected) in parts {
			let target = target_pattern(*kind, collected.owner, collected.animation)?;
			let target_id = target.surface_id()?;
			if *kind == FrameKind::Talk && target_id == collected.owner {
				return None;
			}

			exclude.push(collected.id);
			if let Some(default_id) = collected.animation.patterns.first().and_then(Pattern::surface_id)
				&& default_id != target_id
			{
				overrides.insert(default_id, target_id);
			}
			targets.push((target_id, shift(collected.offset, target.x, target.y)));
		}

		let mut layers = self.flattener.flatten(self.root, (0, 0), 0, &exclude, &overrides);
		for (target_id, offset) in targets {
			layers.extend(self.flattener.flatten(target_id, offset, 1, &exclude, &overrides));
		}
		Some(layers)
	}
}
