//! Shell import utility.
//!
//! Provides five subcommands:
//! - `extract`: unpack a package archive and list the package directories found.
//! - `install`: convert an already extracted package pair into an avatar bundle.
//! - `import`: extract an archive and install its package pair in one go.
//! - `recompose`: re-render an installed bundle with another costume selection.
//! - `inspect`: summarize a package directory, optionally dumping the flattened
//!   layers of one surface as JSON.
//!
//! Settings come from an optional config file (`--config`), then `MASCOT_*`
//! environment variables, then command line flags.
//!
//! # Usage Examples
//!
//! ```bash
//! # Import an archive into ./avatars
//! cargo run --example shell_import -- import ghost.nar
//!
//! # Switch costumes 3 and 5 on
//! cargo run --example shell_import -- recompose avatars/test_ghost --bind 3,5
//!
//! # Show what surface 0 is made of
//! cargo run --example shell_import -- inspect ghost/shell/master --surface 0
//! ```

use std::{
	collections::BTreeSet,
	path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;
use mascot_rs::prelude::*;
use mascot_rs::mascot_avatar::{Flattener, Overrides};

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let config = load_config(&cli.global)?;
	match cli.command {
		Command::Extract(args) => run_extract(&config, args),
		Command::Install(args) => run_install(config, args),
		Command::Import(args) => run_import(config, args),
		Command::Recompose(args) => run_recompose(config, args),
		Command::Inspect(args) => run_inspect(&config, args),
	}
}

#[derive(Parser)]
#[command(name = "shell_import")]
#[command(author = "mascot-rs project")]
#[command(version)]
#[command(about = "Import desktop mascot packages as avatar bundles", long_about = None)]
struct Cli {
	#[command(flatten)]
	global: GlobalArgs,

	#[command(subcommand)]
	command: Command,
}

#[derive(Args)]
struct GlobalArgs {
	/// Configuration file (TOML, JSON, ...)
	#[arg(short, long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Directory bundles are installed into
	#[arg(short, long, global = true, value_name = "DIR", env = "MASCOT_AVATARS_ROOT")]
	avatars_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
	/// Extract an archive and list its package directories
	Extract(ExtractArgs),
	/// Install an extracted package pair
	Install(InstallArgs),
	/// Extract and install an archive
	Import(ImportArgs),
	/// Re-render an installed bundle with another costume selection
	Recompose(RecomposeArgs),
	/// Summarize a package directory
	Inspect(InspectArgs),
}

#[derive(Args)]
struct ExtractArgs {
	/// Archive to extract
	#[arg(value_name = "ARCHIVE")]
	archive: PathBuf,

	/// Output directory
	#[arg(short, long, value_name = "DIR", default_value = "extracted")]
	output: PathBuf,
}

#[derive(Args)]
struct InstallArgs {
	/// Definition package directory
	#[arg(value_name = "DEFINITION")]
	definition: PathBuf,

	/// Appearance package directory, defaults to the definition directory
	#[arg(value_name = "APPEARANCE")]
	appearance: Option<PathBuf>,
}

#[derive(Args)]
struct ImportArgs {
	/// Archive to import
	#[arg(value_name = "ARCHIVE")]
	archive: PathBuf,
}

#[derive(Args)]
struct RecomposeArgs {
	/// Installed bundle directory
	#[arg(value_name = "BUNDLE")]
	bundle: PathBuf,

	/// Bind group IDs to wear; none means the authored defaults
	#[arg(short, long, value_name = "IDS", value_delimiter = ',')]
	bind: Vec<u32>,
}

#[derive(Args)]
struct InspectArgs {
	/// Package directory holding descript.txt and surface definitions
	#[arg(value_name = "DIR")]
	dir: PathBuf,

	/// Print the flattened layers of this surface as JSON
	#[arg(short, long, value_name = "ID")]
	surface: Option<u32>,

	/// Bind group IDs to treat as worn while flattening
	#[arg(short, long, value_name = "IDS", value_delimiter = ',')]
	bind: Vec<u32>,
}

fn load_config(args: &GlobalArgs) -> Result<ImportConfig> {
	let mut builder = config::Config::builder();
	if let Some(path) = &args.config {
		builder = builder.add_source(config::File::from(path.as_path()));
	}
	builder = builder
		.add_source(config::Environment::with_prefix("MASCOT").try_parsing(true))
		.set_override_option(
			"avatars_root",
			args.avatars_root.as_ref().map(|p| p.to_string_lossy().into_owned()),
		)?;

	let config: ImportConfig = builder
		.build()
		.context("Failed to load configuration")?
		.try_deserialize()
		.context("Invalid configuration")?;
	if config.max_flatten_depth == 0 {
		bail!("max_flatten_depth must be greater than zero");
	}
	Ok(config)
}

fn run_extract(config: &ImportConfig, args: ExtractArgs) -> Result<()> {
	let layout = mascot_rs::mascot_vfs::extract_with_depth(&args.archive, &args.output, config.max_probe_depth)
		.with_context(|| format!("Failed to extract {}", args.archive.display()))?;

	if layout.is_empty() {
		println!("No package directories found in {}", args.archive.display());
		return Ok(());
	}
	for dir in &layout.definition_dirs {
		println!("{:<12} {}", PackageRole::Definition.to_string(), dir.display());
	}
	for dir in &layout.appearance_dirs {
		println!("{:<12} {}", PackageRole::Appearance.to_string(), dir.display());
	}
	Ok(())
}

fn run_install(config: ImportConfig, args: InstallArgs) -> Result<()> {
	let appearance = args.appearance.as_ref().unwrap_or(&args.definition);
	let importer = Importer::new(config);
	let id = importer
		.convert_and_install(&args.definition, appearance)
		.with_context(|| format!("Failed to install {}", args.definition.display()))?;

	print_bundle(&importer.bundle_dir(&id))
}

fn run_import(config: ImportConfig, args: ImportArgs) -> Result<()> {
	let importer = Importer::new(config);
	let id = importer
		.import_archive(&args.archive)
		.with_context(|| format!("Failed to import {}", args.archive.display()))?;

	print_bundle(&importer.bundle_dir(&id))
}

fn run_recompose(config: ImportConfig, args: RecomposeArgs) -> Result<()> {
	let binds: BTreeSet<u32> = args.bind.into_iter().collect();
	let importer = Importer::new(config);
	importer
		.recompose(&args.bundle, &binds)
		.with_context(|| format!("Failed to recompose {}", args.bundle.display()))?;

	print_bundle(&args.bundle)
}

fn run_inspect(config: &ImportConfig, args: InspectArgs) -> Result<()> {
	let descriptor = Descriptor::open_in(&args.dir);
	let graph = SurfaceGraph::load_dir(&args.dir)
		.with_context(|| format!("Failed to read surface definitions in {}", args.dir.display()))?;

	println!("Name:      {}", descriptor.name().unwrap_or("<unset>"));
	println!("Author:    {}", descriptor.author().unwrap_or("<unset>"));
	println!("Type:      {}", descriptor.package_type().unwrap_or_else(|| "<unset>".to_string()));
	println!("Encoding:  {}", descriptor.encoding());
	println!("Surfaces:  {}", graph.len());
	println!("Aliases:   {}", graph.aliases.len());
	for costume in descriptor.costumes() {
		let marker = if costume.is_default { "*" } else { " " };
		match &costume.category {
			Some(category) => println!("  {marker} {:>5} {} / {}", costume.id, category, costume.name),
			None => println!("  {marker} {:>5} {}", costume.id, costume.name),
		}
	}

	let Some(surface_id) = args.surface else {
		return Ok(());
	};

	let binds: BTreeSet<u32> = if args.bind.is_empty() {
		descriptor.default_bind_ids().clone()
	} else {
		args.bind.into_iter().collect()
	};
	let flattener = Flattener::new(&graph, &args.dir, &binds, config.max_flatten_depth);
	if !flattener.has_surface(surface_id) {
		bail!("Surface {} is not defined in {}", surface_id, args.dir.display());
	}

	let layers = flattener.flatten(surface_id, (0, 0), 0, &[], &Overrides::new());
	info!("Surface {} flattens to {} layers", surface_id, layers.len());
	println!("{}", serde_json::to_string_pretty(&layers)?);
	Ok(())
}

fn print_bundle(bundle_dir: &Path) -> Result<()> {
	let bundle = AvatarBundle::load(bundle_dir)
		.with_context(|| format!("Failed to read bundle {}", bundle_dir.display()))?;

	println!("Installed {} ({}) at {}", bundle.meta.name, bundle.id, bundle_dir.display());
	for (emotion, frames) in &bundle.mapping {
		println!("  {:<8} {}", emotion, frames.base);
		for derived in [&frames.eyes_closed, &frames.mouth_open, &frames.mouth_open_eyes_closed]
			.into_iter()
			.flatten()
		{
			println!("  {:<8} {}", "", derived);
		}
	}
	Ok(())
}
