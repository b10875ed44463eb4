//! Background recomposition.
//!
//! Costume changes arrive faster than renders finish. Each bundle directory
//! has at most one render in flight; requests arriving meanwhile replace the
//! pending one, so only the latest selection is rendered after the current run.

use std::{
	collections::{BTreeSet, HashMap},
	fs,
	path::{Path, PathBuf},
	sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
	thread,
};

use crate::adapter::Importer;

/// Pending request of a bundle whose worker is running
#[derive(Debug, Default)]
struct Slot {
	next: Option<BTreeSet<u32>>,
}

#[derive(Debug, Default)]
struct State {
	slots: Mutex<HashMap<PathBuf, Slot>>,
	idle: Condvar,
}

impl State {
	fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Slot>> {
		self.slots.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// Coalescing queue of recomposition requests.
#[derive(Debug, Clone)]
pub struct RecomposeQueue {
	importer: Importer,
	state: Arc<State>,
}

impl RecomposeQueue {
	/// Creates a queue rendering with `importer`
	pub fn new(importer: Importer) -> Self {
		Self {
			importer,
			state: Arc::default(),
		}
	}

	/// Requests a recomposition of a bundle with the given bind set.
	///
	/// Starts a worker if the bundle is idle, otherwise replaces the request
	/// waiting behind the running one.
	pub fn submit(&self, bundle_dir: impl Into<PathBuf>, active_bind_ids: BTreeSet<u32>) {
		let bundle_dir = slot_key(bundle_dir.into());

		let mut slots = self.state.lock();
		if let Some(slot) = slots.get_mut(&bundle_dir) {
			if slot.next.replace(active_bind_ids).is_some() {
				log::debug!("Superseded pending recomposition of {}", bundle_dir.display());
			}
			return;
		}
		slots.insert(bundle_dir.clone(), Slot::default());
		drop(slots);

		let importer = self.importer.clone();
		let state = Arc::clone(&self.state);
		thread::spawn(move || run(&importer, &state, bundle_dir, active_bind_ids));
	}

	/// Returns `true` if a recomposition of the bundle is running
	pub fn is_busy(&self, bundle_dir: impl Into<PathBuf>) -> bool {
		self.state.lock().contains_key(&slot_key(bundle_dir.into()))
	}

	/// Blocks until no recomposition is running
	pub fn wait_idle(&self) {
		let mut slots = self.state.lock();
		while !slots.is_empty() {
			slots = self.state.idle.wait(slots).unwrap_or_else(PoisonError::into_inner);
		}
	}
}

/// One key per bundle however its path was spelled
fn slot_key(bundle_dir: PathBuf) -> PathBuf {
	fs::canonicalize(&bundle_dir).unwrap_or(bundle_dir)
}

/// Frees a bundle's slot when its worker ends without doing so, i.e. by unwinding
struct SlotRelease<'a> {
	state: &'a State,
	key: &'a Path,
	released: bool,
}

impl Drop for SlotRelease<'_> {
	fn drop(&mut self) {
		if self.released {
			return;
		}
		if thread::panicking() {
			log::error!("Recomposition of {} aborted", self.key.display());
		}
		self.state.lock().remove(self.key);
		self.state.idle.notify_all();
	}
}

fn run(importer: &Importer, state: &State, bundle_dir: PathBuf, mut binds: BTreeSet<u32>) {
	let mut release = SlotRelease {
		state,
		key: &bundle_dir,
		released: false,
	};

	loop {
		if let Err(e) = importer.recompose(&bundle_dir, &binds) {
			log::error!("Recomposition of {} failed: {}", bundle_dir.display(), e);
		}

		let mut slots = state.lock();
		match slots.get_mut(&bundle_dir).and_then(|slot| slot.next.take()) {
			Some(next) => binds = next,
			None => {
				slots.remove(&bundle_dir);
				release.released = true;
				state.idle.notify_all();
				return;
			}
		}
	}
}
