//! # Background Jobs
//!
//! Long builds run on a dedicated worker thread. The caller and the worker
//! share one `Progress`; nothing else crosses the thread boundary. The
//! finished index is handed back through `Job::join`.
//!
//! Cancellation is cooperative: workers poll `Progress::is_cancelled` at
//! each unit of work and return whatever they built so far, which is always
//! a valid tree.

pub mod images;
pub mod words;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::POLL_INTERVAL_MS;

pub use images::{spawn_index, ImageIndex, IndexOptions};
pub use words::{spawn_build, spawn_load};

/// Progress of one job, written by the worker and polled by the caller
#[derive(Debug, Default)]
pub struct Progress {
	total: AtomicU64,
	completed: AtomicU64,
	done: AtomicBool,
	cancel_requested: AtomicBool,
}

/// Point-in-time copy of a `Progress`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
	pub total: u64,
	pub completed: u64,
	pub done: bool,
}

impl Progress {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_total(&self, total: u64) {
		self.total.store(total, Ordering::Relaxed);
	}

	pub fn advance(&self, units: u64) {
		self.completed.fetch_add(units, Ordering::Relaxed);
	}

	/// Raise `completed` to `units`; never moves it backwards.
	pub fn set_completed(&self, units: u64) {
		self.completed.fetch_max(units, Ordering::Relaxed);
	}

	pub fn cancel(&self) {
		self.cancel_requested.store(true, Ordering::Release);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel_requested.load(Ordering::Acquire)
	}

	pub fn is_done(&self) -> bool {
		self.done.load(Ordering::Acquire)
	}

	fn finish(&self) {
		self.done.store(true, Ordering::Release);
	}

	pub fn snapshot(&self) -> ProgressSnapshot {
		ProgressSnapshot {
			total: self.total.load(Ordering::Relaxed),
			completed: self.completed.load(Ordering::Relaxed),
			done: self.is_done(),
		}
	}
}

impl ProgressSnapshot {
	/// Completion in `[0.0, 1.0]`
	pub fn fraction(&self) -> f32 {
		if self.total == 0 {
			return if self.done { 1.0 } else { 0.0 };
		}
		(self.completed as f32 / self.total as f32).min(1.0)
	}

	pub fn percent(&self) -> u32 {
		(self.fraction() * 100.0) as u32
	}
}

/// Marks the job done when the worker exits, including by error or panic.
struct DoneGuard<'a>(&'a Progress);

impl Drop for DoneGuard<'_> {
	fn drop(&mut self) {
		self.0.finish();
	}
}

/// Handle to a running job producing `T`.
///
/// `join` consumes the handle, so a worker is joined at most once. Dropping
/// an unfinished job cancels it and waits for the worker to stop.
pub struct Job<T: Send + 'static> {
	name: String,
	progress: Arc<Progress>,
	handle: Option<JoinHandle<Result<T>>>,
}

impl<T: Send + 'static> Job<T> {
	pub fn spawn<F>(name: &str, work: F) -> Result<Self>
	where
		F: FnOnce(&Progress) -> Result<T> + Send + 'static,
	{
		Self::spawn_with(name, Arc::new(Progress::new()), work)
	}

	/// Spawn with a caller-supplied progress handle
	pub fn spawn_with<F>(name: &str, progress: Arc<Progress>, work: F) -> Result<Self>
	where
		F: FnOnce(&Progress) -> Result<T> + Send + 'static,
	{
		let worker_progress = Arc::clone(&progress);
		let handle = thread::Builder::new()
			.name(format!("bkfind-{}", name))
			.spawn(move || {
				let _done = DoneGuard(&worker_progress);
				work(&worker_progress)
			})
			.with_context(|| format!("Failed to start {} worker", name))?;

		crate::ui::debug(&format!("Started {} job", name));
		Ok(Self {
			name: name.to_string(),
			progress,
			handle: Some(handle),
		})
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn progress(&self) -> &Arc<Progress> {
		&self.progress
	}

	pub fn snapshot(&self) -> ProgressSnapshot {
		self.progress.snapshot()
	}

	pub fn is_done(&self) -> bool {
		self.progress.is_done()
	}

	/// Ask the worker to stop at its next check
	pub fn cancel(&self) {
		self.progress.cancel();
	}

	/// Wait for the worker and take its result
	pub fn join(mut self) -> Result<T> {
		let handle = self
			.handle
			.take()
			.with_context(|| format!("{} job has no worker", self.name))?;
		match handle.join() {
			Ok(result) => result.with_context(|| format!("{} job failed", self.name)),
			Err(_) => anyhow::bail!("{} worker panicked", self.name),
		}
	}

	/// Poll until done, calling `tick` with each snapshot, then join
	pub fn wait(self, mut tick: impl FnMut(ProgressSnapshot)) -> Result<T> {
		loop {
			let snapshot = self.snapshot();
			tick(snapshot);
			if snapshot.done {
				break;
			}
			thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
		}
		self.join()
	}
}

impl<T: Send + 'static> Drop for Job<T> {
	fn drop(&mut self) {
		if let Some(handle) = self.handle.take() {
			if !self.progress.is_done() {
				crate::ui::debug(&format!("Cancelling unfinished {} job", self.name));
				self.progress.cancel();
			}
			let _ = handle.join();
		}
	}
}
