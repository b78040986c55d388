//! Single-slot phase timer measuring process CPU time.
//!
//! Phases do not nest. Starting a phase while another is running replaces
//! the recorded start, so the first phase's elapsed time is lost. Callers
//! time one phase at a time.

use std::time::Duration;

use parking_lot::Mutex;

/// Holds the start of the phase currently being timed, if any.
#[derive(Debug, Default)]
pub struct PhaseTimer {
	started: Mutex<Option<Duration>>,
}

impl PhaseTimer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the current CPU time when `enabled`.
	///
	/// Overwrites any start recorded by a previous, unfinished phase.
	pub fn start(&self, enabled: bool) {
		if enabled {
			*self.started.lock() = Some(process_cpu_time());
		}
	}

	/// Clears the slot and returns the CPU time spent since [`start`].
	///
	/// Returns `None` when disabled or when nothing was started.
	///
	/// [`start`]: PhaseTimer::start
	pub fn take_elapsed(&self, enabled: bool) -> Option<Duration> {
		if !enabled {
			return None;
		}
		let start = self.started.lock().take()?;
		Some(process_cpu_time().saturating_sub(start))
	}

	/// Returns true while a phase is being timed.
	pub fn is_running(&self) -> bool {
		self.started.lock().is_some()
	}
}

/// CPU time consumed by this process.
#[cfg(unix)]
pub fn process_cpu_time() -> Duration {
	let mut ts = libc::timespec { tv_sec: 0, tv_nsec: 0 };
	// SAFETY: `ts` is a valid, exclusively borrowed timespec for the call.
	let rc = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
	if rc != 0 {
		tracing::debug!(errno = std::io::Error::last_os_error().raw_os_error(), "clock_gettime failed");
		return Duration::ZERO;
	}
	Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
}

/// Wall time since first use; no portable CPU clock is available here.
#[cfg(not(unix))]
pub fn process_cpu_time() -> Duration {
	use std::sync::OnceLock;
	use std::time::Instant;

	static ORIGIN: OnceLock<Instant> = OnceLock::new();
	ORIGIN.get_or_init(Instant::now).elapsed()
}
