//! Diagnostics, timing and profiling for angen.
//!
//! A [`Diagnostics`] session is created once per run, before anything is
//! loaded, and shared by reference with every component that reports
//! messages. It owns:
//!
//! - the **error sink** for errors, warnings and progress lines (stderr by
//!   default, or a file);
//! - the **diagnostic sink** for detailed selection traces (disabled by
//!   default, or a file);
//! - the single-slot [`PhaseTimer`].
//!
//! Developer logging goes through `tracing`; see [`init_tracing`].

pub mod debug;
mod error;
mod logging;
mod profile;
mod sink;
mod timer;

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

use parking_lot::Mutex;

pub use error::{DiagnosticsError, Result};
pub use logging::{LOG_ENV, Verbosity, init_tracing};
pub use profile::{CallSite, DEFAULT_TOP, ProfileEntry, ProfileLayer, ProfileReport, Profiler};
pub use sink::{MemorySink, Sink};
pub use timer::{PhaseTimer, process_cpu_time};

/// Message sinks and timer state for one run.
#[derive(Debug)]
pub struct Diagnostics {
	errors: Mutex<Sink>,
	diag: Mutex<Sink>,
	quiet: bool,
	timer: PhaseTimer,
}

impl Default for Diagnostics {
	fn default() -> Self {
		Self::new(Sink::Stderr, Sink::Disabled)
	}
}

impl Diagnostics {
	/// Creates a session writing errors to `errors` and diagnostics to `diag`.
	///
	/// Sessions start quiet.
	pub fn new(errors: Sink, diag: Sink) -> Self {
		Self {
			errors: Mutex::new(errors),
			diag: Mutex::new(diag),
			quiet: true,
			timer: PhaseTimer::new(),
		}
	}

	/// Opens file sinks for whichever paths are given.
	///
	/// Errors default to stderr, diagnostics default to disabled.
	pub fn from_paths(errfile: Option<&Path>, diagfile: Option<&Path>) -> Result<Self> {
		let errors = Sink::file_or(errfile, Sink::Stderr)?;
		let diag = Sink::file_or(diagfile, Sink::Disabled)?;
		Ok(Self::new(errors, diag))
	}

	/// Sets whether progress lines are suppressed.
	pub fn with_quiet(mut self, quiet: bool) -> Self {
		self.quiet = quiet;
		self
	}

	pub fn quiet(&self) -> bool {
		self.quiet
	}

	pub fn timer(&self) -> &PhaseTimer {
		&self.timer
	}

	/// Returns true if diagnostic messages go anywhere.
	pub fn diag_enabled(&self) -> bool {
		self.diag.lock().is_enabled()
	}

	/// Writes a raw line to the error sink.
	pub fn write(&self, line: impl Display) {
		emit(&self.errors, &line.to_string());
	}

	/// Writes a progress line to the error sink unless quiet.
	pub fn status(&self, line: impl Display) {
		if !self.quiet {
			self.write(line);
		}
	}

	pub fn error(&self, msg: impl Display) {
		emit(&self.errors, &format!("ERROR: {msg}"));
	}

	pub fn warn(&self, msg: impl Display) {
		emit(&self.errors, &format!("WARNING: {msg}"));
	}

	/// Writes a detailed trace line to the diagnostic sink.
	pub fn diag(&self, msg: impl Display) {
		let mut sink = self.diag.lock();
		if sink.is_enabled()
			&& let Err(e) = sink.write_line(&format!("DIAG: {msg}"))
		{
			tracing::error!(error = %e, "failed to write diagnostic sink");
		}
	}

	/// Starts timing a phase when `enabled`.
	///
	/// See [`PhaseTimer`] for the non-nesting rule.
	pub fn start_timer(&self, enabled: bool) {
		self.timer.start(enabled);
	}

	/// Stops the current phase and reports `label <seconds>` to the error sink.
	///
	/// Nothing is written and `None` is returned when disabled or when no
	/// phase was started.
	pub fn end_timer(&self, enabled: bool, label: &str) -> Option<Duration> {
		let elapsed = self.timer.take_elapsed(enabled)?;
		self.write(format_args!("{label} {:.6}", elapsed.as_secs_f64()));
		Some(elapsed)
	}

	/// Flushes both sinks.
	pub fn flush(&self) -> std::io::Result<()> {
		self.errors.lock().flush()?;
		self.diag.lock().flush()
	}
}

fn emit(sink: &Mutex<Sink>, line: &str) {
	if let Err(e) = sink.lock().write_line(line) {
		tracing::error!(error = %e, "failed to write error sink");
	}
}
