//! Selection-and-dispatch driver for the ANARI API registry.
//!
//! One run of [`run`] goes through a fixed, sequential pipeline:
//!
//! 1. open the error and diagnostic sinks and install logging;
//! 2. load the registry, optionally validating and dumping it;
//! 3. build the [`TargetTable`] from the selection arguments;
//! 4. resolve the requested target, if any, and run one generation pass.
//!
//! Timing, profiling and debugger stepping wrap the load and generate
//! phases when requested.

pub mod cli;
pub mod error;
pub mod session;
pub mod targets;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use angen_diagnostics::{DEFAULT_TOP, Diagnostics, Profiler, debug, init_tracing};
use angen_surface::{ApiSurface, Registry};

pub use cli::Cli;
pub use error::{ConfigError, Result, RunError};
pub use session::{Outcome, SessionError, SessionFlags};
pub use targets::{Target, TargetParams, TargetTable};

/// Name of the registry dump written by `--dump`.
pub const DUMP_FILE: &str = "regdump.txt";

/// Runs the whole pipeline for `cli`.
///
/// Returns `None` when no target was requested. Errors are written to the
/// error sink before being returned, unless the sink itself failed to open
/// (see [`RunError::is_reported`]).
pub fn run(cli: &Cli) -> Result<Option<Outcome>> {
	let diagnostics = Arc::new(
		Diagnostics::from_paths(cli.errfile.as_deref(), cli.diagfile.as_deref())?.with_quiet(cli.is_quiet()),
	);

	let profiler = cli.profile.then(Profiler::new);
	if let Err(e) = init_tracing(cli.verbosity(), profiler.as_ref()) {
		// Embedders and test harnesses may own the global subscriber.
		tracing::debug!(error = %e, "keeping existing subscriber");
	}

	let result = pipeline(cli, &diagnostics, profiler.as_ref());
	if let Err(e) = &result {
		diagnostics.error(e);
	}
	if let Err(e) = diagnostics.flush() {
		tracing::error!(error = %e, "failed to flush diagnostics");
	}
	result
}

fn pipeline(cli: &Cli, diagnostics: &Arc<Diagnostics>, profiler: Option<&Profiler>) -> Result<Option<Outcome>> {
	diagnostics.start_timer(cli.time);
	let mut registry = debug::step(cli.debug, "load", || {
		Registry::load(&cli.registry, Arc::clone(diagnostics))
	})?;
	diagnostics.end_timer(cli.time, "* Time to parse registry =");

	if cli.validate {
		let problems = registry.validate_groups();
		tracing::debug!(problems, "registry validated");
	}

	if cli.dump {
		dump(&registry, cli, diagnostics)?;
	}

	let table = TargetTable::build(&cli.target_params())?;
	let Some(key) = cli.target.as_deref() else {
		tracing::debug!("no target requested");
		return Ok(None);
	};

	if let Some(profiler) = profiler {
		profiler.clear();
	}
	let flags = SessionFlags { time: cli.time };
	let outcome = debug::step(cli.debug, "generate", || {
		session::run(key, &table, &mut registry, diagnostics, &flags)
	})?;

	if let Some(profiler) = profiler {
		report_profile(profiler, diagnostics);
	}
	Ok(Some(outcome))
}

fn dump(registry: &Registry, cli: &Cli, diagnostics: &Diagnostics) -> Result<()> {
	let path = cli.directory.join(DUMP_FILE);
	diagnostics.write(format_args!("* Dumping registry to {}", path.display()));

	let io_err = |error: std::io::Error| RunError::Io {
		path: path.clone(),
		error,
	};
	let mut out = BufWriter::new(File::create(&path).map_err(io_err)?);
	registry.dump(&mut out).map_err(io_err)?;
	out.flush().map_err(io_err)
}

fn report_profile(profiler: &Profiler, diagnostics: &Diagnostics) {
	let mut table = Vec::new();
	if let Err(e) = profiler.report().write_top(DEFAULT_TOP, &mut table) {
		tracing::error!(error = %e, "failed to format profile");
		return;
	}
	for line in String::from_utf8_lossy(&table).lines() {
		diagnostics.write(line);
	}
}
