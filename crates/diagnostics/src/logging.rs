//! Process-wide tracing subscriber setup.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::error::{DiagnosticsError, Result};
use crate::profile::Profiler;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "ANGEN_LOG";

/// How chatty the stderr log layer is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
	/// Warnings and errors only.
	#[default]
	Quiet,
	/// Progress at debug level.
	Verbose,
	/// Everything, used while stepping.
	Trace,
}

impl Verbosity {
	fn default_filter(self) -> &'static str {
		match self {
			Self::Quiet => "warn",
			Self::Verbose => "warn,angen=debug",
			Self::Trace => "info,angen=trace",
		}
	}
}

/// Installs the global subscriber.
///
/// The stderr layer honours [`LOG_ENV`] and falls back to a filter derived
/// from `verbosity`. When a profiler is given its layer is installed
/// unfiltered so it sees every span regardless of the log level.
pub fn init_tracing(verbosity: Verbosity, profiler: Option<&Profiler>) -> Result<()> {
	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(verbosity.default_filter()));

	let fmt_layer = log_layer(std::io::stderr, std::io::stderr().is_terminal()).with_filter(filter);

	tracing_subscriber::registry()
		.with(fmt_layer)
		.with(profiler.map(Profiler::layer))
		.try_init()
		.map_err(|e| DiagnosticsError::Subscriber(e.to_string()))?;

	tracing::debug!(?verbosity, profiling = profiler.is_some(), "tracing initialized");
	Ok(())
}

/// Human-readable log layer; colour only when `ansi` is set.
pub(crate) fn log_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
	tracing_subscriber::fmt::layer()
		.with_writer(writer)
		.with_ansi(ansi)
		.with_target(true)
}
