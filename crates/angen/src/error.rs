//! Error types for the angen pipeline.

use std::path::PathBuf;

use angen_diagnostics::DiagnosticsError;
use angen_selector::SelectorError;
use angen_surface::SurfaceError;
use thiserror::Error;

use crate::session::SessionError;

/// Exit status for configuration errors.
pub const EXIT_CONFIG: u8 = 2;
/// Exit status when the requested target does not exist.
pub const EXIT_UNKNOWN_TARGET: u8 = 3;
/// Exit status for every other failure.
pub const EXIT_FATAL: u8 = 1;

/// Errors building the target table.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// A selector entry did not compile.
	#[error("invalid --{parameter} entry: {source}")]
	Selector {
		/// Original parameter name the entry came from.
		parameter: &'static str,
		#[source]
		source: SelectorError,
	},
}

/// Everything that can end a run early.
#[derive(Debug, Error)]
pub enum RunError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// Error or diagnostic sink could not be opened.
	#[error(transparent)]
	Diagnostics(#[from] DiagnosticsError),

	#[error(transparent)]
	Surface(#[from] SurfaceError),

	#[error(transparent)]
	Session(#[from] SessionError),

	/// The registry dump could not be written.
	#[error("cannot write {path}: {error}")]
	Io {
		path: PathBuf,
		error: std::io::Error,
	},
}

impl RunError {
	pub fn exit_code(&self) -> u8 {
		match self {
			Self::Config(_) => EXIT_CONFIG,
			_ => EXIT_FATAL,
		}
	}

	/// Returns false when the error sink itself could not be opened, so the
	/// error has not been reported anywhere yet.
	pub fn is_reported(&self) -> bool {
		!matches!(self, Self::Diagnostics(_))
	}
}

pub type Result<T> = std::result::Result<T, RunError>;
