//! Error types for setting up diagnostics.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening sinks or installing logging.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
	/// A sink file could not be created.
	#[error("cannot open {path}: {error}")]
	Open {
		/// Path of the sink file.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A global tracing subscriber was already installed.
	#[error("failed to install tracing subscriber: {0}")]
	Subscriber(String),
}

/// Result type for diagnostics setup.
pub type Result<T> = std::result::Result<T, DiagnosticsError>;
