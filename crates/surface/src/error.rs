//! Error types for loading the API surface and running a generation pass.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::ElementKind;

/// Errors that can occur while loading a surface description.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// The description file could not be read.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The description is not valid TOML or does not fit the schema.
	#[error("parse error in {origin}: {error}")]
	Parse {
		/// File path, or `<string>` for in-memory input.
		origin: String,
		/// The underlying TOML error.
		error: toml::de::Error,
	},

	/// Two definitions share a name.
	#[error("duplicate {kind} '{name}'")]
	Duplicate {
		/// Which dictionary the clash is in.
		kind: ElementKind,
		/// The repeated name.
		name: String,
	},
}

/// Errors raised during a generation pass.
#[derive(Debug, Error)]
pub enum GenerateError {
	/// [`ApiSurface::api_gen`](crate::ApiSurface::api_gen) ran before a
	/// generator was attached.
	#[error("no output generator attached")]
	NoGenerator,

	/// An exact name in an options selector is not in the surface.
	#[error("options.{field} names '{name}', which is not defined in the registry")]
	UnresolvedName {
		/// Options field the name came from.
		field: &'static str,
		/// The missing name.
		name: String,
	},

	/// A feature or extension requires an element that is not defined.
	#[error("{feature} requires unknown {kind} '{name}'")]
	UnknownElement {
		/// Requiring feature or extension.
		feature: String,
		/// Dictionary searched.
		kind: ElementKind,
		/// The missing element.
		name: String,
	},

	/// An output file could not be written.
	#[error("cannot write {path}: {error}")]
	Io {
		/// Path of the output file.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The generator found the resolved input inconsistent.
	#[error("{0}")]
	Invalid(String),
}

impl GenerateError {
	/// Wraps an I/O error with the path it occurred on.
	pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			error,
		}
	}
}

/// Result type for surface loading.
pub type Result<T> = std::result::Result<T, SurfaceError>;
