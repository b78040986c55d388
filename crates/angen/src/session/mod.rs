//! Runs one target against a loaded API surface.

use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use angen_surface::{ApiSurface, GenSummary, GenerateError};
use thiserror::Error;

use crate::targets::TargetTable;

/// Switches affecting a single session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionFlags {
	/// Report the CPU time of the pass.
	pub time: bool,
}

/// How a session ended without failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The pass ran and the generator wrote its artifacts.
	Generated { target: String, summary: GenSummary },
	/// No target has this key; nothing was generated.
	UnknownTarget(String),
}

/// A generation pass failed.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error("generating {target}: {source}")]
	Generate {
		target: String,
		#[source]
		source: GenerateError,
	},
}

/// Resolves `key` in `table` and runs exactly one generation pass for it.
///
/// An unknown key is reported once on the error sink and returned as
/// [`Outcome::UnknownTarget`]; the surface is left untouched. Progress
/// lines are written unless the diagnostics are quiet.
///
/// # Errors
///
/// Any failure of the surface or generator during the pass, wrapped with
/// the target key.
pub fn run(
	key: &str,
	table: &TargetTable,
	surface: &mut dyn ApiSurface,
	diagnostics: &Arc<Diagnostics>,
	flags: &SessionFlags,
) -> Result<Outcome, SessionError> {
	let Some(target) = table.get(key) else {
		diagnostics.write(format_args!("No generator options for unknown target: {key}"));
		tracing::debug!(key, "unknown target");
		return Ok(Outcome::UnknownTarget(key.to_string()));
	};

	let options = &target.options;
	let span = tracing::info_span!("generate_target", key, kind = %target.kind);
	let _guard = span.enter();

	diagnostics.status(format_args!("* Building {}", options.filename));
	diagnostics.status(format_args!("* options.versions          = {}", options.versions));
	diagnostics.status(format_args!("* options.emitversions      = {}", options.emit_versions));
	diagnostics.status(format_args!(
		"* options.defaultExtensions = {}",
		options.default_extensions.as_deref().unwrap_or("None")
	));
	diagnostics.status(format_args!("* options.addExtensions     = {}", options.add_extensions));
	diagnostics.status(format_args!("* options.removeExtensions  = {}", options.remove_extensions));
	diagnostics.status(format_args!("* options.emitExtensions    = {}", options.emit_extensions));

	diagnostics.start_timer(flags.time);
	surface.set_generator(angen_generators::create(target.kind, Arc::clone(diagnostics)));
	let summary = surface.api_gen(options).map_err(|source| SessionError::Generate {
		target: key.to_string(),
		source,
	})?;

	diagnostics.status(format_args!("* Generated {}", options.filename));
	diagnostics.end_timer(flags.time, &format!("* Time to generate {} =", options.filename));
	tracing::info!(features = summary.features.len(), emitted = summary.emitted, "target generated");

	Ok(Outcome::Generated {
		target: key.to_string(),
		summary,
	})
}
