//! Command-line schema.

use std::path::PathBuf;

use angen_diagnostics::Verbosity;
use clap::{ArgAction, Parser};

use crate::targets::TargetParams;

#[derive(Parser, Debug, Clone)]
#[command(name = "angen")]
#[command(about = "Generate headers and documentation includes from the ANARI API registry")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Target to generate (e.g. anari_core.h, apiinc). Nothing is generated if omitted.
	pub target: Option<String>,

	/// Directory generated files are written to
	#[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
	pub directory: PathBuf,

	/// API registry to load
	#[arg(long, value_name = "PATH", default_value = "an.toml")]
	pub registry: PathBuf,

	/// Core API feature name(s) to include; space-separated lists are split
	#[arg(long = "feature", value_name = "NAMES", action = ArgAction::Append)]
	pub features: Vec<String>,

	/// Extension name(s) to add; space-separated lists are split
	#[arg(long = "extension", value_name = "NAMES", action = ArgAction::Append)]
	pub extensions: Vec<String>,

	/// Extension to remove from targets
	#[arg(long, alias = "removeExtensions", value_name = "NAME", action = ArgAction::Append)]
	pub remove_extensions: Vec<String>,

	/// Extension to emit in targets
	#[arg(long, alias = "emitExtensions", value_name = "NAME", action = ArgAction::Append)]
	pub emit_extensions: Vec<String>,

	/// Class of extensions added to targets by default; empty disables
	#[arg(long, alias = "defaultExtensions", value_name = "CLASS", default_value = "anari")]
	pub default_extensions: String,

	/// Disable inclusion protection in output headers
	#[arg(long)]
	pub noprotect: bool,

	/// Validate enum groups after loading
	#[arg(long)]
	pub validate: bool,

	/// Dump the loaded registry to regdump.txt in the output directory
	#[arg(long)]
	pub dump: bool,

	/// Report CPU time spent in each phase
	#[arg(long)]
	pub time: bool,

	/// Profile the generation pass and print the most expensive call sites
	#[arg(long, conflicts_with = "debug")]
	pub profile: bool,

	/// Stop at `angen_debug_break` before loading and generating
	#[arg(long)]
	pub debug: bool,

	/// Write diagnostics to this file
	#[arg(long, value_name = "PATH")]
	pub diagfile: Option<PathBuf>,

	/// Write errors and warnings to this file instead of stderr
	#[arg(long, value_name = "PATH")]
	pub errfile: Option<PathBuf>,

	/// Suppress progress output (default)
	#[arg(long, overrides_with = "verbose")]
	pub quiet: bool,

	/// Report progress while building targets
	#[arg(long, overrides_with = "quiet")]
	pub verbose: bool,
}

impl Cli {
	/// Progress output is off unless `--verbose` was the last of the pair.
	pub fn is_quiet(&self) -> bool {
		!self.verbose
	}

	pub fn verbosity(&self) -> Verbosity {
		if self.debug {
			Verbosity::Trace
		} else if self.verbose {
			Verbosity::Verbose
		} else {
			Verbosity::Quiet
		}
	}

	/// Feature names with space-separated lists flattened.
	pub fn feature_names(&self) -> Vec<String> {
		split_names(&self.features)
	}

	/// Extension names with space-separated lists flattened.
	pub fn extension_names(&self) -> Vec<String> {
		split_names(&self.extensions)
	}

	/// The default extension class, or `None` when given as empty.
	pub fn default_extension_class(&self) -> Option<String> {
		let class = self.default_extensions.trim();
		(!class.is_empty()).then(|| class.to_string())
	}

	pub fn target_params(&self) -> TargetParams {
		TargetParams {
			default_extensions: self.default_extension_class(),
			add_extensions: self.extension_names(),
			remove_extensions: self.remove_extensions.clone(),
			emit_extensions: self.emit_extensions.clone(),
			features: self.feature_names(),
			protect: !self.noprotect,
			directory: self.directory.clone(),
		}
	}
}

/// Splits every value on whitespace and flattens the result.
pub fn split_names(values: &[String]) -> Vec<String> {
	values.iter().flat_map(|v| v.split_whitespace()).map(str::to_string).collect()
}
