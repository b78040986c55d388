//! Resolved options for one generation pass.

use std::path::{Path, PathBuf};

use angen_selector::Selector;

/// Everything a generation pass needs to know about one target.
///
/// Built once per target and never mutated afterwards. Fields not relevant
/// to a generator are ignored by it.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
	/// Output file name, relative to [`directory`](Self::directory).
	pub filename: String,
	pub directory: PathBuf,
	/// API namespace features are matched against.
	pub apiname: String,
	/// Profile requirement blocks are filtered by, if any.
	pub profile: Option<String>,
	/// Core versions to include.
	pub versions: Selector,
	/// Included core versions whose interfaces are written out.
	pub emit_versions: Selector,
	/// Extension class included by default, matched against `supported`.
	pub default_extensions: Option<String>,
	/// Extensions to include regardless of class.
	pub add_extensions: Selector,
	/// Extensions to exclude; wins over every inclusion rule.
	pub remove_extensions: Selector,
	/// Included extensions whose interfaces are written out.
	pub emit_extensions: Selector,
	/// Lines written at the very top of every output file.
	pub prefix_text: Vec<String>,
	pub apicall: String,
	pub apientry: String,
	pub apientryp: String,
	/// Column parameter names are aligned to in prototypes; 0 disables.
	pub align_func_param: usize,
	/// Wrap the file in an include guard.
	pub protect_file: bool,
	/// Wrap each feature in `#ifdef FEATURE`.
	pub protect_feature: bool,
	/// Preprocessor directive guarding prototypes, e.g. `#ifndef`.
	pub protect_proto: Option<String>,
	/// Symbol tested by [`protect_proto`](Self::protect_proto).
	pub protect_proto_str: Option<String>,
	/// Emit `PFN_` typedefs for commands.
	pub gen_func_pointers: bool,
	/// Emit `_BEGIN_RANGE`/`_END_RANGE`/`_RANGE_SIZE` sentinels in enums.
	pub gen_enum_begin_end_range: bool,
	/// List every enumerant with its value in documentation includes.
	pub expand_enumerants: bool,
}

impl Default for GeneratorOptions {
	fn default() -> Self {
		Self {
			filename: String::new(),
			directory: PathBuf::from("."),
			apiname: String::new(),
			profile: None,
			versions: Selector::Any,
			emit_versions: Selector::Any,
			default_extensions: None,
			add_extensions: Selector::Never,
			remove_extensions: Selector::Never,
			emit_extensions: Selector::Never,
			prefix_text: Vec::new(),
			apicall: String::new(),
			apientry: String::new(),
			apientryp: String::new(),
			align_func_param: 0,
			protect_file: false,
			protect_feature: true,
			protect_proto: None,
			protect_proto_str: None,
			gen_func_pointers: false,
			gen_enum_begin_end_range: false,
			expand_enumerants: true,
		}
	}
}

impl GeneratorOptions {
	/// Full path of the primary output file.
	pub fn output_path(&self) -> PathBuf {
		self.directory.join(&self.filename)
	}

	/// Path of a secondary output file under the output directory.
	pub fn output_child(&self, relative: impl AsRef<Path>) -> PathBuf {
		self.directory.join(relative)
	}
}
