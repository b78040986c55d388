//! The fixed table of generation targets.
//!
//! Every target is built from the same four compiled selectors:
//!
//! | selector | from | empty means |
//! |---|---|---|
//! | add | `--extension` | nothing |
//! | remove | `--remove-extensions` | nothing |
//! | emit | `--emit-extensions` | everything |
//! | features | `--feature` | everything |
//!
//! The documentation targets treat removal entries as exact names. The C
//! header applies exclusions at a finer grain and compiles the same entries
//! as raw regular expressions instead.

use std::path::PathBuf;

use angen_generators::GeneratorKind;
use angen_selector::{Selector, compile};
use angen_surface::GeneratorOptions;
use indexmap::IndexMap;

use crate::error::ConfigError;

/// API namespace every target generates for.
pub const API_NAME: &str = "anari";

/// Symbol that suppresses prototypes in the C header.
pub const NO_PROTOTYPES: &str = "AN_NO_PROTOTYPES";

const COPYRIGHT: &[&str] = &[
	"/*",
	"** Copyright (c) 2015-2020 The Khronos Group Inc.",
	"**",
	"** Licensed under the Apache License, Version 2.0 (the \"License\");",
	"** you may not use this file except in compliance with the License.",
	"** You may obtain a copy of the License at",
	"**",
	"**     http://www.apache.org/licenses/LICENSE-2.0",
	"**",
	"** Unless required by applicable law or agreed to in writing, software",
	"** distributed under the License is distributed on an \"AS IS\" BASIS,",
	"** WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.",
	"** See the License for the specific language governing permissions and",
	"** limitations under the License.",
	"*/",
	"",
];

const ANARI_BANNER: &[&str] = &[
	"/*",
	"** This header is generated from the Khronos ANARI XML API Registry.",
	"**",
	"*/",
	"",
];

/// Invocation parameters the table is built from.
#[derive(Debug, Clone)]
pub struct TargetParams {
	/// Extension class included by default, if any.
	pub default_extensions: Option<String>,
	pub add_extensions: Vec<String>,
	pub remove_extensions: Vec<String>,
	pub emit_extensions: Vec<String>,
	pub features: Vec<String>,
	/// Wrap headers in re-inclusion guards.
	pub protect: bool,
	pub directory: PathBuf,
}

impl Default for TargetParams {
	fn default() -> Self {
		Self {
			default_extensions: Some(API_NAME.to_string()),
			add_extensions: Vec::new(),
			remove_extensions: Vec::new(),
			emit_extensions: Vec::new(),
			features: Vec::new(),
			protect: true,
			directory: PathBuf::from("."),
		}
	}
}

/// One generation task: which generator to run and with what options.
#[derive(Debug, Clone)]
pub struct Target {
	pub kind: GeneratorKind,
	pub options: GeneratorOptions,
}

/// Target key to configuration, in a fixed order.
#[derive(Debug, Clone)]
pub struct TargetTable {
	targets: IndexMap<&'static str, Target>,
}

struct Compiled {
	add: Selector,
	remove: Selector,
	remove_regex: Selector,
	emit: Selector,
	features: Selector,
}

fn compile_param(
	parameter: &'static str,
	names: &[String],
	default: Option<Selector>,
	names_are_regex: bool,
) -> Result<Selector, ConfigError> {
	compile(names, default, names_are_regex).map_err(|source| ConfigError::Selector { parameter, source })
}

fn prefix(parts: &[&[&str]]) -> Vec<String> {
	parts.iter().flat_map(|p| p.iter()).map(|line| line.to_string()).collect()
}

impl TargetTable {
	/// Compiles the selectors in `params` and builds every target.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Selector`] when a removal entry is not a valid
	/// regular expression for the C header target.
	pub fn build(params: &TargetParams) -> Result<Self, ConfigError> {
		let sel = Compiled {
			add: compile_param("extension", &params.add_extensions, None, false)?,
			remove: compile_param("remove-extensions", &params.remove_extensions, None, false)?,
			remove_regex: compile_param("remove-extensions", &params.remove_extensions, None, true)?,
			emit: compile_param("emit-extensions", &params.emit_extensions, Some(Selector::Any), false)?,
			features: compile_param("feature", &params.features, Some(Selector::Any), false)?,
		};

		let mut targets = IndexMap::new();
		targets.insert(
			"apiinc",
			Target {
				kind: GeneratorKind::Doc,
				options: GeneratorOptions {
					prefix_text: prefix(&[COPYRIGHT, ANARI_BANNER]),
					apicall: String::new(),
					apientry: String::new(),
					apientryp: "*".to_string(),
					align_func_param: 48,
					expand_enumerants: false,
					..doc_options("timeMarker", params, &sel)
				},
			},
		);
		targets.insert(
			"anapi.py",
			Target {
				kind: GeneratorKind::Py,
				options: doc_options("anapi.py", params, &sel),
			},
		);
		targets.insert(
			"validinc",
			Target {
				kind: GeneratorKind::Validity,
				options: doc_options("timeMarker", params, &sel),
			},
		);
		targets.insert(
			"extinc",
			Target {
				kind: GeneratorKind::ExtensionMetaDoc,
				options: GeneratorOptions {
					emit_versions: Selector::Never,
					default_extensions: params.default_extensions.clone(),
					add_extensions: Selector::Never,
					remove_extensions: Selector::Never,
					..doc_options("timeMarker", params, &sel)
				},
			},
		);
		targets.insert(
			"anari_core.h",
			Target {
				kind: GeneratorKind::CHeader,
				options: GeneratorOptions {
					default_extensions: params.default_extensions.clone(),
					add_extensions: Selector::Never,
					remove_extensions: sel.remove_regex.clone(),
					prefix_text: prefix(&[COPYRIGHT, ANARI_BANNER]),
					gen_func_pointers: true,
					protect_file: params.protect,
					protect_feature: false,
					protect_proto: Some("#ifndef".to_string()),
					protect_proto_str: Some(NO_PROTOTYPES.to_string()),
					apicall: "ANAPI_ATTR ".to_string(),
					apientry: "ANAPI_CALL ".to_string(),
					apientryp: "ANAPI_PTR *".to_string(),
					align_func_param: 48,
					gen_enum_begin_end_range: true,
					..doc_options("anari_core.h", params, &sel)
				},
			},
		);

		tracing::debug!(targets = targets.len(), "target table built");
		Ok(Self { targets })
	}

	pub fn get(&self, key: &str) -> Option<&Target> {
		self.targets.get(key)
	}

	/// Target keys in table order.
	pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.targets.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.targets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}
}

/// Options shared by the documentation family: every selected feature is
/// emitted and no extension class is pulled in by default.
fn doc_options(filename: &str, params: &TargetParams, sel: &Compiled) -> GeneratorOptions {
	GeneratorOptions {
		filename: filename.to_string(),
		directory: params.directory.clone(),
		apiname: API_NAME.to_string(),
		profile: None,
		versions: sel.features.clone(),
		emit_versions: sel.features.clone(),
		default_extensions: None,
		add_extensions: sel.add.clone(),
		remove_extensions: sel.remove.clone(),
		emit_extensions: sel.emit.clone(),
		..Default::default()
	}
}

#[cfg(test)]
mod tests;
