//! Extension appendix metadata.

use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use angen_surface::{Feature, GenResult, GeneratorOptions, OutputGenerator};

use crate::output;

/// Writes `meta/<extension>.txt` for every emitted extension and an
/// appendix index including them in registration order.
pub struct ExtensionMetaGenerator {
	diagnostics: Arc<Diagnostics>,
	options: GeneratorOptions,
	extensions: Vec<String>,
}

impl ExtensionMetaGenerator {
	pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
		Self {
			diagnostics,
			options: GeneratorOptions::default(),
			extensions: Vec::new(),
		}
	}
}

fn metadata(ext: &Feature) -> String {
	let mut out = format!("[[{0}]]\n== {0}\n\n", ext.name);
	out.push_str(&format!("*Name String*::\n    `{}`\n", ext.name));
	if let Some(number) = ext.number {
		out.push_str(&format!("*Registered Extension Number*::\n    {number}\n"));
	}
	if let Some(revision) = ext.revision {
		out.push_str(&format!("*Revision*::\n    {revision}\n"));
	}
	if let Some(supported) = &ext.supported {
		out.push_str(&format!("*Supported*::\n    {supported}\n"));
	}
	out.push_str("*Extension and Version Dependencies*::\n");
	if ext.requires.is_empty() {
		out.push_str("    None\n");
	}
	for dep in &ext.requires {
		out.push_str(&format!("    * `{dep}`\n"));
	}
	if let Some(comment) = &ext.comment {
		out.push_str(&format!("\n{comment}\n"));
	}
	out
}

impl OutputGenerator for ExtensionMetaGenerator {
	fn begin_file(&mut self, options: &GeneratorOptions) -> GenResult<()> {
		self.options = options.clone();
		self.extensions.clear();
		Ok(())
	}

	fn end_file(&mut self) -> GenResult<()> {
		let index: String = self.extensions.iter().map(|name| format!("include::{name}.txt[]\n")).collect();
		output::write_include(&self.options, "meta/current_extensions_appendix.txt", &index)?;
		output::write_marker(&self.options, self.extensions.len() + 1)
	}

	fn begin_feature(&mut self, feature: &Feature, emit: bool) -> GenResult<()> {
		if !emit || !feature.is_extension() {
			return Ok(());
		}
		let relative = format!("meta/{}.txt", feature.name);
		self.diagnostics.diag(format_args!("Generating include file {relative}"));
		output::write_include(&self.options, &relative, &metadata(feature))?;
		self.extensions.push(feature.name.clone());
		Ok(())
	}
}
