//! Implicit valid-usage fragments for commands and structures.

use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use angen_surface::{Catalog, CommandDef, GenResult, GeneratorOptions, OutputGenerator, Param, TypeCategory, TypeDef};

use crate::output;

pub struct ValidityGenerator {
	diagnostics: Arc<Diagnostics>,
	options: GeneratorOptions,
	written: usize,
}

impl ValidityGenerator {
	pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
		Self {
			diagnostics,
			options: GeneratorOptions::default(),
			written: 0,
		}
	}

	fn write_rules(&mut self, dir: &str, name: &str, params: &[Param], catalog: &Catalog) -> GenResult<()> {
		let rules: Vec<String> = params.iter().filter_map(|p| rule(p, catalog)).collect();
		if rules.is_empty() {
			return Ok(());
		}

		let relative = format!("validity/{dir}/{name}.txt");
		self.diagnostics.diag(format_args!("Generating include file {relative}"));
		let mut body = String::from(".Valid Usage (Implicit)\n****\n");
		for rule in rules {
			body.push_str(&format!("* {rule}\n"));
		}
		body.push_str("****\n");
		output::write_include(&self.options, &relative, &body)?;
		self.written += 1;
		Ok(())
	}
}

/// The implicit rule for one parameter, if its type implies one.
fn rule(param: &Param, catalog: &Catalog) -> Option<String> {
	let name = &param.name;
	let ty = &param.ty;
	let text = if param.pointer > 0 {
		if param.is_const && ty == "char" && param.pointer == 1 {
			format!("`{name}` must be a null-terminated UTF-8 string")
		} else {
			format!("`{name}` must be a valid pointer to a `{ty}` value")
		}
	} else if let Some(group) = &param.group {
		format!("`{name}` must be a valid `{group}` value")
	} else if catalog.type_category(ty) == Some(TypeCategory::Handle) {
		format!("`{name}` must be a valid `{ty}` handle")
	} else {
		return None;
	};

	Some(if param.optional {
		format!("If `{name}` is not `NULL`, {text}")
	} else {
		text
	})
}

impl OutputGenerator for ValidityGenerator {
	fn begin_file(&mut self, options: &GeneratorOptions) -> GenResult<()> {
		self.options = options.clone();
		self.written = 0;
		Ok(())
	}

	fn end_file(&mut self) -> GenResult<()> {
		output::write_marker(&self.options, self.written)
	}

	fn gen_type(&mut self, ty: &TypeDef, catalog: &Catalog) -> GenResult<()> {
		if matches!(ty.category, TypeCategory::Struct | TypeCategory::Union) {
			self.write_rules("structs", &ty.name, &ty.members, catalog)?;
		}
		Ok(())
	}

	fn gen_cmd(&mut self, cmd: &CommandDef, catalog: &Catalog) -> GenResult<()> {
		self.write_rules("protos", &cmd.name, &cmd.params, catalog)
	}
}
