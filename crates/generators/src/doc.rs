//! Documentation include fragments, one file per emitted element.

use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use angen_surface::{
	Catalog, CommandDef, EnumGroup, GenResult, GeneratorOptions, OutputGenerator, TypeCategory, TypeDef,
};

use crate::{output, render};

/// Writes `api/<kind>/<name>.txt` listings for the documentation build.
pub struct DocGenerator {
	diagnostics: Arc<Diagnostics>,
	options: GeneratorOptions,
	written: usize,
}

impl DocGenerator {
	pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
		Self {
			diagnostics,
			options: GeneratorOptions::default(),
			written: 0,
		}
	}

	fn write_listing(&mut self, dir: &str, name: &str, decl: &str, extra: &str) -> GenResult<()> {
		let relative = format!("api/{dir}/{name}.txt");
		self.diagnostics.diag(format_args!("Generating include file {relative}"));
		let body = format!("[source,c]\n----\n{decl}\n----\n{extra}");
		output::write_include(&self.options, &relative, &body)?;
		self.written += 1;
		Ok(())
	}
}

fn type_dir(category: TypeCategory) -> Option<&'static str> {
	Some(match category {
		TypeCategory::Struct | TypeCategory::Union => "structs",
		TypeCategory::Handle => "handles",
		TypeCategory::Funcpointer => "funcpointers",
		TypeCategory::Basetype => "basetypes",
		TypeCategory::Define => "defines",
		TypeCategory::Include | TypeCategory::Enum => return None,
	})
}

impl OutputGenerator for DocGenerator {
	fn begin_file(&mut self, options: &GeneratorOptions) -> GenResult<()> {
		self.options = options.clone();
		self.written = 0;
		Ok(())
	}

	fn end_file(&mut self) -> GenResult<()> {
		output::write_marker(&self.options, self.written)
	}

	fn gen_type(&mut self, ty: &TypeDef, _catalog: &Catalog) -> GenResult<()> {
		let (Some(dir), Some(decl)) = (type_dir(ty.category), render::type_decl(ty)) else {
			return Ok(());
		};
		self.write_listing(dir, &ty.name, &decl, "")
	}

	fn gen_group(&mut self, group: &EnumGroup) -> GenResult<()> {
		let decl = render::group_decl(group, false);
		let extra = if self.options.expand_enumerants {
			let mut table = String::from("\nEnumerants:\n\n");
			for value in &group.values {
				table.push_str(&format!("* `{}` = {}\n", value.name, value.value));
			}
			table
		} else {
			String::new()
		};
		self.write_listing("enums", &group.name, &decl, &extra)
	}

	fn gen_cmd(&mut self, cmd: &CommandDef, _catalog: &Catalog) -> GenResult<()> {
		let decl = render::prototype(cmd, &self.options);
		self.write_listing("protos", &cmd.name, &decl, "")
	}
}
