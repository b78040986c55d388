//! Single-file C header generator.

use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use angen_surface::{
	Catalog, CommandDef, EnumGroup, Feature, GenResult, GeneratorOptions, OutputGenerator, TypeCategory, TypeDef,
};
use heck::ToShoutySnakeCase;

use crate::{output, render};

/// Declarations of one emitted feature, grouped the way the header lays
/// them out.
#[derive(Debug, Default)]
struct Section {
	name: String,
	types: Vec<String>,
	enums: Vec<String>,
	func_pointers: Vec<String>,
	prototypes: Vec<String>,
}

/// Renders the selected surface into one C header.
///
/// The file is assembled in memory and written by `end_file`.
pub struct CHeaderGenerator {
	diagnostics: Arc<Diagnostics>,
	options: GeneratorOptions,
	out: String,
	section: Option<Section>,
}

impl CHeaderGenerator {
	pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
		Self {
			diagnostics,
			options: GeneratorOptions::default(),
			out: String::new(),
			section: None,
		}
	}

	fn include_guard(&self) -> String {
		format!("{}_", self.options.filename.to_shouty_snake_case())
	}

	fn flush_section(&mut self, section: Section) {
		let opts = &self.options;
		let out = &mut self.out;

		out.push('\n');
		if opts.protect_feature {
			out.push_str(&format!("#ifndef {}\n", section.name));
		}
		out.push_str(&format!("#define {} 1\n", section.name));

		for block in [&section.types, &section.enums, &section.func_pointers] {
			for decl in block {
				out.push_str(decl);
				out.push('\n');
			}
			if !block.is_empty() {
				out.push('\n');
			}
		}

		if !section.prototypes.is_empty() {
			let guard = opts.protect_proto.as_deref().zip(opts.protect_proto_str.as_deref());
			if let Some((directive, symbol)) = guard {
				out.push_str(&format!("{directive} {symbol}\n"));
			}
			for proto in &section.prototypes {
				out.push_str(proto);
				out.push_str("\n\n");
			}
			if guard.is_some() {
				out.push_str("#endif\n");
			}
		}

		if opts.protect_feature {
			out.push_str(&format!("#endif /* {} */\n", section.name));
		}
	}
}

impl OutputGenerator for CHeaderGenerator {
	fn begin_file(&mut self, options: &GeneratorOptions) -> GenResult<()> {
		self.options = options.clone();
		self.out = output::prefix(options);
		self.section = None;

		if options.protect_file {
			let guard = self.include_guard();
			self.out.push_str(&format!("#ifndef {guard}\n#define {guard} 1\n\n"));
		}
		self.out.push_str("#ifdef __cplusplus\nextern \"C\" {\n#endif\n");
		Ok(())
	}

	fn end_file(&mut self) -> GenResult<()> {
		self.out.push_str("\n#ifdef __cplusplus\n}\n#endif\n");
		if self.options.protect_file {
			self.out.push_str(&format!("\n#endif /* {} */\n", self.include_guard()));
		}
		output::write_file(&self.options.output_path(), &self.out)
	}

	fn begin_feature(&mut self, feature: &Feature, emit: bool) -> GenResult<()> {
		self.section = emit.then(|| Section {
			name: feature.name.clone(),
			..Default::default()
		});
		Ok(())
	}

	fn end_feature(&mut self) -> GenResult<()> {
		if let Some(section) = self.section.take() {
			self.flush_section(section);
		}
		Ok(())
	}

	fn gen_type(&mut self, ty: &TypeDef, _catalog: &Catalog) -> GenResult<()> {
		let Some(section) = self.section.as_mut() else {
			return Ok(());
		};
		match render::type_decl(ty) {
			Some(decl) => section.types.push(decl),
			None if ty.category != TypeCategory::Enum => {
				self.diagnostics.warn(format_args!("type {} has no declaration", ty.name));
			}
			None => {}
		}
		Ok(())
	}

	fn gen_group(&mut self, group: &EnumGroup) -> GenResult<()> {
		if let Some(section) = self.section.as_mut() {
			section.enums.push(render::group_decl(group, self.options.gen_enum_begin_end_range));
		}
		Ok(())
	}

	fn gen_cmd(&mut self, cmd: &CommandDef, _catalog: &Catalog) -> GenResult<()> {
		let Some(section) = self.section.as_mut() else {
			return Ok(());
		};
		if self.options.gen_func_pointers {
			section.func_pointers.push(render::func_pointer(cmd, &self.options));
		}
		section.prototypes.push(render::prototype(cmd, &self.options));
		Ok(())
	}
}
