//! Python module mapping API names to their definitions.

use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use angen_surface::{
	Catalog, CommandDef, EnumGroup, Feature, GenResult, GeneratorOptions, GroupKind, OutputGenerator, TypeCategory,
	TypeDef,
};
use indexmap::IndexMap;

use crate::output;

/// Collects emitted elements and writes them as Python dictionaries.
pub struct PyGenerator {
	diagnostics: Arc<Diagnostics>,
	options: GeneratorOptions,
	feature: Option<String>,
	required_by: IndexMap<String, String>,
	handles: Vec<String>,
	structs: IndexMap<String, Vec<String>>,
	enums: IndexMap<String, Vec<String>>,
	enum_values: IndexMap<String, i64>,
	commands: IndexMap<String, (String, Vec<String>)>,
}

impl PyGenerator {
	pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
		Self {
			diagnostics,
			options: GeneratorOptions::default(),
			feature: None,
			required_by: IndexMap::new(),
			handles: Vec::new(),
			structs: IndexMap::new(),
			enums: IndexMap::new(),
			enum_values: IndexMap::new(),
			commands: IndexMap::new(),
		}
	}

	fn claim(&mut self, name: &str) {
		if let Some(feature) = &self.feature {
			self.required_by.insert(name.to_string(), feature.clone());
		}
	}

	fn render(&self) -> String {
		let mut out = String::from("# Generated from the API registry. Do not edit.\n\n");

		out.push_str("requiredBy = {\n");
		for (name, feature) in &self.required_by {
			out.push_str(&format!("    '{name}': '{feature}',\n"));
		}
		out.push_str("}\n\nhandles = [\n");
		for name in &self.handles {
			out.push_str(&format!("    '{name}',\n"));
		}
		out.push_str("]\n\nstructs = {\n");
		for (name, members) in &self.structs {
			out.push_str(&format!("    '{name}': {},\n", py_list(members)));
		}
		out.push_str("}\n\nenums = {\n");
		for (name, values) in &self.enums {
			out.push_str(&format!("    '{name}': {},\n", py_list(values)));
		}
		out.push_str("}\n\nenumValues = {\n");
		for (name, value) in &self.enum_values {
			out.push_str(&format!("    '{name}': {value},\n"));
		}
		out.push_str("}\n\ncommands = {\n");
		for (name, (ret, params)) in &self.commands {
			out.push_str(&format!("    '{name}': ('{ret}', {}),\n", py_list(params)));
		}
		out.push_str("}\n");
		out
	}
}

fn py_list(items: &[String]) -> String {
	let quoted: Vec<String> = items.iter().map(|i| format!("'{i}'")).collect();
	format!("[{}]", quoted.join(", "))
}

impl OutputGenerator for PyGenerator {
	fn begin_file(&mut self, options: &GeneratorOptions) -> GenResult<()> {
		*self = Self::new(Arc::clone(&self.diagnostics));
		self.options = options.clone();
		Ok(())
	}

	fn end_file(&mut self) -> GenResult<()> {
		self.diagnostics.diag(format_args!(
			"Writing {} names to {}",
			self.required_by.len(),
			self.options.filename
		));
		output::write_file(&self.options.output_path(), &self.render())
	}

	fn begin_feature(&mut self, feature: &Feature, emit: bool) -> GenResult<()> {
		self.feature = emit.then(|| feature.name.clone());
		Ok(())
	}

	fn end_feature(&mut self) -> GenResult<()> {
		self.feature = None;
		Ok(())
	}

	fn gen_type(&mut self, ty: &TypeDef, _catalog: &Catalog) -> GenResult<()> {
		self.claim(&ty.name);
		match ty.category {
			TypeCategory::Handle => self.handles.push(ty.name.clone()),
			TypeCategory::Struct | TypeCategory::Union => {
				let members = ty.members.iter().map(|m| m.name.clone()).collect();
				self.structs.insert(ty.name.clone(), members);
			}
			_ => {}
		}
		Ok(())
	}

	fn gen_group(&mut self, group: &EnumGroup) -> GenResult<()> {
		self.claim(&group.name);
		for value in &group.values {
			self.enum_values.insert(value.name.clone(), value.value);
		}
		if group.kind == GroupKind::Enum {
			let names = group.values.iter().map(|v| v.name.clone()).collect();
			self.enums.insert(group.name.clone(), names);
		}
		Ok(())
	}

	fn gen_cmd(&mut self, cmd: &CommandDef, _catalog: &Catalog) -> GenResult<()> {
		self.claim(&cmd.name);
		let params = cmd.params.iter().map(|p| p.name.clone()).collect();
		self.commands.insert(cmd.name.clone(), (cmd.return_type.clone(), params));
		Ok(())
	}
}
