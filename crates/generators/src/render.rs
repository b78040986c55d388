//! C declarations shared by the header and documentation generators.

use angen_surface::{CommandDef, EnumGroup, GeneratorOptions, GroupKind, Param, TypeCategory, TypeDef};
use heck::ToShoutySnakeCase;

/// Value of the sentinel forcing 32-bit enum storage.
pub(crate) const MAX_ENUM: &str = "0x7FFFFFFF";

/// Declaration of a type, or `None` when the type has nothing to declare.
///
/// Enum-category types are declared by their group.
pub(crate) fn type_decl(ty: &TypeDef) -> Option<String> {
	let keyword = match ty.category {
		TypeCategory::Struct => "struct",
		TypeCategory::Union => "union",
		TypeCategory::Enum => return None,
		_ => return ty.decl.clone(),
	};
	let mut out = format!("typedef {keyword} {} {{\n", ty.name);
	for member in &ty.members {
		out.push_str(&format!("    {} {};\n", member.c_type(), member.name));
	}
	out.push_str(&format!("}} {};", ty.name));
	Some(out)
}

/// Declaration of an enum group.
///
/// Enum groups always end with a `_MAX_ENUM` sentinel; `ranges` adds the
/// `_BEGIN_RANGE`, `_END_RANGE` and `_RANGE_SIZE` sentinels before it.
/// Constant groups become one `#define` per value.
pub(crate) fn group_decl(group: &EnumGroup, ranges: bool) -> String {
	if group.kind == GroupKind::Constants {
		return group
			.values
			.iter()
			.map(|v| format!("#define {} {}", v.name, v.value))
			.collect::<Vec<_>>()
			.join("\n");
	}

	let prefix = enum_prefix(&group.name);
	let mut lines: Vec<String> = group.values.iter().map(|v| format!("    {} = {}", v.name, v.value)).collect();

	let bounds = group.values.iter().map(|v| v.value);
	if ranges && let (Some(begin), Some(end)) = (bounds.clone().min(), bounds.max()) {
		lines.push(format!("    {prefix}_BEGIN_RANGE = {begin}"));
		lines.push(format!("    {prefix}_END_RANGE = {end}"));
		lines.push(format!("    {prefix}_RANGE_SIZE = ({end} - {begin} + 1)"));
	}
	lines.push(format!("    {prefix}_MAX_ENUM = {MAX_ENUM}"));

	format!("typedef enum {name} {{\n{}\n}} {name};", lines.join(",\n"), name = group.name)
}

/// Upper snake case prefix for an enum's sentinels.
///
/// `ANARIDataType` becomes `ANARI_DATA_TYPE`.
pub(crate) fn enum_prefix(name: &str) -> String {
	name.to_shouty_snake_case()
}

/// Multi-line prototype with parameter names aligned to
/// [`GeneratorOptions::align_func_param`].
pub(crate) fn prototype(cmd: &CommandDef, options: &GeneratorOptions) -> String {
	let head = format!(
		"{}{} {}{}(",
		options.apicall, cmd.return_type, options.apientry, cmd.name
	);
	if cmd.params.is_empty() {
		return format!("{head}void);");
	}
	let params: Vec<String> = cmd.params.iter().map(|p| aligned_param(p, options.align_func_param)).collect();
	format!("{head}\n{});", params.join(",\n"))
}

fn aligned_param(param: &Param, align: usize) -> String {
	let lead = format!("    {}", param.c_type());
	let width = align.max(lead.len() + 1);
	format!("{lead:<width$}{}", param.name)
}

/// Function pointer typedef named `PFN_<command>`.
pub(crate) fn func_pointer(cmd: &CommandDef, options: &GeneratorOptions) -> String {
	let params = if cmd.params.is_empty() {
		"void".to_string()
	} else {
		cmd.params
			.iter()
			.map(|p| format!("{} {}", p.c_type(), p.name))
			.collect::<Vec<_>>()
			.join(", ")
	};
	format!(
		"typedef {} ({}PFN_{})({params});",
		cmd.return_type, options.apientryp, cmd.name
	)
}
