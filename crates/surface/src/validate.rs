//! Consistency checks and the plain-text dump.

use std::collections::HashSet;
use std::io::{self, Write};

use crate::model::{EnumGroup, GroupKind, Param};
use crate::registry::Registry;

pub(crate) fn validate_groups(reg: &Registry) -> usize {
	let diag = &reg.diagnostics;
	let catalog = &reg.catalog;
	let mut problems = 0;
	let mut missing = HashSet::new();

	let members = catalog
		.types
		.values()
		.flat_map(|t| t.members.iter().map(move |m| (t.name.as_str(), m)));
	let params = catalog
		.commands
		.values()
		.flat_map(|c| c.params.iter().map(move |p| (c.name.as_str(), p)));

	for (owner, param) in members.chain(params) {
		let Some(group) = param.group.as_deref() else {
			continue;
		};
		match catalog.groups.get(group) {
			None => {
				if missing.insert(group) {
					diag.warn(format_args!("{owner}.{}: unknown enum group '{group}'", param.name));
					problems += 1;
				}
			}
			Some(g) if g.kind == GroupKind::Constants && is_enum_typed(param, g) => {
				diag.warn(format_args!(
					"{owner}.{}: constants group '{group}' used as enum type",
					param.name
				));
				problems += 1;
			}
			Some(_) => {}
		}
	}

	for group in catalog.groups.values() {
		let mut seen = HashSet::new();
		for value in &group.values {
			if !seen.insert(value.name.as_str()) {
				diag.warn(format_args!("{}: duplicate value '{}'", group.name, value.name));
				problems += 1;
			}
		}
	}

	tracing::debug!(problems, "enum groups validated");
	problems
}

fn is_enum_typed(param: &Param, group: &EnumGroup) -> bool {
	param.ty == group.name
}

pub(crate) fn dump(reg: &Registry, out: &mut dyn Write) -> io::Result<()> {
	let catalog = &reg.catalog;

	writeln!(out, "// Types")?;
	for ty in catalog.types.values() {
		writeln!(out, "{} ({})", ty.name, ty.category)?;
		for member in &ty.members {
			writeln!(out, "    {} {}", member.c_type(), member.name)?;
		}
	}

	writeln!(out, "// Enum groups")?;
	for group in catalog.groups.values() {
		writeln!(out, "{} ({} values)", group.name, group.values.len())?;
		for value in &group.values {
			writeln!(out, "    {} = {}", value.name, value.value)?;
		}
	}

	writeln!(out, "// Commands")?;
	for cmd in catalog.commands.values() {
		let params: Vec<String> = cmd.params.iter().map(|p| format!("{} {}", p.c_type(), p.name)).collect();
		writeln!(out, "{} {}({})", cmd.return_type, cmd.name, params.join(", "))?;
	}

	writeln!(out, "// Features")?;
	for feature in reg.features.values() {
		writeln!(
			out,
			"{} api={} version={}",
			feature.name,
			feature.api.as_deref().unwrap_or("-"),
			feature.version.as_deref().unwrap_or("-")
		)?;
	}

	writeln!(out, "// Extensions")?;
	for ext in reg.extensions.values() {
		writeln!(
			out,
			"{} number={} supported={}",
			ext.name,
			ext.number.map_or_else(|| "-".to_string(), |n| n.to_string()),
			ext.supported.as_deref().unwrap_or("-")
		)?;
	}

	Ok(())
}
