//! One generation pass: select features, mark requirements, emit.
//!
//! Selection precedence for extensions, applied in this order:
//!
//! 1. included when the default extension class is listed in `supported`;
//! 2. an `add_extensions` match includes it, unless the API name is not
//!    listed in `supported`, which excludes it;
//! 3. a `remove_extensions` match excludes it, overriding both.
//!
//! Included features are emitted when their emit selector matches. Every
//! element is declared once, by the first selected feature requiring it;
//! a feature that is included but not emitted still claims its elements.

use std::collections::{HashMap, HashSet};

use angen_selector::Selector;
use indexmap::IndexMap;

use crate::error::GenerateError;
use crate::generator::{GenResult, GenSummary, OutputGenerator};
use crate::model::{ElementKind, Feature, Requirement, list_contains};
use crate::options::GeneratorOptions;
use crate::registry::Registry;

type Key<'a> = (ElementKind, &'a str);

struct Selected<'a> {
	feature: &'a Feature,
	emit: bool,
}

pub(crate) fn run(
	reg: &Registry,
	generator: &mut dyn OutputGenerator,
	options: &GeneratorOptions,
) -> GenResult<GenSummary> {
	check_literals(reg, options)?;

	let selected = {
		let _span = tracing::debug_span!("select_features").entered();
		select_features(reg, options)
	};
	let required = {
		let _span = tracing::debug_span!("mark_required").entered();
		mark_required(reg, &selected, options)?
	};

	let _span = tracing::debug_span!("emit").entered();
	let mut pass = Emitter {
		reg,
		generator,
		required,
		declared: HashSet::new(),
		summary: GenSummary::default(),
	};
	pass.emit_all(&selected, options)?;
	tracing::debug!(features = pass.summary.features.len(), emitted = pass.summary.emitted, "pass finished");
	Ok(pass.summary)
}

/// Fails when an exact version or extension name is missing from the surface.
fn check_literals(reg: &Registry, options: &GeneratorOptions) -> GenResult<()> {
	let checks: [(&'static str, &Selector, &IndexMap<String, Feature>); 2] = [
		("versions", &options.versions, &reg.features),
		("addExtensions", &options.add_extensions, &reg.extensions),
	];
	for (field, selector, known) in checks {
		let Some(names) = selector.literals() else {
			continue;
		};
		if let Some(missing) = names.iter().find(|n| !known.contains_key(n.as_str())) {
			return Err(GenerateError::UnresolvedName {
				field,
				name: missing.clone(),
			});
		}
	}
	Ok(())
}

fn select_features<'a>(reg: &'a Registry, options: &GeneratorOptions) -> Vec<Selected<'a>> {
	let diag = &reg.diagnostics;
	let mut selected = Vec::new();
	let mut api_match = false;

	for feature in reg.features.values() {
		let name = &feature.name;
		if !feature.api.as_deref().is_some_and(|api| list_contains(api, &options.apiname)) {
			diag.diag(format_args!("NOT including feature {name} (does not match requested API)"));
			continue;
		}
		api_match = true;

		if !options.versions.matches(name) {
			diag.diag(format_args!("NOT including feature {name} (does not match requested versions)"));
			continue;
		}

		let emit = options.emit_versions.matches(name);
		if emit {
			diag.diag(format_args!("Including feature {name}"));
		} else {
			diag.diag(format_args!("NOT tagging feature {name} for emission (does not match emitversions pattern)"));
		}
		selected.push(Selected { feature, emit });
	}

	if !api_match {
		diag.warn(format_args!("No matching API versions found for '{}'", options.apiname));
	}

	let mut extensions: Vec<&Feature> = reg.extensions.values().collect();
	extensions.sort_by_key(|e| e.number.unwrap_or(0));

	for ext in extensions {
		let name = &ext.name;
		let supported = ext.supported.as_deref().unwrap_or("");
		let mut include = false;

		if let Some(class) = options.default_extensions.as_deref()
			&& list_contains(supported, class)
		{
			diag.diag(format_args!("Including extension {name} (defaultExtensions matches the 'supported' attribute)"));
			include = true;
		}

		if options.add_extensions.matches(name) {
			if list_contains(supported, &options.apiname) {
				diag.diag(format_args!("Including extension {name} (matches explicitly requested extensions to add)"));
				include = true;
			} else {
				diag.diag(format_args!(
					"NOT including extension {name} (matches explicitly requested, but does not match the 'supported' attribute)"
				));
				include = false;
			}
		}

		if options.remove_extensions.matches(name) {
			diag.diag(format_args!("Removing extension {name} (matches explicitly requested extensions to remove)"));
			include = false;
		}

		if !include {
			diag.diag(format_args!("NOT including extension {name}"));
			continue;
		}

		let emit = options.emit_extensions.matches(name);
		if !emit {
			diag.diag(format_args!("NOT tagging extension {name} for emission (does not match emitextensions pattern)"));
		}
		selected.push(Selected { feature: ext, emit });
	}

	selected
}

fn applicable<'r>(blocks: &'r [Requirement], options: &GeneratorOptions) -> impl Iterator<Item = &'r Requirement> {
	let apiname = options.apiname.clone();
	let profile = options.profile.clone();
	blocks.iter().filter(move |r| r.applies_to(&apiname, profile.as_deref()))
}

/// Tags every element required by a selected feature, with its
/// dependencies, then untags everything a later `remove` block drops.
fn mark_required<'a>(
	reg: &'a Registry,
	selected: &[Selected<'a>],
	options: &GeneratorOptions,
) -> GenResult<HashMap<Key<'a>, bool>> {
	let mut required = HashMap::new();

	for sel in selected {
		let feature = sel.feature;
		for block in applicable(&feature.require, options) {
			for (kind, name) in block.elements() {
				let name = reg.resolve(kind, name).ok_or_else(|| GenerateError::UnknownElement {
					feature: feature.name.clone(),
					kind,
					name: name.to_string(),
				})?;
				mark(reg, (kind, name), &mut required);
			}
		}

		for block in applicable(&feature.remove, options) {
			for (kind, name) in block.elements() {
				match reg.resolve(kind, name) {
					Some(name) => {
						reg.diagnostics.diag(format_args!("{} removes {kind} {name}", feature.name));
						required.insert((kind, name), false);
					}
					None => reg
						.diagnostics
						.warn(format_args!("{} removes unknown {kind} '{name}'", feature.name)),
				}
			}
		}
	}

	Ok(required)
}

fn mark<'a>(reg: &'a Registry, key: Key<'a>, required: &mut HashMap<Key<'a>, bool>) {
	if required.insert(key, true) == Some(true) {
		return;
	}
	for dep in reg.dependencies(key.0, key.1) {
		mark(reg, dep, required);
	}
}

struct Emitter<'a, 'g> {
	reg: &'a Registry,
	generator: &'g mut dyn OutputGenerator,
	required: HashMap<Key<'a>, bool>,
	declared: HashSet<Key<'a>>,
	summary: GenSummary,
}

impl<'a> Emitter<'a, '_> {
	fn emit_all(&mut self, selected: &[Selected<'a>], options: &GeneratorOptions) -> GenResult<()> {
		let reg = self.reg;
		self.generator.begin_file(options)?;

		for sel in selected {
			self.summary.features.push(sel.feature.name.clone());
			self.generator.begin_feature(sel.feature, sel.emit)?;
			for block in applicable(&sel.feature.require, options) {
				for (kind, name) in block.elements() {
					if let Some(name) = reg.resolve(kind, name) {
						self.declare((kind, name), sel.emit)?;
					}
				}
			}
			self.generator.end_feature()?;
		}

		self.generator.end_file()
	}

	/// Declares `key` after its dependencies, handing it to the generator
	/// only when the owning feature is emitted.
	fn declare(&mut self, key: Key<'a>, emit: bool) -> GenResult<()> {
		if !self.required.get(&key).copied().unwrap_or(false) || !self.declared.insert(key) {
			return Ok(());
		}

		let reg = self.reg;
		for dep in reg.dependencies(key.0, key.1) {
			self.declare(dep, emit)?;
		}

		if !emit {
			return Ok(());
		}

		let _span = tracing::trace_span!("generate_element", kind = %key.0).entered();
		let catalog = &reg.catalog;
		match key.0 {
			ElementKind::Type => self.generator.gen_type(&catalog.types[key.1], catalog)?,
			ElementKind::Enum => self.generator.gen_group(&catalog.groups[key.1])?,
			ElementKind::Command => self.generator.gen_cmd(&catalog.commands[key.1], catalog)?,
			ElementKind::Feature | ElementKind::Extension => return Ok(()),
		}
		self.summary.emitted += 1;
		Ok(())
	}
}
