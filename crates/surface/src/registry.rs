//! The loaded surface and its [`ApiSurface`] implementation.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use indexmap::IndexMap;

use crate::error::{GenerateError, Result, SurfaceError};
use crate::generator::{ApiSurface, Catalog, GenResult, GenSummary, OutputGenerator};
use crate::model::{ElementKind, Feature, FeatureKind, SurfaceFile};
use crate::options::GeneratorOptions;
use crate::{pass, validate};

/// A parsed surface description.
pub struct Registry {
	pub(crate) catalog: Catalog,
	pub(crate) features: IndexMap<String, Feature>,
	pub(crate) extensions: IndexMap<String, Feature>,
	pub(crate) diagnostics: Arc<Diagnostics>,
	generator: Option<Box<dyn OutputGenerator>>,
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("types", &self.catalog.types.len())
			.field("groups", &self.catalog.groups.len())
			.field("commands", &self.catalog.commands.len())
			.field("features", &self.features.len())
			.field("extensions", &self.extensions.len())
			.field("has_generator", &self.generator.is_some())
			.finish()
	}
}

impl Registry {
	/// Reads and parses the description at `path`.
	pub fn load(path: impl AsRef<Path>, diagnostics: Arc<Diagnostics>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| SurfaceError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse_named(&text, &path.display().to_string(), diagnostics)
	}

	/// Parses a description held in memory.
	pub fn parse(text: &str, diagnostics: Arc<Diagnostics>) -> Result<Self> {
		Self::parse_named(text, "<string>", diagnostics)
	}

	fn parse_named(text: &str, origin: &str, diagnostics: Arc<Diagnostics>) -> Result<Self> {
		let file: SurfaceFile = toml::from_str(text).map_err(|error| SurfaceError::Parse {
			origin: origin.to_string(),
			error,
		})?;
		let registry = Self::from_file(file, diagnostics)?;
		tracing::debug!(origin, ?registry, "surface loaded");
		Ok(registry)
	}

	/// Indexes an already deserialized document.
	pub fn from_file(file: SurfaceFile, diagnostics: Arc<Diagnostics>) -> Result<Self> {
		let types = index_by_name(file.types, ElementKind::Type, |t| &t.name)?;
		let groups = index_by_name(file.enums, ElementKind::Enum, |g| &g.name)?;
		let commands = index_by_name(file.commands, ElementKind::Command, |c| &c.name)?;

		let features = file.features.into_iter().map(|mut f| {
			f.kind = FeatureKind::Version;
			f
		});
		let extensions = file.extensions.into_iter().map(|mut f| {
			f.kind = FeatureKind::Extension;
			f
		});

		Ok(Self {
			catalog: Catalog {
				types,
				groups,
				commands,
			},
			features: index_by_name(features, ElementKind::Feature, |f| &f.name)?,
			extensions: index_by_name(extensions, ElementKind::Extension, |f| &f.name)?,
			diagnostics,
			generator: None,
		})
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	/// Core versions in declaration order.
	pub fn features(&self) -> impl Iterator<Item = &Feature> {
		self.features.values()
	}

	/// Extensions in declaration order.
	pub fn extensions(&self) -> impl Iterator<Item = &Feature> {
		self.extensions.values()
	}

	/// Returns the registry's own copy of `name` if it exists in `kind`.
	pub(crate) fn resolve(&self, kind: ElementKind, name: &str) -> Option<&str> {
		let key = match kind {
			ElementKind::Type => self.catalog.types.get_key_value(name)?.0,
			ElementKind::Enum => self.catalog.groups.get_key_value(name)?.0,
			ElementKind::Command => self.catalog.commands.get_key_value(name)?.0,
			ElementKind::Feature => self.features.get_key_value(name)?.0,
			ElementKind::Extension => self.extensions.get_key_value(name)?.0,
		};
		Some(key.as_str())
	}

	/// Known elements `name` refers to and that must be declared before it.
	pub(crate) fn dependencies(&self, kind: ElementKind, name: &str) -> Vec<(ElementKind, &str)> {
		let mut deps = Vec::new();
		match kind {
			ElementKind::Type => {
				if let Some(ty) = self.catalog.types.get(name) {
					if let Some(req) = ty.requires.as_deref() {
						self.param_deps(&mut deps, req, None);
					}
					for member in &ty.members {
						self.param_deps(&mut deps, &member.ty, member.group.as_deref());
					}
				}
			}
			ElementKind::Command => {
				if let Some(cmd) = self.catalog.commands.get(name) {
					self.param_deps(&mut deps, &cmd.return_type, None);
					for param in &cmd.params {
						self.param_deps(&mut deps, &param.ty, param.group.as_deref());
					}
				}
			}
			ElementKind::Enum | ElementKind::Feature | ElementKind::Extension => {}
		}

		deps.retain(|&(k, n)| !(k == kind && n == name));
		deps
	}

	fn param_deps<'a>(&'a self, deps: &mut Vec<(ElementKind, &'a str)>, ty: &str, group: Option<&str>) {
		if let Some(ty) = self.resolve(ElementKind::Type, ty) {
			deps.push((ElementKind::Type, ty));
		}
		if let Some(group) = group.and_then(|g| self.resolve(ElementKind::Enum, g)) {
			deps.push((ElementKind::Enum, group));
		}
	}
}

impl ApiSurface for Registry {
	fn validate_groups(&self) -> usize {
		validate::validate_groups(self)
	}

	fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
		validate::dump(self, out)
	}

	fn set_generator(&mut self, generator: Box<dyn OutputGenerator>) {
		self.generator = Some(generator);
	}

	fn api_gen(&mut self, options: &GeneratorOptions) -> GenResult<GenSummary> {
		let span = tracing::info_span!("api_gen", file = %options.filename);
		let _guard = span.enter();

		let mut generator = self.generator.take().ok_or(GenerateError::NoGenerator)?;
		let result = pass::run(self, generator.as_mut(), options);
		self.generator = Some(generator);
		result
	}
}

fn index_by_name<T>(
	items: impl IntoIterator<Item = T>,
	kind: ElementKind,
	name: impl Fn(&T) -> &String,
) -> Result<IndexMap<String, T>> {
	let mut map = IndexMap::new();
	for item in items {
		let key = name(&item).clone();
		if map.contains_key(&key) {
			return Err(SurfaceError::Duplicate { kind, name: key });
		}
		map.insert(key, item);
	}
	Ok(map)
}
