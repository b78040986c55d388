//! The output generator protocol and the API surface contract.

use std::io::{self, Write};

use indexmap::IndexMap;

use crate::error::GenerateError;
use crate::model::{CommandDef, EnumGroup, Feature, TypeCategory, TypeDef};
use crate::options::GeneratorOptions;

/// Result type for generation passes.
pub type GenResult<T> = std::result::Result<T, GenerateError>;

/// Read-only view of the element dictionaries handed to generators.
#[derive(Debug, Default)]
pub struct Catalog {
	pub types: IndexMap<String, TypeDef>,
	pub groups: IndexMap<String, EnumGroup>,
	pub commands: IndexMap<String, CommandDef>,
}

impl Catalog {
	pub fn type_category(&self, name: &str) -> Option<TypeCategory> {
		self.types.get(name).map(|t| t.category)
	}
}

/// Renders a selected part of the surface into artifacts.
///
/// A pass calls [`begin_file`], then for every selected feature in order
/// [`begin_feature`], one `gen_*` call per element first declared by that
/// feature (only when the feature is emitted), and [`end_feature`]; finally
/// [`end_file`]. Writing files is entirely the generator's business.
///
/// [`begin_file`]: OutputGenerator::begin_file
/// [`begin_feature`]: OutputGenerator::begin_feature
/// [`end_feature`]: OutputGenerator::end_feature
/// [`end_file`]: OutputGenerator::end_file
pub trait OutputGenerator {
	fn begin_file(&mut self, options: &GeneratorOptions) -> GenResult<()>;

	fn end_file(&mut self) -> GenResult<()> {
		Ok(())
	}

	fn begin_feature(&mut self, _feature: &Feature, _emit: bool) -> GenResult<()> {
		Ok(())
	}

	fn end_feature(&mut self) -> GenResult<()> {
		Ok(())
	}

	fn gen_type(&mut self, _ty: &TypeDef, _catalog: &Catalog) -> GenResult<()> {
		Ok(())
	}

	fn gen_group(&mut self, _group: &EnumGroup) -> GenResult<()> {
		Ok(())
	}

	fn gen_cmd(&mut self, _cmd: &CommandDef, _catalog: &Catalog) -> GenResult<()> {
		Ok(())
	}
}

/// What one pass selected and wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenSummary {
	/// Selected core versions and extensions, in generation order.
	pub features: Vec<String>,
	/// Elements handed to the generator.
	pub emitted: usize,
}

/// The operations the orchestrator needs from a loaded API surface.
pub trait ApiSurface {
	/// Checks enum group references, reporting problems as warnings.
	///
	/// Returns the number of problems found.
	fn validate_groups(&self) -> usize;

	/// Writes a human-readable dump of every dictionary.
	fn dump(&self, out: &mut dyn Write) -> io::Result<()>;

	/// Attaches the generator used by the next [`api_gen`](Self::api_gen).
	fn set_generator(&mut self, generator: Box<dyn OutputGenerator>);

	/// Runs one generation pass with `options`.
	fn api_gen(&mut self, options: &GeneratorOptions) -> GenResult<GenSummary>;
}
