//! Output generators for angen.
//!
//! Each [`GeneratorKind`] names one renderer; [`create`] builds it bound to
//! the run's [`Diagnostics`]. Generators receive the selected surface
//! through [`OutputGenerator`] callbacks and own all file output.
//!
//! | kind | writes |
//! |---|---|
//! | [`CHeader`](GeneratorKind::CHeader) | one C header |
//! | [`Doc`](GeneratorKind::Doc) | `api/<kind>/<name>.txt` listings, then a marker file |
//! | [`Validity`](GeneratorKind::Validity) | `validity/<kind>/<name>.txt` rules, then a marker file |
//! | [`ExtensionMetaDoc`](GeneratorKind::ExtensionMetaDoc) | `meta/<extension>.txt` and an appendix index |
//! | [`Py`](GeneratorKind::Py) | a Python module of name maps |

mod c_header;
mod doc;
mod extension_meta;
mod output;
mod py;
mod render;
mod validity;

use std::sync::Arc;

use angen_diagnostics::Diagnostics;
use angen_surface::OutputGenerator;
use strum::{Display, EnumString};

pub use c_header::CHeaderGenerator;
pub use doc::DocGenerator;
pub use extension_meta::ExtensionMetaGenerator;
pub use py::PyGenerator;
pub use validity::ValidityGenerator;

/// The closed set of output generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum GeneratorKind {
	CHeader,
	Doc,
	Py,
	Validity,
	ExtensionMetaDoc,
}

/// Builds the generator for `kind`, reporting through `diagnostics`.
pub fn create(kind: GeneratorKind, diagnostics: Arc<Diagnostics>) -> Box<dyn OutputGenerator> {
	tracing::debug!(%kind, "creating output generator");
	match kind {
		GeneratorKind::CHeader => Box::new(CHeaderGenerator::new(diagnostics)),
		GeneratorKind::Doc => Box::new(DocGenerator::new(diagnostics)),
		GeneratorKind::Py => Box::new(PyGenerator::new(diagnostics)),
		GeneratorKind::Validity => Box::new(ValidityGenerator::new(diagnostics)),
		GeneratorKind::ExtensionMetaDoc => Box::new(ExtensionMetaGenerator::new(diagnostics)),
	}
}
