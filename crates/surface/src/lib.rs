//! The loaded API surface and the generation pass over it.
//!
//! A [`Registry`] holds every type, enum group, command, core version and
//! extension of one API, read from a TOML description. The orchestrator
//! only sees it through [`ApiSurface`]: validate, dump, attach an
//! [`OutputGenerator`] and run [`api_gen`](ApiSurface::api_gen) with a
//! set of [`GeneratorOptions`].

mod error;
mod generator;
mod model;
mod options;
mod pass;
mod registry;
mod validate;

pub use error::{GenerateError, Result, SurfaceError};
pub use generator::{ApiSurface, Catalog, GenResult, GenSummary, OutputGenerator};
pub use model::{
	CommandDef, ElementKind, EnumGroup, EnumValue, Feature, FeatureKind, GroupKind, Param, Requirement,
	SurfaceFile, TypeCategory, TypeDef, list_contains,
};
pub use options::GeneratorOptions;
pub use registry::Registry;

#[cfg(test)]
mod tests;
