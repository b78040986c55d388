//! Schema of the surface description.
//!
//! A description is a TOML document with five arrays of tables:
//!
//! ```toml
//! [[types]]
//! name = "ANARIDevice"
//! category = "handle"
//! decl = "typedef struct anari_device* ANARIDevice;"
//!
//! [[enums]]
//! name = "ANARIDataType"
//! values = [{ name = "ANARI_UNKNOWN", value = 0 }]
//!
//! [[commands]]
//! name = "anariNewDevice"
//! return_type = "ANARIDevice"
//! params = [{ name = "library", type = "ANARILibrary" }]
//!
//! [[feature]]
//! name = "ANARI_CORE_API_1_0"
//! api = "anari"
//! version = "1.0"
//! require = [{ types = ["ANARIDevice"], commands = ["anariNewDevice"] }]
//!
//! [[extension]]
//! name = "ANARI_KHR_frame_completion_callback"
//! number = 1
//! supported = "anari"
//! ```

use serde::{Deserialize, Serialize};

/// The dictionaries an element name can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ElementKind {
	Type,
	Enum,
	Command,
	Feature,
	Extension,
}

/// Top-level document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SurfaceFile {
	#[serde(default)]
	pub types: Vec<TypeDef>,
	#[serde(default)]
	pub enums: Vec<EnumGroup>,
	#[serde(default)]
	pub commands: Vec<CommandDef>,
	#[serde(default, rename = "feature")]
	pub features: Vec<Feature>,
	#[serde(default, rename = "extension")]
	pub extensions: Vec<Feature>,
}

/// Broad classification of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TypeCategory {
	Include,
	Define,
	Basetype,
	Handle,
	Enum,
	Struct,
	Union,
	Funcpointer,
}

/// A named type.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDef {
	pub name: String,
	pub category: TypeCategory,
	/// Verbatim C declaration, used for every category except struct/union.
	#[serde(default)]
	pub decl: Option<String>,
	/// Another type that must be declared first.
	#[serde(default)]
	pub requires: Option<String>,
	#[serde(default)]
	pub members: Vec<Param>,
	#[serde(default)]
	pub comment: Option<String>,
}

/// A struct member or command parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Param {
	pub name: String,
	#[serde(rename = "type")]
	pub ty: String,
	#[serde(default, rename = "const")]
	pub is_const: bool,
	/// Levels of pointer indirection.
	#[serde(default)]
	pub pointer: u8,
	/// Enum group the value is drawn from.
	#[serde(default)]
	pub group: Option<String>,
	#[serde(default)]
	pub optional: bool,
}

impl Param {
	/// C spelling of the parameter type, without the name.
	pub fn c_type(&self) -> String {
		let mut out = String::new();
		if self.is_const {
			out.push_str("const ");
		}
		out.push_str(&self.ty);
		for _ in 0..self.pointer {
			out.push('*');
		}
		out
	}
}

/// Whether a group renders as a C enum or as standalone constants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
	#[default]
	Enum,
	Constants,
}

/// A group of named integer values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnumGroup {
	pub name: String,
	#[serde(default)]
	pub kind: GroupKind,
	#[serde(default)]
	pub values: Vec<EnumValue>,
	#[serde(default)]
	pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnumValue {
	pub name: String,
	pub value: i64,
	#[serde(default)]
	pub comment: Option<String>,
}

fn void() -> String {
	"void".to_string()
}

/// A command prototype.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDef {
	pub name: String,
	#[serde(default = "void")]
	pub return_type: String,
	#[serde(default)]
	pub params: Vec<Param>,
	#[serde(default)]
	pub comment: Option<String>,
}

/// Whether a [`Feature`] is a core version or an extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FeatureKind {
	#[default]
	Version,
	Extension,
}

/// A core version or an extension, with the elements it requires.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
	pub name: String,
	#[serde(skip)]
	pub kind: FeatureKind,
	/// Comma-separated API names this version belongs to.
	#[serde(default)]
	pub api: Option<String>,
	/// Version string of a core version.
	#[serde(default)]
	pub version: Option<String>,
	/// Registered number of an extension; orders extensions.
	#[serde(default)]
	pub number: Option<u32>,
	/// Comma-separated extension classes an extension is supported in.
	#[serde(default)]
	pub supported: Option<String>,
	#[serde(default)]
	pub revision: Option<u32>,
	/// Other features or extensions this one depends on.
	#[serde(default)]
	pub requires: Vec<String>,
	#[serde(default)]
	pub require: Vec<Requirement>,
	#[serde(default)]
	pub remove: Vec<Requirement>,
	#[serde(default)]
	pub comment: Option<String>,
}

impl Feature {
	pub fn is_extension(&self) -> bool {
		self.kind == FeatureKind::Extension
	}
}

/// One `require` or `remove` block.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Requirement {
	/// Applies only when generating for this profile.
	#[serde(default)]
	pub profile: Option<String>,
	/// Applies only when generating for one of these comma-separated APIs.
	#[serde(default)]
	pub api: Option<String>,
	#[serde(default)]
	pub comment: Option<String>,
	#[serde(default)]
	pub types: Vec<String>,
	#[serde(default)]
	pub enums: Vec<String>,
	#[serde(default)]
	pub commands: Vec<String>,
}

impl Requirement {
	/// Returns true if the block applies to `apiname` and `profile`.
	///
	/// Unset attributes on either side match everything.
	pub fn applies_to(&self, apiname: &str, profile: Option<&str>) -> bool {
		let api_ok = self.api.as_deref().is_none_or(|api| list_contains(api, apiname));
		let profile_ok = match (self.profile.as_deref(), profile) {
			(Some(want), Some(have)) => want == have,
			_ => true,
		};
		api_ok && profile_ok
	}

	/// Element names in declaration order, tagged with their dictionary.
	pub fn elements(&self) -> impl Iterator<Item = (ElementKind, &str)> {
		let types = self.types.iter().map(|n| (ElementKind::Type, n.as_str()));
		let enums = self.enums.iter().map(|n| (ElementKind::Enum, n.as_str()));
		let commands = self.commands.iter().map(|n| (ElementKind::Command, n.as_str()));
		types.chain(enums).chain(commands)
	}
}

/// Returns true if the comma-separated `list` contains `name` exactly.
pub fn list_contains(list: &str, name: &str) -> bool {
	list.split(',').any(|entry| entry.trim() == name)
}
