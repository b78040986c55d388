use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use angen_diagnostics::{Diagnostics, MemorySink, Sink};
use angen_selector::Selector;
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

type Events = Rc<RefCell<Vec<String>>>;

/// Records every generator call as a short line.
struct Recorder(Events);

impl Recorder {
	fn boxed() -> (Box<dyn OutputGenerator>, Events) {
		let events = Events::default();
		(Box::new(Self(events.clone())), events)
	}

	fn push(&self, line: String) {
		self.0.borrow_mut().push(line);
	}
}

impl OutputGenerator for Recorder {
	fn begin_file(&mut self, options: &GeneratorOptions) -> GenResult<()> {
		self.push(format!("begin_file {}", options.filename));
		Ok(())
	}

	fn end_file(&mut self) -> GenResult<()> {
		self.push("end_file".to_string());
		Ok(())
	}

	fn begin_feature(&mut self, feature: &Feature, emit: bool) -> GenResult<()> {
		self.push(format!("feature {} emit={emit}", feature.name));
		Ok(())
	}

	fn gen_type(&mut self, ty: &TypeDef, _catalog: &Catalog) -> GenResult<()> {
		self.push(format!("type {}", ty.name));
		Ok(())
	}

	fn gen_group(&mut self, group: &EnumGroup) -> GenResult<()> {
		self.push(format!("enum {}", group.name));
		Ok(())
	}

	fn gen_cmd(&mut self, cmd: &CommandDef, _catalog: &Catalog) -> GenResult<()> {
		self.push(format!("cmd {}", cmd.name));
		Ok(())
	}
}

fn testdata() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/an.toml")
}

fn captured() -> (Arc<Diagnostics>, MemorySink, MemorySink) {
	let errors = MemorySink::new();
	let diag = MemorySink::new();
	(Arc::new(Diagnostics::new(errors.sink(), diag.sink())), errors, diag)
}

fn sample() -> (Registry, MemorySink, MemorySink) {
	let (d, errors, diag) = captured();
	let reg = Registry::load(testdata(), d).expect("sample registry loads");
	(reg, errors, diag)
}

fn options() -> GeneratorOptions {
	GeneratorOptions {
		filename: "out.h".to_string(),
		apiname: "anari".to_string(),
		emit_extensions: Selector::Any,
		..Default::default()
	}
}

fn generate(reg: &mut Registry, options: &GeneratorOptions) -> (GenResult<GenSummary>, Vec<String>) {
	let (generator, events) = Recorder::boxed();
	reg.set_generator(generator);
	let result = reg.api_gen(options);
	let events = events.borrow().clone();
	(result, events)
}

#[test]
fn sample_loads_every_dictionary() {
	let (reg, _, _) = sample();
	assert_eq!(reg.catalog().types.len(), 9);
	assert_eq!(reg.catalog().groups.len(), 3);
	assert_eq!(reg.catalog().commands.len(), 5);
	assert_eq!(reg.features().count(), 1);
	assert!(reg.extensions().all(Feature::is_extension));
	assert!(!reg.features().any(Feature::is_extension));
}

#[rstest]
#[case::default_class(Some("anari"), Selector::Never, Selector::Never, &[
	"ANARI_CORE_API_1_0",
	"ANARI_KHR_frame_completion_callback",
	"ANARI_KHR_area_lights",
])]
#[case::no_default_class(None, Selector::Never, Selector::Never, &["ANARI_CORE_API_1_0"])]
#[case::add_requires_supported(
	None,
	Selector::literal(["ANARI_KHR_area_lights", "ANARI_EXP_volume_sampling"]),
	Selector::Never,
	&["ANARI_CORE_API_1_0", "ANARI_KHR_area_lights"],
)]
#[case::remove_wins(
	Some("anari"),
	Selector::literal(["ANARI_KHR_area_lights"]),
	Selector::literal(["ANARI_KHR_area_lights"]),
	&["ANARI_CORE_API_1_0", "ANARI_KHR_frame_completion_callback"],
)]
#[case::disabled_class(Some("disabled"), Selector::Never, Selector::Never, &[
	"ANARI_CORE_API_1_0",
	"ANARI_EXP_volume_sampling",
])]
fn extension_selection(
	#[case] default_class: Option<&str>,
	#[case] add: Selector,
	#[case] remove: Selector,
	#[case] expected: &[&str],
) {
	let (mut reg, _, _) = sample();
	let opts = GeneratorOptions {
		default_extensions: default_class.map(str::to_string),
		add_extensions: add,
		remove_extensions: remove,
		..options()
	};
	let (result, _) = generate(&mut reg, &opts);
	assert_eq!(result.expect("pass succeeds").features, expected);
}

#[test]
fn selected_but_not_emitted_writes_nothing() {
	let (mut reg, _, diag) = sample();
	let opts = GeneratorOptions {
		emit_versions: Selector::Never,
		..options()
	};
	let (result, events) = generate(&mut reg, &opts);
	let summary = result.expect("pass succeeds");

	assert_eq!(summary.features, ["ANARI_CORE_API_1_0"]);
	assert_eq!(summary.emitted, 0);
	assert_eq!(
		events,
		[
			"begin_file out.h",
			"feature ANARI_CORE_API_1_0 emit=false",
			"end_file"
		]
	);
	assert!(
		diag.lines()
			.iter()
			.any(|l| l.contains("NOT tagging feature ANARI_CORE_API_1_0"))
	);
}

#[test]
fn dependencies_are_declared_first_and_once() {
	let (mut reg, _, _) = sample();
	let opts = GeneratorOptions {
		default_extensions: Some("anari".to_string()),
		..options()
	};
	let (result, events) = generate(&mut reg, &opts);
	let summary = result.expect("pass succeeds");

	let core: Vec<&str> = events
		.iter()
		.map(String::as_str)
		.skip_while(|e| !e.starts_with("feature ANARI_CORE"))
		.skip(1)
		.take_while(|e| !e.starts_with("feature "))
		.collect();
	assert_eq!(
		core,
		[
			"type stdint",
			"type ANARILibrary",
			"type ANARIObject",
			"type ANARIDevice",
			"type ANARIFrame",
			"type ANARIDataType",
			"enum ANARIDataType",
			"type ANARIParameter",
			"enum ANARIVersion",
			"cmd anariLoadLibrary",
			"cmd anariNewDevice",
			"cmd anariRelease",
			"cmd anariRenderFrame",
			"type ANARIWaitMask",
			"enum ANARIWaitMask",
			"cmd anariFrameReady",
		]
	);

	// ANARIDevice was claimed by the core version.
	let callback = events
		.iter()
		.position(|e| e == "feature ANARI_KHR_frame_completion_callback emit=true")
		.expect("callback extension begins");
	assert_eq!(events[callback + 1], "type ANARIFrameCompletionCallback");
	assert_eq!(summary.emitted, 17);
}

#[test]
fn repeated_passes_reuse_the_generator() {
	let (mut reg, _, _) = sample();
	let (first, _) = generate(&mut reg, &options());
	let second = reg.api_gen(&options());
	assert_eq!(first.expect("first pass"), second.expect("second pass"));
}

#[test]
fn api_gen_without_generator_fails() {
	let (mut reg, _, _) = sample();
	assert!(matches!(reg.api_gen(&options()), Err(GenerateError::NoGenerator)));
}

#[rstest]
#[case::version(
	GeneratorOptions { versions: Selector::literal(["ANARI_CORE_API_9_9"]), ..options() },
	"versions",
	"ANARI_CORE_API_9_9",
)]
#[case::extension(
	GeneratorOptions { add_extensions: Selector::literal(["ANARI_KHR_missing"]), ..options() },
	"addExtensions",
	"ANARI_KHR_missing",
)]
fn unresolved_literal_names_fail(#[case] opts: GeneratorOptions, #[case] field: &str, #[case] missing: &str) {
	let (mut reg, _, _) = sample();
	let (result, events) = generate(&mut reg, &opts);
	match result {
		Err(GenerateError::UnresolvedName { field: f, name }) => {
			assert_eq!(f, field);
			assert_eq!(name, missing);
		}
		other => panic!("expected UnresolvedName, got {other:?}"),
	}
	assert!(events.is_empty());
}

#[test]
fn pattern_names_are_not_resolved() {
	let (mut reg, _, _) = sample();
	let opts = GeneratorOptions {
		versions: angen_selector::compile(&["ANARI_CORE_API_9_.*"], None, true).expect("valid pattern"),
		..options()
	};
	let (result, _) = generate(&mut reg, &opts);
	assert!(result.expect("pass succeeds").features.is_empty());
}

#[test]
fn unmatched_api_warns() {
	let (mut reg, errors, _) = sample();
	let opts = GeneratorOptions {
		apiname: "vulkan".to_string(),
		..options()
	};
	let (result, _) = generate(&mut reg, &opts);
	assert!(result.expect("pass succeeds").features.is_empty());
	assert_eq!(errors.lines(), ["WARNING: No matching API versions found for 'vulkan'"]);
}

const PROFILED: &str = r#"
[[types]]
name = "Core"
category = "handle"
decl = "typedef struct core* Core;"

[[types]]
name = "Compat"
category = "handle"
decl = "typedef struct compat* Compat;"

[[types]]
name = "Legacy"
category = "handle"
decl = "typedef struct legacy* Legacy;"

[[feature]]
name = "API_1_0"
api = "anari"
require = [
	{ types = ["Core", "Legacy"] },
	{ profile = "compat", types = ["Compat"] },
	{ api = "other", types = ["Compat"] },
]
remove = [{ profile = "core", types = ["Legacy"] }]
"#;

#[rstest]
#[case::no_profile(None, &["type Core", "type Compat"])]
#[case::core(Some("core"), &["type Core"])]
#[case::compat(Some("compat"), &["type Core", "type Legacy", "type Compat"])]
fn requirement_blocks_filter_by_profile(#[case] profile: Option<&str>, #[case] expected: &[&str]) {
	let (d, _, _) = captured();
	let mut reg = Registry::parse(PROFILED, d).expect("inline registry parses");
	let opts = GeneratorOptions {
		profile: profile.map(str::to_string),
		..options()
	};
	let (result, events) = generate(&mut reg, &opts);
	result.expect("pass succeeds");
	let generated: Vec<&str> = events.iter().map(String::as_str).filter(|e| e.starts_with("type ")).collect();
	assert_eq!(generated, expected);
}

#[test]
fn unknown_required_element_fails() {
	let (d, _, _) = captured();
	let text = r#"
[[feature]]
name = "API_1_0"
api = "anari"
require = [{ commands = ["anariMissing"] }]
"#;
	let mut reg = Registry::parse(text, d).expect("inline registry parses");
	let (result, _) = generate(&mut reg, &options());
	match result {
		Err(GenerateError::UnknownElement { feature, kind, name }) => {
			assert_eq!(feature, "API_1_0");
			assert_eq!(kind, ElementKind::Command);
			assert_eq!(name, "anariMissing");
		}
		other => panic!("expected UnknownElement, got {other:?}"),
	}
}

#[test]
fn validate_groups_reports_each_problem() {
	let (d, errors, _) = captured();
	let text = r#"
[[types]]
name = "Thing"
category = "struct"
members = [
	{ name = "a", type = "int", group = "Missing" },
	{ name = "b", type = "int", group = "Missing" },
	{ name = "c", type = "Limits", group = "Limits" },
]

[[enums]]
name = "Limits"
kind = "constants"
values = [{ name = "MAX", value = 1 }]

[[enums]]
name = "Mode"
values = [{ name = "MODE_A", value = 0 }, { name = "MODE_A", value = 1 }]
"#;
	let reg = Registry::parse(text, d).expect("inline registry parses");
	assert_eq!(reg.validate_groups(), 3);
	assert_eq!(
		errors.lines(),
		[
			"WARNING: Thing.a: unknown enum group 'Missing'",
			"WARNING: Thing.c: constants group 'Limits' used as enum type",
			"WARNING: Mode: duplicate value 'MODE_A'",
		]
	);
}

#[test]
fn sample_validates_cleanly() {
	let (reg, errors, _) = sample();
	assert_eq!(reg.validate_groups(), 0);
	assert!(errors.contents().is_empty());
}

#[test]
fn dump_lists_every_section() {
	let (reg, _, _) = sample();
	let mut out = Vec::new();
	reg.dump(&mut out).expect("dump to memory");
	let text = String::from_utf8(out).expect("utf-8 dump");

	let sections: Vec<&str> = text.lines().filter(|l| l.starts_with("// ")).collect();
	assert_eq!(
		sections,
		["// Types", "// Enum groups", "// Commands", "// Features", "// Extensions"]
	);
	assert!(text.contains("ANARIDevice anariNewDevice(ANARILibrary library, const char* type)"));
	assert!(text.contains("ANARI_EXP_volume_sampling number=3 supported=disabled"));
}

#[test]
fn duplicate_names_are_rejected() {
	let (d, _, _) = captured();
	let text = r#"
[[commands]]
name = "anariRelease"

[[commands]]
name = "anariRelease"
"#;
	match Registry::parse(text, d) {
		Err(SurfaceError::Duplicate { kind, name }) => {
			assert_eq!(kind, ElementKind::Command);
			assert_eq!(name, "anariRelease");
		}
		other => panic!("expected Duplicate, got {other:?}"),
	}
}

#[test]
fn unknown_fields_are_parse_errors() {
	let (d, _, _) = captured();
	let err = Registry::parse("[[types]]\nname = \"T\"\ncategory = \"handle\"\nsize = 4\n", d).unwrap_err();
	assert!(matches!(err, SurfaceError::Parse { ref origin, .. } if origin == "<string>"), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
	let dir = tempfile::tempdir().expect("tempdir");
	let path = dir.path().join("absent.toml");
	let err = Registry::load(&path, Arc::new(Diagnostics::new(Sink::Disabled, Sink::Disabled))).unwrap_err();
	match err {
		SurfaceError::Io { path: p, .. } => assert_eq!(p, path),
		other => panic!("expected Io, got {other:?}"),
	}
}

#[test]
fn list_contains_matches_whole_entries() {
	assert!(list_contains("anari, disabled", "disabled"));
	assert!(!list_contains("anari_ext", "anari"));
}

#[test]
fn c_type_spells_qualifiers() {
	let param = Param {
		name: "name".to_string(),
		ty: "char".to_string(),
		is_const: true,
		pointer: 2,
		group: None,
		optional: false,
	};
	assert_eq!(param.c_type(), "const char**");
}
