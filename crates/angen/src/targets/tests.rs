use angen_selector::SelectorError;
use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn names(list: &[&str]) -> Vec<String> {
	list.iter().map(|s| s.to_string()).collect()
}

fn table(params: &TargetParams) -> TargetTable {
	TargetTable::build(params).expect("table builds")
}

fn options<'t>(table: &'t TargetTable, key: &str) -> &'t GeneratorOptions {
	&table.get(key).unwrap_or_else(|| panic!("target {key} exists")).options
}

fn selectors(opts: &GeneratorOptions) -> [&Selector; 5] {
	[
		&opts.versions,
		&opts.emit_versions,
		&opts.add_extensions,
		&opts.remove_extensions,
		&opts.emit_extensions,
	]
}

#[test]
fn table_holds_every_target_in_order() {
	let t = table(&TargetParams::default());
	assert_eq!(
		t.keys().collect::<Vec<_>>(),
		["apiinc", "anapi.py", "validinc", "extinc", "anari_core.h"]
	);
	assert_eq!(t.len(), 5);
	assert!(t.get("doesNotExist").is_none());
}

#[rstest]
#[case("apiinc", GeneratorKind::Doc, "timeMarker")]
#[case("anapi.py", GeneratorKind::Py, "anapi.py")]
#[case("validinc", GeneratorKind::Validity, "timeMarker")]
#[case("extinc", GeneratorKind::ExtensionMetaDoc, "timeMarker")]
#[case("anari_core.h", GeneratorKind::CHeader, "anari_core.h")]
fn targets_bind_kind_and_file(#[case] key: &str, #[case] kind: GeneratorKind, #[case] filename: &str) {
	let params = TargetParams {
		directory: PathBuf::from("out"),
		..Default::default()
	};
	let t = table(&params);
	let target = t.get(key).expect("target exists");
	assert_eq!(target.kind, kind);
	assert_eq!(target.options.filename, filename);
	assert_eq!(target.options.apiname, API_NAME);
	assert_eq!(target.options.directory, PathBuf::from("out"));
	assert_eq!(target.options.profile, None);
}

#[test]
fn scenario_explicit_lists() {
	let params = TargetParams {
		features: names(&["core1", "core2"]),
		add_extensions: names(&["ext_a"]),
		remove_extensions: names(&["ext_b"]),
		..Default::default()
	};
	let t = table(&params);

	for key in ["apiinc", "anapi.py", "validinc"] {
		let opts = options(&t, key);
		assert!(opts.versions.matches("core1"));
		assert!(opts.versions.matches("core2"));
		assert!(!opts.versions.matches("core3"));
		assert!(!opts.versions.matches("core"));
		assert!(opts.add_extensions.matches("ext_a"));
		assert!(!opts.add_extensions.matches("ext_b"));
		assert!(opts.remove_extensions.matches("ext_b"));
		assert!(!opts.remove_extensions.matches("ext_bb"));
	}

	let header = options(&t, "anari_core.h");
	assert!(header.versions.matches("core2"));
	assert!(header.remove_extensions.matches("ext_b"));
	assert!(!header.remove_extensions.matches("ext_bb"));
}

#[test]
fn header_does_not_take_added_extensions() {
	let params = TargetParams {
		add_extensions: names(&["ext_a"]),
		..Default::default()
	};
	let t = table(&params);

	let header = options(&t, "anari_core.h");
	assert!(header.add_extensions.is_never());
	assert!(!header.add_extensions.matches("ext_a"));
	assert!(options(&t, "apiinc").add_extensions.matches("ext_a"));
}

#[test]
fn scenario_empty_lists() {
	let t = table(&TargetParams::default());
	for key in t.keys() {
		let opts = options(&t, key);
		assert!(opts.add_extensions.is_never(), "{key}");
		assert!(opts.remove_extensions.is_never(), "{key}");
		assert!(opts.versions.matches("ANARI_CORE_API_1_0"), "{key}");
		assert!(opts.emit_extensions.matches("ANARI_KHR_anything"), "{key}");
	}
}

#[test]
fn header_compiles_removals_as_patterns() {
	let params = TargetParams {
		remove_extensions: names(&["ANARI_EXT_.*"]),
		..Default::default()
	};
	let t = table(&params);

	let header = options(&t, "anari_core.h");
	assert!(header.remove_extensions.matches("ANARI_EXT_foo"));
	assert!(!header.remove_extensions.matches("ANARI_KHR_foo"));

	let doc = options(&t, "apiinc");
	assert!(!doc.remove_extensions.matches("ANARI_EXT_foo"));
	assert!(doc.remove_extensions.matches("ANARI_EXT_.*"));
}

#[test]
fn invalid_removal_pattern_names_the_parameter() {
	let params = TargetParams {
		remove_extensions: names(&["ANARI_KHR_ok", "ANARI_(broken"]),
		..Default::default()
	};
	match TargetTable::build(&params) {
		Err(ConfigError::Selector {
			parameter,
			source: SelectorError::InvalidPattern { fragment, .. },
		}) => {
			assert_eq!(parameter, "remove-extensions");
			assert_eq!(fragment, "ANARI_(broken");
		}
		other => panic!("expected a selector error, got {other:?}"),
	}
}

#[test]
fn doc_family_ignores_the_default_class() {
	let t = table(&TargetParams::default());
	for key in ["apiinc", "anapi.py", "validinc"] {
		assert_eq!(options(&t, key).default_extensions, None, "{key}");
	}
	assert_eq!(options(&t, "extinc").default_extensions.as_deref(), Some("anari"));
	assert_eq!(options(&t, "anari_core.h").default_extensions.as_deref(), Some("anari"));
}

#[test]
fn extension_metadata_emits_only_extensions() {
	let params = TargetParams {
		add_extensions: names(&["ext_a"]),
		remove_extensions: names(&["ext_b"]),
		..Default::default()
	};
	let t = table(&params);
	let opts = options(&t, "extinc");
	assert!(opts.emit_versions.is_never());
	assert!(opts.add_extensions.is_never());
	assert!(opts.remove_extensions.is_never());
	assert!(opts.versions.matches("ANARI_CORE_API_1_0"));
}

#[test]
fn header_carries_banner_and_format_knobs() {
	let t = table(&TargetParams::default());
	let header = options(&t, "anari_core.h");

	assert_eq!(header.prefix_text.first().map(String::as_str), Some("/*"));
	assert!(
		header
			.prefix_text
			.iter()
			.any(|l| l == "** This header is generated from the Khronos ANARI XML API Registry.")
	);
	assert!(header.protect_file);
	assert!(!header.protect_feature);
	assert!(header.gen_func_pointers);
	assert!(header.gen_enum_begin_end_range);
	assert!(header.add_extensions.is_never());
	assert_eq!(header.protect_proto.as_deref(), Some("#ifndef"));
	assert_eq!(header.protect_proto_str.as_deref(), Some(NO_PROTOTYPES));
	assert_eq!(header.apicall, "ANAPI_ATTR ");
	assert_eq!(header.apientry, "ANAPI_CALL ");
	assert_eq!(header.apientryp, "ANAPI_PTR *");
	assert_eq!(header.align_func_param, 48);

	let apiinc = options(&t, "apiinc");
	assert_eq!(apiinc.prefix_text, header.prefix_text);
	assert_eq!(apiinc.apientryp, "*");
	assert!(!apiinc.expand_enumerants);
	assert!(options(&t, "validinc").prefix_text.is_empty());
}

#[test]
fn noprotect_only_affects_the_header_guard() {
	let params = TargetParams {
		protect: false,
		..Default::default()
	};
	assert!(!options(&table(&params), "anari_core.h").protect_file);
}

fn name_list() -> impl Strategy<Value = Vec<String>> {
	prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,12}", 0..4)
}

proptest! {
	#[test]
	fn building_twice_selects_the_same_names(
		features in name_list(),
		add in name_list(),
		remove in name_list(),
		emit in name_list(),
		probes in prop::collection::vec("[A-Za-z0-9_]{0,12}", 0..8),
	) {
		let params = TargetParams {
			features: features.clone(),
			add_extensions: add.clone(),
			remove_extensions: remove.clone(),
			emit_extensions: emit.clone(),
			..Default::default()
		};
		let first = table(&params);
		let second = table(&params);

		let candidates: Vec<&String> = features.iter().chain(&add).chain(&remove).chain(&emit).chain(&probes).collect();
		for key in first.keys() {
			let (a, b) = (options(&first, key), options(&second, key));
			for (x, y) in selectors(a).into_iter().zip(selectors(b)) {
				for name in &candidates {
					prop_assert_eq!(x.matches(name), y.matches(name), "{} {}", key, name);
				}
			}
		}
	}
}
