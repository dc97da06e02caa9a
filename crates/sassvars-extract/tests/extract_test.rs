//! Integration tests for variable extraction from on-disk stylesheets.
//!
//! Covers:
//! - Mixed-dialect import graphs (`.scss` importing `.sass`)
//! - Partial resolution and `!default` values computed by the compiler
//! - Case conversion between stylesheet and output names
//! - Caching across calls and across path spellings
//! - Error surfaces for broken stylesheets

use sassvars_extract::{
    CaseStyle, ExtractOptions, Extractor, ImportRequest, NamedImport, SassVarsError, VarMap,
    discover_names,
};
use sassvars_system_runtime::NativeRuntime;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-fixtures")
        .join(name)
}

fn var_map(pairs: &[(&str, &str)]) -> VarMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_scss_importing_sass() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let vars = extractor.extract_all(&fixture("testScss.scss")).unwrap();

    assert_eq!(
        vars,
        &var_map(&[("mapvar", "(abc: 123)"), ("sassvar", "42"), ("scssvar", "69")])
    );
}

#[test]
fn test_sass_entry_point() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let vars = extractor.extract_all(&fixture("testSass.sass")).unwrap();

    assert_eq!(vars, &var_map(&[("sassvar", "42")]));
}

#[test]
fn test_named_extraction_from_scss() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let vars = extractor
        .extract_named(&fixture("testScss.scss"), &["scssvar", "sassvar"])
        .unwrap();

    assert_eq!(vars, &var_map(&[("sassvar", "42"), ("scssvar", "69")]));
}

#[test]
fn test_constant_case_output() {
    let options = ExtractOptions::from_json(
        r#"{"sassCase": "paramCase", "outputCase": "constantCase"}"#,
    )
    .unwrap();
    let mut extractor = Extractor::new(options);

    let vars = extractor.extract_all(&fixture("camel.scss")).unwrap();

    assert_eq!(
        vars,
        &var_map(&[("ANOTHER_COOL_VAR", "turquoise"), ("MY_VAR", "1rem")])
    );
}

#[test]
fn test_partials_and_defaults_are_computed() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let vars = extractor.extract_all(&fixture("theme/main.scss")).unwrap();

    assert_eq!(
        vars,
        &var_map(&[
            ("accent-size", "20px"),
            ("base-size", "10px"),
            ("gutter", "24px"),
        ])
    );
}

#[test]
fn test_extension_inference() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let inferred = extractor.extract_all(&fixture("testSass")).unwrap().clone();

    assert_eq!(inferred, var_map(&[("sassvar", "42")]));
    // Same file, same entry
    assert_eq!(extractor.cached(&fixture("testSass.sass")), Some(&inferred));
}

#[test]
fn test_discover_names_only() {
    let names = discover_names(&NativeRuntime::new(), &fixture("theme/main.scss")).unwrap();

    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    assert_eq!(names, vec!["accent-size", "base-size", "gutter"]);
}

#[test]
fn test_parse_error_is_reported_with_location() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let err = extractor
        .extract_all(&fixture("broken/unbalanced.scss"))
        .unwrap_err();

    match err {
        SassVarsError::Parse { path, line, .. } => {
            assert!(path.ends_with("broken/unbalanced.scss"));
            assert_eq!(line, 5);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_import() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let err = extractor
        .extract_all(&fixture("broken/missing_import.scss"))
        .unwrap_err();

    assert!(matches!(err, SassVarsError::ImportResolution { .. }));
    assert!(err.to_string().contains("gone"));
}

#[test]
fn test_import_plan_for_fixture() {
    let options = ExtractOptions {
        sass_case: Some(CaseStyle::ParamCase),
        output_case: Some(CaseStyle::CamelCase),
        ..Default::default()
    };
    let mut extractor = Extractor::new(options);
    let importer = fixture("component.js");
    let request = ImportRequest {
        specifier: "./theme/main.scss".to_string(),
        default_binding: None,
        named: vec![NamedImport::same("gutter"), NamedImport::new("baseSize", "base")],
    };

    let plan = extractor
        .plan_import(&importer, &request)
        .unwrap()
        .unwrap();

    let json = serde_json::to_string(&plan).unwrap();
    insta::assert_snapshot!(json, @r#"[{"local":"gutter","value":"24px"},{"local":"base","value":"10px"}]"#);
}

#[test]
fn test_values_reflect_file_on_first_request_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("live.scss");
    fs::write(&path, "$tone: red;\n").unwrap();
    let mut extractor = Extractor::new(ExtractOptions::default());

    let first = extractor.extract_all(&path).unwrap().clone();
    fs::write(&path, "$tone: blue;\n$extra: 1;\n").unwrap();
    let second = extractor.extract_all(&path).unwrap().clone();

    // Monotonic cache: entries never change once resolved
    assert_eq!(first, second);
    assert_eq!(second, var_map(&[("tone", "red")]));

    let mut fresh = Extractor::new(ExtractOptions::default());
    let fresh_vars = fresh.extract_all(&path).unwrap();
    assert_eq!(fresh_vars, &var_map(&[("extra", "1"), ("tone", "blue")]));
}

#[test]
fn test_load_paths_reach_the_compiler() {
    let dir = tempfile::tempdir().unwrap();
    let shared = dir.path().join("shared");
    let app = dir.path().join("app");
    fs::create_dir_all(&shared).unwrap();
    fs::create_dir_all(&app).unwrap();
    fs::write(shared.join("_sizes.scss"), "$unit: 8px;\n").unwrap();
    // Only `@import` is followed during discovery; `@use` is left to the compiler
    fs::write(
        app.join("main.scss"),
        "@use \"sizes\" as s;\n\n$double: s.$unit * 2;\n",
    )
    .unwrap();

    let options = ExtractOptions {
        load_paths: vec![shared],
        ..Default::default()
    };
    let mut extractor = Extractor::new(options);

    let vars = extractor.extract_all(&app.join("main.scss")).unwrap();

    assert_eq!(vars, &var_map(&[("double", "16px")]));
}

#[test]
fn test_unknown_extension_from_disk() {
    let mut extractor = Extractor::new(ExtractOptions::default());

    let err = extractor
        .extract_all(Path::new("/nowhere/styles.css"))
        .unwrap_err();

    assert!(matches!(
        err,
        SassVarsError::UnknownExtension { ref extension, .. } if extension == "css"
    ));
}
