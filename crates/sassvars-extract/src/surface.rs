//! Import planning for source transforms.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A host that rewrites `import vars from "./theme.scss"` (or the named form)
//! into constant declarations only needs to know which imports to touch and
//! which constants to emit. This module answers both without touching any
//! syntax tree: the host builds an [`ImportRequest`], and gets back
//! serializable [`ConstBinding`]s.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::VarMap;
use crate::discovery::resolve_import_path;
use crate::error::{Result, SassVarsError};
use crate::extractor::Extractor;

static STYLESHEET_IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(scss|sass)").unwrap());

/// Whether a module specifier refers to a stylesheet.
pub fn is_stylesheet_import(specifier: &str) -> bool {
    STYLESHEET_IMPORT.is_match(specifier)
}

/// The file a specifier in `importer` refers to.
pub fn resolve_import(importer: &Path, specifier: &str) -> PathBuf {
    resolve_import_path(importer, specifier)
}

/// `{ imported as local }` in an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedImport {
    pub imported: String,
    pub local: String,
}

impl NamedImport {
    pub fn new(imported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            imported: imported.into(),
            local: local.into(),
        }
    }

    /// A specifier without an alias.
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            imported: name.clone(),
            local: name,
        }
    }
}

/// One import statement, as seen by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub specifier: String,
    #[serde(default)]
    pub default_binding: Option<String>,
    #[serde(default)]
    pub named: Vec<NamedImport>,
}

/// Value bound to a generated constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    /// Frozen object holding every variable.
    Object(VarMap),
    /// A single variable's value.
    Value(String),
}

/// `const <local> = <value>;`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstBinding {
    pub local: String,
    pub value: BindingValue,
}

impl Extractor {
    /// Plan the constants replacing an import statement in `importer`.
    ///
    /// Returns `None` when the specifier is not a stylesheet; the host leaves
    /// such imports alone. The default binding gets every variable; named
    /// imports are resolved together and get one constant each.
    pub fn plan_import(
        &mut self,
        importer: &Path,
        request: &ImportRequest,
    ) -> Result<Option<Vec<ConstBinding>>> {
        if !is_stylesheet_import(&request.specifier) {
            return Ok(None);
        }
        let target = resolve_import(importer, &request.specifier);
        tracing::debug!(
            importer = %importer.display(),
            target = %target.display(),
            "Planning stylesheet import"
        );

        let mut bindings = Vec::with_capacity(request.named.len() + 1);

        if let Some(local) = &request.default_binding {
            let vars = self.extract_all(&target)?;
            bindings.push(ConstBinding {
                local: local.clone(),
                value: BindingValue::Object(vars.clone()),
            });
        }

        if !request.named.is_empty() {
            let names: Vec<&str> = request
                .named
                .iter()
                .map(|named| named.imported.as_str())
                .collect();
            let vars = self.extract_named(&target, names.as_slice())?;
            for named in &request.named {
                let value = vars.get(&named.imported).ok_or_else(|| {
                    SassVarsError::CaseMismatch {
                        names: vec![named.imported.clone()],
                    }
                })?;
                bindings.push(ConstBinding {
                    local: named.local.clone(),
                    value: BindingValue::Value(value.clone()),
                });
            }
        }

        Ok(Some(bindings))
    }

    /// Plan the object replacing `require("<specifier>")` in `importer`.
    pub fn plan_require(&mut self, importer: &Path, specifier: &str) -> Result<Option<VarMap>> {
        if !is_stylesheet_import(specifier) {
            return Ok(None);
        }
        let target = resolve_import(importer, specifier);
        Ok(Some(self.extract_all(&target)?.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseStyle;
    use crate::config::ExtractOptions;
    use sassvars_system_runtime::MemoryRuntime;
    use std::sync::Arc;

    fn extractor() -> Extractor {
        let runtime = Arc::new(MemoryRuntime::new());
        runtime.add_file(
            Path::new("/app/styles/theme.scss"),
            "$primary-color: 12px;\n$gutter: 2rem * 2;\n",
        );
        let options = ExtractOptions {
            sass_case: Some(CaseStyle::ParamCase),
            output_case: Some(CaseStyle::CamelCase),
            ..Default::default()
        };
        Extractor::with_runtime(options, runtime)
    }

    #[test]
    fn test_is_stylesheet_import() {
        assert!(is_stylesheet_import("./theme.scss"));
        assert!(is_stylesheet_import("../base.sass"));
        assert!(is_stylesheet_import("pkg/styles.scss?inline"));
        assert!(!is_stylesheet_import("./theme.css"));
        assert!(!is_stylesheet_import("react"));
    }

    #[test]
    fn test_resolve_import() {
        assert_eq!(
            resolve_import(Path::new("/app/src/index.js"), "../styles/theme.scss"),
            PathBuf::from("/app/styles/theme.scss")
        );
    }

    #[test]
    fn test_non_stylesheet_is_left_alone() {
        let mut extractor = extractor();
        let request = ImportRequest {
            specifier: "./util.js".to_string(),
            default_binding: Some("util".to_string()),
            named: vec![],
        };

        let plan = extractor
            .plan_import(Path::new("/app/src/index.js"), &request)
            .unwrap();

        assert!(plan.is_none());
        assert!(
            extractor
                .plan_require(Path::new("/app/src/index.js"), "./util.js")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_default_and_named_import() {
        let mut extractor = extractor();
        let request = ImportRequest {
            specifier: "../styles/theme.scss".to_string(),
            default_binding: Some("theme".to_string()),
            named: vec![
                NamedImport::same("gutter"),
                NamedImport::new("primaryColor", "primary"),
            ],
        };

        let plan = extractor
            .plan_import(Path::new("/app/src/index.js"), &request)
            .unwrap()
            .unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].local, "theme");
        match &plan[0].value {
            BindingValue::Object(vars) => {
                assert_eq!(vars["primaryColor"], "12px");
                assert_eq!(vars["gutter"], "4rem");
            }
            other => panic!("expected object, got {:?}", other),
        }
        assert_eq!(
            plan[1],
            ConstBinding {
                local: "gutter".to_string(),
                value: BindingValue::Value("4rem".to_string()),
            }
        );
        assert_eq!(plan[2].local, "primary");
        assert_eq!(plan[2].value, BindingValue::Value("12px".to_string()));
    }

    #[test]
    fn test_named_import_in_wrong_case() {
        let mut extractor = extractor();
        let request = ImportRequest {
            specifier: "../styles/theme.scss".to_string(),
            default_binding: None,
            named: vec![NamedImport::same("PrimaryColor")],
        };

        let err = extractor
            .plan_import(Path::new("/app/src/index.js"), &request)
            .unwrap_err();

        assert!(matches!(err, SassVarsError::CaseMismatch { .. }));
    }

    #[test]
    fn test_every_named_import_gets_a_binding() {
        let mut extractor = extractor();
        let request = ImportRequest {
            specifier: "../styles/theme.scss".to_string(),
            default_binding: None,
            named: vec![NamedImport::same("gutter"), NamedImport::new("gutter", "space")],
        };

        let plan = extractor
            .plan_import(Path::new("/app/src/index.js"), &request)
            .unwrap()
            .unwrap();

        let locals: Vec<&str> = plan.iter().map(|b| b.local.as_str()).collect();
        assert_eq!(locals, vec!["gutter", "space"]);
    }

    #[test]
    fn test_unusable_named_import_fails_the_plan() {
        let mut extractor = extractor();
        let request = ImportRequest {
            specifier: "../styles/theme.scss".to_string(),
            default_binding: None,
            named: vec![NamedImport::same("gutter"), NamedImport::same("9lives")],
        };

        let err = extractor
            .plan_import(Path::new("/app/src/index.js"), &request)
            .unwrap_err();

        assert!(
            matches!(err, SassVarsError::CaseMismatch { ref names } if names == &["9lives"])
        );
    }

    #[test]
    fn test_plan_require() {
        let mut extractor = extractor();
        let vars = extractor
            .plan_require(Path::new("/app/src/index.js"), "../styles/theme")
            .unwrap();
        // No stylesheet extension in the specifier
        assert!(vars.is_none());

        let vars = extractor
            .plan_require(Path::new("/app/src/index.js"), "../styles/theme.scss")
            .unwrap()
            .unwrap();
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_bindings_serialize_for_hosts() {
        let mut vars = VarMap::new();
        vars.insert("gutter".to_string(), "4rem".to_string());
        let bindings = vec![
            ConstBinding {
                local: "theme".to_string(),
                value: BindingValue::Object(vars),
            },
            ConstBinding {
                local: "gutter".to_string(),
                value: BindingValue::Value("4rem".to_string()),
            },
        ];

        let json = serde_json::to_value(&bindings).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {"local": "theme", "value": {"gutter": "4rem"}},
                {"local": "gutter", "value": "4rem"}
            ])
        );
    }

    #[test]
    fn test_request_from_json() {
        let request: ImportRequest = serde_json::from_str(
            r#"{"specifier": "./a.scss", "named": [{"imported": "x", "local": "y"}]}"#,
        )
        .unwrap();

        assert_eq!(request.default_binding, None);
        assert_eq!(request.named, vec![NamedImport::new("x", "y")]);
    }
}
