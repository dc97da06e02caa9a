//! Extraction options.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Options use the same keys as the JavaScript build plugin configuration:
//!
//! ```json
//! { "sassCase": "paramCase", "outputCase": "constantCase" }
//! ```
//!
//! A missing or `null` case means names pass through unchanged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::case::{CaseStyle, CaseTranslation};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// Convention of names as declared in the stylesheets
    pub sass_case: Option<CaseStyle>,
    /// Convention of names handed to consumers
    pub output_case: Option<CaseStyle>,
    /// Extra directories the compiler searches for imports
    pub load_paths: Vec<PathBuf>,
}

impl ExtractOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn case_translation(&self) -> CaseTranslation {
        CaseTranslation::new(self.sass_case, self.output_case)
    }
}
