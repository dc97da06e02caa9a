//! Computing variable values by asking the SASS compiler.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The oracle never evaluates SASS itself. For a set of names it writes a
//! tiny stylesheet that imports the target file and prints each variable
//! into a uniquely named custom property:
//!
//! ```scss
//! @import "/project/styles/theme.scss";
//! #vars_<token> {
//!   @if global-variable-exists("primary") {
//!     --primary_<token>: #{inspect($primary)};
//!   }
//! }
//! ```
//!
//! `inspect()` keeps the value's SASS source form (maps stay `(a: 1)`,
//! strings keep their quotes) and the `@if` guard turns an undeclared name
//! into a missing marker instead of a compiler error.

use std::path::{Path, PathBuf};

use crate::cache::VarMap;
use crate::case::CaseFn;
use crate::error::{Result, SassVarsError};
use crate::marker::MarkerSet;
use crate::render::Renderer;
use crate::scrape::OutputScraper;

/// Write the stylesheet that tags every marker's variable.
pub fn synthesize_stylesheet(target: &Path, markers: &MarkerSet) -> String {
    let mut scss = String::new();

    scss.push_str(&format!("@import \"{}\";\n", escape_string(&target.to_string_lossy())));
    scss.push_str(&format!("{} {{\n", markers.token().block_selector()));
    for entry in markers.iter() {
        scss.push_str(&format!(
            "  @if global-variable-exists(\"{name}\") {{\n    {marker}: #{{inspect(${name})}};\n  }}\n",
            name = entry.name,
            marker = entry.marker,
        ));
    }
    scss.push('}');

    scss
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Drives one render-and-scrape round for a target file.
pub struct ValueOracle<'a> {
    renderer: &'a dyn Renderer,
    scraper: &'a dyn OutputScraper,
    load_paths: &'a [PathBuf],
}

impl<'a> ValueOracle<'a> {
    pub fn new(
        renderer: &'a dyn Renderer,
        scraper: &'a dyn OutputScraper,
        load_paths: &'a [PathBuf],
    ) -> Self {
        Self {
            renderer,
            scraper,
            load_paths,
        }
    }

    /// Resolve every marker's variable in `target`.
    ///
    /// The returned map is keyed by `output_case` applied to each name.
    /// An empty marker set returns an empty map without rendering.
    pub fn resolve(
        &self,
        target: &Path,
        markers: &MarkerSet,
        output_case: &CaseFn,
    ) -> Result<VarMap> {
        if markers.is_empty() {
            return Ok(VarMap::new());
        }

        let scss = synthesize_stylesheet(target, markers);

        let mut load_paths = Vec::with_capacity(self.load_paths.len() + 1);
        if let Some(dir) = target.parent() {
            load_paths.push(dir.to_path_buf());
        }
        load_paths.extend(self.load_paths.iter().cloned());

        tracing::debug!(
            path = %target.display(),
            names = markers.len(),
            "Rendering SASS variables"
        );

        let css = self
            .renderer
            .render(&scss, &load_paths)
            .map_err(|e| SassVarsError::Render {
                path: target.to_path_buf(),
                message: e.to_string(),
            })?;

        let values = self.scraper.scrape(&css, markers)?;

        Ok(values
            .into_iter()
            .map(|(name, value)| (output_case.apply(&name), value))
            .collect())
    }
}
