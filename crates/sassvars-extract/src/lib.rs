//! Computed SASS/SCSS variable values for build-time constant inlining.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - Variable name discovery over a stylesheet's `@import` graph, for both
//!   the indented (`.sass`) and brace (`.scss`) dialects
//! - Value resolution by rendering a synthesized stylesheet with grass and
//!   scraping marker declarations out of the CSS
//! - A per-engine cache keyed by resolved file, with case translation
//!   between stylesheet and output naming conventions
//! - Import planning helpers for source transforms that inline the values

mod cache;
mod case;
mod config;
mod dialect;
mod discovery;
mod error;
mod extractor;
mod marker;
mod oracle;
mod render;
mod scrape;
mod surface;
mod syntax;

pub use cache::{ResolutionCache, VarMap};
pub use case::{CaseFn, CaseStyle, CaseTranslation};
pub use config::ExtractOptions;
pub use dialect::{Dialect, SourceFile, resolve_source};
pub use discovery::{discover_names, resolve_import_path};
pub use error::{Result, SassVarsError};
pub use extractor::Extractor;
pub use marker::{Marker, MarkerSet, MarkerToken};
pub use oracle::{ValueOracle, synthesize_stylesheet};
pub use render::{GrassRenderer, Renderer};
pub use scrape::{DeclarationScraper, OutputScraper};
pub use surface::{
    BindingValue, ConstBinding, ImportRequest, NamedImport, is_stylesheet_import, resolve_import,
};
pub use syntax::{AtRule, Node, Stylesheet, VariableDecl, parse_stylesheet};

pub use sassvars_system_runtime::{MemoryRuntime, NativeRuntime, SystemRuntime};
