//! The extraction engine.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! An [`Extractor`] owns one case configuration, one marker token and one
//! resolution cache. Two requests are supported:
//!
//! - [`Extractor::extract_all`]: every variable reachable from a file
//! - [`Extractor::extract_named`]: specific output-convention names
//!
//! Both return the whole cached map for the file, which includes anything
//! resolved by earlier requests. Work is only done for names that are not
//! cached yet; `extract_all` runs name discovery at most once per file.
//!
//! # Example
//!
//! ```rust,no_run
//! use sassvars_extract::{ExtractOptions, Extractor};
//! use std::path::Path;
//!
//! let options = ExtractOptions::from_json(
//!     r#"{"sassCase": "paramCase", "outputCase": "constantCase"}"#,
//! )?;
//! let mut extractor = Extractor::new(options);
//!
//! let vars = extractor.extract_all(Path::new("/project/styles/theme.scss"))?;
//! println!("{:?}", vars.get("PRIMARY_COLOR"));
//! # Ok::<(), sassvars_extract::SassVarsError>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sassvars_system_runtime::{NativeRuntime, SystemRuntime};

use crate::cache::{ResolutionCache, VarMap};
use crate::case::CaseTranslation;
use crate::config::ExtractOptions;
use crate::dialect::resolve_source;
use crate::discovery::discover_names;
use crate::error::{Result, SassVarsError};
use crate::marker::{MarkerSet, MarkerToken};
use crate::oracle::ValueOracle;
use crate::render::{GrassRenderer, Renderer};
use crate::scrape::{DeclarationScraper, OutputScraper};
use crate::syntax::is_variable_name;

/// Extracts computed SASS variable values, caching per file.
///
/// Extraction takes `&mut self`: an engine is used from one thread at a
/// time. Engines never share caches, so differently configured engines
/// cannot see each other's results.
pub struct Extractor {
    cases: CaseTranslation,
    load_paths: Vec<PathBuf>,
    runtime: Arc<dyn SystemRuntime>,
    renderer: Box<dyn Renderer>,
    scraper: Box<dyn OutputScraper>,
    token: MarkerToken,
    cache: ResolutionCache,
}

impl Extractor {
    /// Create an engine reading from the native filesystem and rendering
    /// with grass.
    pub fn new(options: ExtractOptions) -> Self {
        Self::with_runtime(options, Arc::new(NativeRuntime::new()))
    }

    /// Create an engine whose discovery and rendering both read through
    /// `runtime`.
    pub fn with_runtime(options: ExtractOptions, runtime: Arc<dyn SystemRuntime>) -> Self {
        Self {
            cases: options.case_translation(),
            load_paths: options.load_paths,
            renderer: Box::new(GrassRenderer::new(Arc::clone(&runtime))),
            runtime,
            scraper: Box::new(DeclarationScraper),
            token: MarkerToken::generate(),
            cache: ResolutionCache::new(),
        }
    }

    /// Replace the case functions, e.g. with custom closures.
    pub fn with_cases(mut self, cases: CaseTranslation) -> Self {
        self.cases = cases;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_scraper(mut self, scraper: Box<dyn OutputScraper>) -> Self {
        self.scraper = scraper;
        self
    }

    /// Use a fixed marker token instead of a random one.
    pub fn with_token(mut self, token: MarkerToken) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> &MarkerToken {
        &self.token
    }

    pub fn cases(&self) -> &CaseTranslation {
        &self.cases
    }

    /// Every variable declared in `path` or its import closure.
    pub fn extract_all(&mut self, path: &Path) -> Result<&VarMap> {
        let (target, key) = self.locate(path)?;

        if self.cache.is_complete(&key) {
            tracing::debug!(path = %key.display(), "All variables cached");
            return Ok(self.cache.entry(&key));
        }

        let discovered = discover_names(self.runtime.as_ref(), &target)?;
        let known = self.cache.get(&key);
        let unresolved: Vec<String> = discovered
            .into_iter()
            .filter(|name| {
                !known.is_some_and(|vars| vars.contains_key(&self.cases.to_output(name)))
            })
            .collect();

        let resolved = self.resolve(&target, unresolved)?;
        self.cache.merge(&key, resolved);
        self.cache.mark_complete(&key);

        Ok(self.cache.entry(&key))
    }

    /// The requested output-convention `names`, plus everything already
    /// cached for `path`.
    ///
    /// Fails with [`SassVarsError::CaseMismatch`] when a requested name does
    /// not come back under the configured case functions, or when its
    /// stylesheet-convention form is not a SASS identifier.
    pub fn extract_named<S: AsRef<str>>(&mut self, path: &Path, names: &[S]) -> Result<&VarMap> {
        let (target, key) = self.locate(path)?;

        let missing = self.cache.missing(&key, names);
        if missing.is_empty() {
            tracing::debug!(path = %key.display(), "Requested variables cached");
            return Ok(self.cache.entry(&key));
        }

        let sass_names: Vec<String> = missing.iter().map(|name| self.cases.to_sass(name)).collect();
        let invalid: Vec<String> = missing
            .iter()
            .zip(&sass_names)
            .filter(|(_, sass_name)| !is_variable_name(sass_name))
            .map(|(name, _)| name.clone())
            .collect();
        if !invalid.is_empty() {
            return Err(SassVarsError::CaseMismatch { names: invalid });
        }

        let resolved = self.resolve(&target, sass_names)?;
        self.cache.merge(&key, resolved);

        let unmatched = self.cache.missing(&key, missing.as_slice());
        if !unmatched.is_empty() {
            return Err(SassVarsError::CaseMismatch { names: unmatched });
        }

        Ok(self.cache.entry(&key))
    }

    /// The cached map for `path`, if anything was resolved for it.
    pub fn cached(&self, path: &Path) -> Option<&VarMap> {
        let (_, key) = self.locate(path).ok()?;
        self.cache.get(&key)
    }

    /// Resolve the file `path` refers to and its cache key.
    fn locate(&self, path: &Path) -> Result<(PathBuf, PathBuf)> {
        let source = resolve_source(self.runtime.as_ref(), path)?;
        let key = self
            .runtime
            .canonicalize(&source.path)
            .unwrap_or_else(|_| source.path.clone());
        Ok((source.path, key))
    }

    fn resolve(&self, target: &Path, sass_names: Vec<String>) -> Result<VarMap> {
        let markers = MarkerSet::new(&self.token, sass_names);
        ValueOracle::new(self.renderer.as_ref(), self.scraper.as_ref(), &self.load_paths).resolve(
            target,
            &markers,
            &self.cases.output_case,
        )
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("cases", &self.cases)
            .field("load_paths", &self.load_paths)
            .field("token", &self.token)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
