//! The compiler boundary: synthesized SCSS in, rendered CSS out.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use sassvars_system_runtime::sass_native::compile_expanded;
use sassvars_system_runtime::{RuntimeResult, SystemRuntime};

/// An opaque SASS compiler.
///
/// Implementations resolve `@import`s on their own; `load_paths` lists the
/// directories to search, the target file's directory first.
pub trait Renderer: Send + Sync {
    fn render(&self, scss: &str, load_paths: &[PathBuf]) -> RuntimeResult<String>;
}

/// Renders with grass, reading files through a `SystemRuntime`.
///
/// Output is always in expanded style, one declaration per line.
#[derive(Clone)]
pub struct GrassRenderer {
    runtime: Arc<dyn SystemRuntime>,
}

impl GrassRenderer {
    pub fn new(runtime: Arc<dyn SystemRuntime>) -> Self {
        Self { runtime }
    }
}

impl fmt::Debug for GrassRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrassRenderer")
            .field("runtime", &"<SystemRuntime>")
            .finish()
    }
}

impl Renderer for GrassRenderer {
    fn render(&self, scss: &str, load_paths: &[PathBuf]) -> RuntimeResult<String> {
        compile_expanded(self.runtime.as_ref(), scss, load_paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sassvars_system_runtime::{MemoryRuntime, RuntimeError};
    use std::path::Path;

    #[test]
    fn test_grass_renderer_uses_load_paths() {
        let runtime = Arc::new(MemoryRuntime::new());
        runtime.add_file(Path::new("/lib/_tokens.scss"), "$space: 2px * 3;");

        let renderer = GrassRenderer::new(runtime);
        let css = renderer
            .render(
                "@import \"tokens\";\n.a { padding: $space; }",
                &[PathBuf::from("/lib")],
            )
            .unwrap();

        assert!(css.contains("padding: 6px"));
    }

    #[test]
    fn test_grass_renderer_reports_compiler_errors() {
        let renderer = GrassRenderer::new(Arc::new(MemoryRuntime::new()));
        let err = renderer.render(".a { b: $nope; }", &[]).unwrap_err();
        assert!(matches!(err, RuntimeError::SassError(_)));
    }
}
