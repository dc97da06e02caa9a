/*
 * sassvars-system-runtime
 * Copyright (c) 2025 Posit, PBC
 *
 * Runtime abstraction layer for stylesheet access.
 *
 * Variable extraction reads stylesheets in two places: while walking the
 * import graph for variable names, and inside the SASS compiler when it
 * resolves the synthesized `@import`. Both go through a `SystemRuntime` so
 * they always agree on what exists:
 *
 * - NativeRuntime: the real filesystem (default for native targets)
 * - MemoryRuntime: an in-memory virtual filesystem (tests, hosts without a disk)
 */

mod memory;
mod native;
mod traits;

#[cfg(not(target_arch = "wasm32"))]
pub mod sass_native;

// Re-export core types (API surface)
pub use traits::{PathKind, RuntimeError, RuntimeResult, SystemRuntime, normalize_components};

// Re-export runtime implementations
pub use memory::MemoryRuntime;
pub use native::NativeRuntime;
