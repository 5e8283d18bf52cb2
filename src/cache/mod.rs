//! Disk-backed handoff cache between render workers and the assembler.
//!
//! Rendered cell surfaces are not assumed cheaply transferable between the
//! worker and assembling sides, so every worker persists its artifact into a
//! scoped namespace that the assembler reads back exactly once. The
//! namespace lives for one invocation and is removed on the way out unless
//! retention is requested.

mod artifact;

pub use artifact::{ArtifactCache, ArtifactHandle, ArtifactWriter};
