//! Gridplot assembles a rectangular grid of independently rendered raster
//! cells into one composite image.
//!
//! Rendering a single cell is expensive and entirely caller-defined; this
//! crate owns the machinery around it:
//!
//! - fan tasks out across a bounded worker pool
//! - hand each worker's artifact off through a scoped disk cache
//! - place artifacts into their grid positions regardless of completion order
//!
//! The entry points are [`render_grid`] and [`render_grid_with_progress`].
//! Cell placement is driven purely by the task index and the configured
//! [`TraversalOrder`], so two runs over the same input produce identical
//! composites no matter how the scheduler interleaves workers.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod cache;
pub mod canvas;
pub mod render;

pub use crate::cache::{ArtifactCache, ArtifactHandle, ArtifactWriter};
pub use crate::canvas::{CellCanvas, CellRect, GridCanvas, GridLabels, LabelStyle};
pub use crate::foundation::core::{CellCoord, CellSize, GridShape, TraversalOrder};
pub use crate::foundation::error::{GridplotError, GridplotResult};
pub use crate::render::{
    GridOptions, PreprocessFn, ProgressObserver, RenderFn, render_grid, render_grid_with_progress,
};
