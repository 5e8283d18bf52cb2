//! Raster surfaces: the per-cell canvas handed to render callbacks and the
//! composite grid canvas the assembler places artifacts into.

mod cell;
mod grid;
mod labels;

pub use cell::CellCanvas;
pub use grid::{CellRect, GridCanvas};
pub use labels::{GridLabels, LabelStyle};
