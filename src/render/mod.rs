//! Parallel fan-out and reassembly: worker tasks, the bounded pool
//! dispatcher and the grid assembler.

mod assemble;
mod pool;
mod worker;

pub use assemble::{GridOptions, ProgressObserver, render_grid, render_grid_with_progress};
pub use worker::{PreprocessFn, RenderFn};
