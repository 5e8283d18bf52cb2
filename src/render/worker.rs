use crate::cache::{ArtifactHandle, ArtifactWriter};
use crate::canvas::CellCanvas;
use crate::foundation::core::CellSize;
use crate::foundation::error::{GridplotError, GridplotResult};

/// Caller-supplied cell renderer.
///
/// Receives the (possibly preprocessed) data item and a fresh canvas sized
/// to one grid cell; its contract is to fully populate the canvas or fail.
/// A plain `fn` pointer is required rather than a closure: tasks execute on
/// pool threads and must not capture ambient mutable state.
pub type RenderFn<T> = fn(&T, &mut CellCanvas) -> anyhow::Result<()>;

/// Caller-supplied transform applied to a raw data item on the worker before
/// rendering. Must be a pure `fn`, like [`RenderFn`].
pub type PreprocessFn<T> = fn(T) -> anyhow::Result<T>;

/// One unit of rendering work: a linear index zipped with its data item.
pub(crate) struct Task<T> {
    pub(crate) index: usize,
    pub(crate) item: T,
}

/// Everything a worker needs besides the task itself.
pub(crate) struct WorkerContext<T> {
    pub(crate) render: RenderFn<T>,
    pub(crate) preprocess: Option<PreprocessFn<T>>,
    pub(crate) cell_size: CellSize,
    pub(crate) background_rgba: [u8; 4],
    pub(crate) writer: ArtifactWriter,
}

impl<T> Clone for WorkerContext<T> {
    fn clone(&self) -> Self {
        Self {
            render: self.render,
            preprocess: self.preprocess,
            cell_size: self.cell_size,
            background_rgba: self.background_rgba,
            writer: self.writer.clone(),
        }
    }
}

/// Execute one task on a pool thread: preprocess, render onto a fresh cell
/// canvas, persist the artifact.
pub(crate) fn run_task<T>(
    ctx: &WorkerContext<T>,
    task: Task<T>,
) -> GridplotResult<(usize, ArtifactHandle)> {
    let Task { index, item } = task;

    let data = match ctx.preprocess {
        Some(f) => f(item)
            .map_err(|e| GridplotError::render(index, format!("preprocess failed: {e:#}")))?,
        None => item,
    };

    let mut canvas = CellCanvas::filled(ctx.cell_size, ctx.background_rgba);
    (ctx.render)(&data, &mut canvas).map_err(|e| GridplotError::render(index, format!("{e:#}")))?;

    let handle = ctx.writer.write(index, &canvas)?;
    Ok((index, handle))
}
