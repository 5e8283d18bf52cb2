use std::path::PathBuf;

use crate::cache::ArtifactCache;
use crate::canvas::{GridCanvas, GridLabels};
use crate::foundation::core::{CellSize, GridShape, TraversalOrder};
use crate::foundation::error::{GridplotError, GridplotResult};
use crate::render::pool;
use crate::render::worker::{PreprocessFn, RenderFn, Task, WorkerContext};

/// Observer invoked once per completed-or-failed task.
///
/// Purely observational: it cannot influence scheduling or placement.
pub trait ProgressObserver {
    /// `done` increases monotonically and reaches `total` exactly when every
    /// submitted task has reported.
    fn completed(&mut self, done: usize, total: usize);
}

/// Options for [`render_grid`].
pub struct GridOptions<T> {
    /// Number of items to render; `None` renders everything the data source
    /// yields. Items beyond `total` are ignored.
    pub total: Option<usize>,
    /// Transform applied to each raw item on the worker before rendering.
    pub preprocess: Option<PreprocessFn<T>>,
    /// Per-cell canvas size in pixels.
    pub cell_size: CellSize,
    /// Rule mapping task indexes onto grid coordinates.
    pub traversal: TraversalOrder,
    /// Optional column/row captions.
    pub labels: Option<GridLabels>,
    /// Background fill (straight-alpha RGBA) for the composite and for every
    /// cell canvas handed to the render callback.
    pub background_rgba: [u8; 4],
    /// Keep the artifact cache directory after completion, for inspection.
    pub retain_cache: bool,
    /// Artifact cache namespace; must not exist when rendering starts.
    pub cache_dir: PathBuf,
    /// Upper bound on the worker pool; defaults to the host parallelism. The
    /// pool never exceeds the task count either way.
    pub workers: Option<usize>,
}

impl<T> Default for GridOptions<T> {
    fn default() -> Self {
        Self {
            total: None,
            preprocess: None,
            cell_size: CellSize::default(),
            traversal: TraversalOrder::RowMajor,
            labels: None,
            background_rgba: [255, 255, 255, 255],
            retain_cache: false,
            cache_dir: PathBuf::from(".gridcache"),
            workers: None,
        }
    }
}

impl<T> Clone for GridOptions<T> {
    fn clone(&self) -> Self {
        Self {
            total: self.total,
            preprocess: self.preprocess,
            cell_size: self.cell_size,
            traversal: self.traversal,
            labels: self.labels.clone(),
            background_rgba: self.background_rgba,
            retain_cache: self.retain_cache,
            cache_dir: self.cache_dir.clone(),
            workers: self.workers,
        }
    }
}

/// Render every data item into its own grid cell in parallel and assemble
/// the composite canvas.
///
/// Tasks are fanned out across a bounded worker pool, persisted through a
/// scoped disk cache and placed by their index and the configured
/// [`TraversalOrder`], never by completion order, so identical inputs
/// produce pixel-identical composites whatever the scheduler does. Fewer
/// items than cells leaves the trailing cells blank; more is a config error.
///
/// Completion counts are reported through `tracing`; use
/// [`render_grid_with_progress`] to observe them directly.
pub fn render_grid<T, I>(
    render: RenderFn<T>,
    data: I,
    shape: GridShape,
    opts: &GridOptions<T>,
) -> GridplotResult<GridCanvas>
where
    T: Send + 'static,
    I: IntoIterator<Item = T>,
{
    render_grid_inner(render, data, shape, opts, &mut TracingProgress)
}

/// [`render_grid`] with a caller-supplied progress observer.
pub fn render_grid_with_progress<T, I>(
    render: RenderFn<T>,
    data: I,
    shape: GridShape,
    opts: &GridOptions<T>,
    progress: &mut dyn ProgressObserver,
) -> GridplotResult<GridCanvas>
where
    T: Send + 'static,
    I: IntoIterator<Item = T>,
{
    render_grid_inner(render, data, shape, opts, progress)
}

#[tracing::instrument(name = "render_grid", skip(render, data, opts, progress))]
fn render_grid_inner<T, I>(
    render: RenderFn<T>,
    data: I,
    shape: GridShape,
    opts: &GridOptions<T>,
    progress: &mut dyn ProgressObserver,
) -> GridplotResult<GridCanvas>
where
    T: Send + 'static,
    I: IntoIterator<Item = T>,
{
    // Collected up front: the task count bounds the pool and is validated
    // against the grid before any resource exists.
    let items: Vec<T> = match opts.total {
        Some(t) => data.into_iter().take(t).collect(),
        None => data.into_iter().collect(),
    };
    let total = items.len();

    validate(shape, opts, total)?;

    let mut composite = GridCanvas::new(
        shape,
        opts.cell_size,
        opts.background_rgba,
        opts.labels.as_ref(),
    );

    let mut cache = ArtifactCache::open(&opts.cache_dir)?;
    let workers = pool::worker_count(total, opts.workers)?;
    let worker_pool = pool::build_worker_pool(workers)?;

    let ctx = WorkerContext {
        render,
        preprocess: opts.preprocess,
        cell_size: opts.cell_size,
        background_rgba: opts.background_rgba,
        writer: cache.writer(),
    };
    let tasks: Vec<Task<T>> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| Task { index, item })
        .collect();

    tracing::debug!(total, workers, "dispatching grid tasks");
    let completions = pool::dispatch(&worker_pool, ctx, tasks);

    let mut done = 0usize;
    let mut first_error: Option<GridplotError> = None;

    for outcome in completions {
        done += 1;
        match outcome {
            Ok((index, handle)) if first_error.is_none() => match cache.read(&handle) {
                Ok(artifact) => {
                    let coord = opts.traversal.cell_at(index, shape);
                    composite.place(coord, &artifact);
                }
                Err(e) => first_error = Some(e),
            },
            // Draining after a failure; nothing more gets placed, but every
            // worker must report before the namespace is torn down.
            Ok(_) => {}
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        progress.completed(done, total);
    }

    let close_result = cache.close(opts.retain_cache);
    if let Some(e) = first_error {
        return Err(e);
    }
    close_result?;
    Ok(composite)
}

fn validate<T>(shape: GridShape, opts: &GridOptions<T>, total: usize) -> GridplotResult<()> {
    if shape.rows == 0 || shape.cols == 0 {
        return Err(GridplotError::config("grid shape dimensions must be > 0"));
    }
    if opts.cell_size.width == 0 || opts.cell_size.height == 0 {
        return Err(GridplotError::config("cell size dimensions must be > 0"));
    }
    if opts.workers == Some(0) {
        return Err(GridplotError::config("workers must be >= 1 when set"));
    }

    let cells = shape.cell_count();
    if total > cells {
        return Err(GridplotError::config(format!(
            "{total} tasks do not fit a {}x{} grid ({cells} cells): two tasks would alias one cell",
            shape.rows, shape.cols
        )));
    }

    if let Some(labels) = &opts.labels {
        if let Some(columns) = &labels.columns {
            if columns.len() != shape.cols as usize {
                return Err(GridplotError::config(format!(
                    "{} column labels for {} columns",
                    columns.len(),
                    shape.cols
                )));
            }
        }
        if let Some(rows) = &labels.rows {
            if rows.len() != shape.rows as usize {
                return Err(GridplotError::config(format!(
                    "{} row labels for {} rows",
                    rows.len(),
                    shape.rows
                )));
            }
        }
    }

    Ok(())
}

struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn completed(&mut self, done: usize, total: usize) {
        tracing::debug!(done, total, "grid cell finished");
    }
}
