use std::sync::mpsc;

use crate::cache::ArtifactHandle;
use crate::foundation::error::{GridplotError, GridplotResult};
use crate::render::worker::{self, Task, WorkerContext};

/// Completion-ordered outcome stream of one dispatch. Iteration ends once
/// every submitted task has reported.
pub(crate) type Completions = mpsc::Receiver<GridplotResult<(usize, ArtifactHandle)>>;

/// Bound the pool: at most one worker per task, never more than the host
/// parallelism budget (or the caller's cap when one is set).
pub(crate) fn worker_count(total: usize, requested: Option<usize>) -> GridplotResult<usize> {
    if requested == Some(0) {
        return Err(GridplotError::config("workers must be >= 1 when set"));
    }
    let budget = requested.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    Ok(total.min(budget).max(1))
}

/// Build the bounded worker pool.
pub(crate) fn build_worker_pool(workers: usize) -> GridplotResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("gridplot-worker-{i}"))
        .build()
        .map_err(|e| GridplotError::resource(format!("failed to build worker pool: {e}")))
}

/// Submit every task up front and return the completion channel.
///
/// Results arrive in completion order, which is unrelated to submission
/// order; consumers must place by index. A failed task surfaces as an `Err`
/// at the point it would have completed. In-flight tasks keep running, so
/// the consumer can drain the stream to quiesce the pool.
pub(crate) fn dispatch<T: Send + 'static>(
    pool: &rayon::ThreadPool,
    ctx: WorkerContext<T>,
    tasks: Vec<Task<T>>,
) -> Completions {
    let (tx, rx) = mpsc::channel();
    for task in tasks {
        let tx = tx.clone();
        let ctx = ctx.clone();
        pool.spawn(move || {
            // The receiver is gone when the consumer bailed out early;
            // there is nothing left to do with the outcome then.
            let _ = tx.send(worker::run_task(&ctx, task));
        });
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ArtifactCache;
    use crate::canvas::CellCanvas;
    use crate::foundation::core::CellSize;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridplot_pool_{}_{name}", std::process::id()))
    }

    fn paint_item(item: &u8, canvas: &mut CellCanvas) -> anyhow::Result<()> {
        canvas.fill([*item, 0, 0, 255]);
        Ok(())
    }

    #[test]
    fn pool_is_capped_by_total_and_budget() {
        assert_eq!(worker_count(1, Some(8)).unwrap(), 1);
        assert_eq!(worker_count(100, Some(3)).unwrap(), 3);
        let host = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(worker_count(100_000, None).unwrap(), 100_000.min(host));
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        assert!(matches!(
            worker_count(4, Some(0)).unwrap_err(),
            GridplotError::Config(_)
        ));
    }

    #[test]
    fn every_submitted_task_reports_exactly_once() {
        let mut cache = ArtifactCache::open(scratch("reports")).unwrap();
        let ctx = WorkerContext {
            render: paint_item as crate::render::worker::RenderFn<u8>,
            preprocess: None,
            cell_size: CellSize::new(2, 2).unwrap(),
            background_rgba: [255, 255, 255, 255],
            writer: cache.writer(),
        };
        let tasks: Vec<Task<u8>> = (0..16)
            .map(|index| Task {
                index,
                item: index as u8,
            })
            .collect();

        let pool = build_worker_pool(4).unwrap();
        let seen: BTreeSet<usize> = dispatch(&pool, ctx, tasks)
            .into_iter()
            .map(|outcome| outcome.unwrap().0)
            .collect();

        assert_eq!(seen, (0..16).collect::<BTreeSet<_>>());
        cache.close(false).unwrap();
    }
}
