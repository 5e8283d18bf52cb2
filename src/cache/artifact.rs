use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::canvas::CellCanvas;
use crate::foundation::error::{GridplotError, GridplotResult};

/// Reference to one persisted artifact inside the cache namespace.
///
/// Consumed exactly once by the assembler; invalid after the owning
/// [`ArtifactCache`] is closed.
#[derive(Clone, Debug)]
pub struct ArtifactHandle {
    /// Linear task index the artifact belongs to.
    pub index: usize,
    /// Artifact location inside the cache namespace.
    pub path: PathBuf,
}

/// Scoped disk namespace handing rendered artifacts from workers to the
/// assembler.
///
/// Created empty by [`ArtifactCache::open`], written through worker-side
/// [`ArtifactWriter`]s (one key per task index, so writes never contend),
/// read by the assembler and torn down by [`ArtifactCache::close`] unless
/// retention is requested. Dropping an unclosed cache removes the namespace
/// best-effort.
#[derive(Debug)]
pub struct ArtifactCache {
    root: PathBuf,
    closed: bool,
}

impl ArtifactCache {
    /// Create a fresh cache namespace at `root`.
    ///
    /// Fails with [`GridplotError::Resource`] when `root` already exists: a
    /// leftover namespace from an earlier, unclean run is never reused
    /// silently.
    pub fn open(root: impl Into<PathBuf>) -> GridplotResult<Self> {
        let root = root.into();
        match fs::create_dir(&root) {
            Ok(()) => {
                tracing::debug!(root = %root.display(), "artifact cache opened");
                Ok(Self {
                    root,
                    closed: false,
                })
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(GridplotError::resource(format!(
                    "artifact cache '{}' already exists; remove it or configure another cache_dir",
                    root.display()
                )))
            }
            Err(e) => Err(GridplotError::resource(format!(
                "failed to create artifact cache '{}': {e}",
                root.display()
            ))),
        }
    }

    /// Namespace root on disk.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Clonable writer handed across the worker boundary.
    pub fn writer(&self) -> ArtifactWriter {
        ArtifactWriter {
            root: self.root.clone(),
        }
    }

    /// Load a previously written artifact.
    ///
    /// Fails with [`GridplotError::NotFound`] when the handle's key was never
    /// written or was already released.
    pub fn read(&self, handle: &ArtifactHandle) -> GridplotResult<RgbaImage> {
        if !handle.path.is_file() {
            return Err(GridplotError::not_found(format!(
                "artifact {} at '{}'",
                handle.index,
                handle.path.display()
            )));
        }
        let img = image::open(&handle.path).map_err(|e| {
            GridplotError::resource(format!(
                "failed to decode artifact '{}': {e}",
                handle.path.display()
            ))
        })?;
        Ok(img.to_rgba8())
    }

    /// Tear the namespace down, or keep it for inspection when `retain`.
    ///
    /// Idempotent; calls after the first are no-ops.
    pub fn close(&mut self, retain: bool) -> GridplotResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if retain {
            tracing::debug!(root = %self.root.display(), "artifact cache retained");
            return Ok(());
        }
        fs::remove_dir_all(&self.root).map_err(|e| {
            GridplotError::resource(format!(
                "failed to remove artifact cache '{}': {e}",
                self.root.display()
            ))
        })?;
        tracing::debug!(root = %self.root.display(), "artifact cache removed");
        Ok(())
    }
}

impl Drop for ArtifactCache {
    fn drop(&mut self) {
        // Backstop for abnormal exits; normal paths go through close().
        if !self.closed {
            let _ = fs::remove_dir_all(&self.root);
        }
    }
}

/// Worker-side handle persisting one artifact per task index.
#[derive(Clone, Debug)]
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    /// Persist `canvas` under `index` and return the artifact's handle.
    ///
    /// Rewriting an index is last-write-wins; the dispatcher submits each
    /// index exactly once, so that never happens in practice.
    pub fn write(&self, index: usize, canvas: &CellCanvas) -> GridplotResult<ArtifactHandle> {
        let path = self.root.join(format!("{index}.png"));
        canvas.save_png(&path)?;
        Ok(ArtifactHandle { index, path })
    }
}
