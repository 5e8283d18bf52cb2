/// Convenience alias for results produced by this crate.
pub type GridplotResult<T> = Result<T, GridplotError>;

/// Error taxonomy for grid rendering.
#[derive(thiserror::Error, Debug)]
pub enum GridplotError {
    /// Invalid grid configuration, rejected before any resource is allocated
    /// or worker spawned.
    #[error("config error: {0}")]
    Config(String),

    /// The preprocess or render callback failed for one task. Never retried;
    /// assembly of the remaining grid is aborted.
    #[error("render error at cell {index}: {cause}")]
    Render {
        /// Linear index of the failed task.
        index: usize,
        /// Callback failure, rendered as a message.
        cause: String,
    },

    /// The artifact cache namespace could not be created, collided with an
    /// existing directory, or failed IO.
    #[error("resource error: {0}")]
    Resource(String),

    /// An artifact was expected but missing when the assembler read it.
    /// Indicates an internal consistency bug, not a user-facing condition.
    #[error("artifact not found: {0}")]
    NotFound(String),

    /// Any other failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridplotError {
    /// Build a [`GridplotError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`GridplotError::Render`] for the task at `index`.
    pub fn render(index: usize, cause: impl std::fmt::Display) -> Self {
        Self::Render {
            index,
            cause: format!("{cause:#}"),
        }
    }

    /// Build a [`GridplotError::Resource`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`GridplotError::NotFound`].
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GridplotError::config("x")
                .to_string()
                .contains("config error:")
        );
        assert!(
            GridplotError::resource("x")
                .to_string()
                .contains("resource error:")
        );
        assert!(
            GridplotError::not_found("x")
                .to_string()
                .contains("artifact not found:")
        );
    }

    #[test]
    fn render_error_carries_the_task_index() {
        let e = GridplotError::render(3, "boom");
        assert_eq!(e.to_string(), "render error at cell 3: boom");
        match e {
            GridplotError::Render { index, .. } => assert_eq!(index, 3),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
