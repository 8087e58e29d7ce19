use thiserror::Error;

/// Boxed error returned by a task.
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single task in a [`WorkerGroup`](crate::WorkerGroup).
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("task {task} failed: {source}")]
    Failed {
        task: String,
        #[source]
        source: TaskError,
    },

    #[error("task {task} panicked: {message}")]
    Panicked { task: String, message: String },

    #[error("task {task} was aborted before completing")]
    Aborted { task: String },
}

impl WorkerError {
    pub fn task(&self) -> &str {
        match self {
            WorkerError::Failed { task, .. }
            | WorkerError::Panicked { task, .. }
            | WorkerError::Aborted { task } => task,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, WorkerError::Panicked { .. })
    }
}

/// Every failure of a worker group, in spawn order.
#[derive(Error, Debug)]
#[error("{} task(s) failed: {}", .0.len(), summary(.0))]
pub struct GroupError(pub Vec<WorkerError>);

impl GroupError {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkerError> {
        self.0.iter()
    }
}

fn summary(errors: &[WorkerError]) -> String {
    errors
        .iter()
        .map(|e| e.task())
        .collect::<Vec<_>>()
        .join(", ")
}
