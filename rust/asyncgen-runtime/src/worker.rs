//! Fault-isolating task group.

use crate::error::{GroupError, TaskError, WorkerError};
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Cancel the remaining tasks after the first failure.
    pub cancel_on_failure: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cancel_on_failure: true,
        }
    }
}

impl WorkerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_on_failure(mut self, enabled: bool) -> Self {
        self.cancel_on_failure = enabled;
        self
    }
}

/// Group of named tasks that fail independently.
///
/// A task that returns an error or panics never takes down the group; its
/// failure is recorded and returned from [`WorkerGroup::wait`]. Tasks
/// receive the group's [`CancellationToken`] and are expected to stop when
/// it fires.
pub struct WorkerGroup {
    config: WorkerConfig,
    cancel: CancellationToken,
    tasks: Vec<(String, JoinHandle<Result<(), WorkerError>>)>,
}

impl Default for WorkerGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerGroup {
    pub fn new() -> Self {
        Self::with_config(WorkerConfig::default())
    }

    pub fn with_config(config: WorkerConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Spawn `task` on the current tokio runtime.
    pub fn spawn<F, Fut, E>(&mut self, name: impl Into<String>, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<TaskError> + Send + 'static,
    {
        let name = name.into();
        let cancel = self.cancel.clone();
        let cancel_on_failure = self.config.cancel_on_failure;
        let future = task(cancel.clone());
        let task_name = name.clone();

        debug!(task = %name, "spawning task");
        let handle = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(future).catch_unwind().await;
            let result = match outcome {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(WorkerError::Failed {
                    task: task_name,
                    source: e.into(),
                }),
                Err(payload) => Err(WorkerError::Panicked {
                    task: task_name,
                    message: panic_message(payload.as_ref()),
                }),
            };
            if let Err(e) = &result {
                error!(error = %e, "task failed");
                if cancel_on_failure {
                    cancel.cancel();
                }
            }
            result
        });
        self.tasks.push((name, handle));
    }

    /// Wait for every task and collect the failures in spawn order.
    pub async fn wait(self) -> Result<(), GroupError> {
        let mut failures = Vec::new();
        for (name, handle) in self.tasks {
            match handle.await {
                Ok(Ok(())) => debug!(task = %name, "task finished"),
                Ok(Err(e)) => failures.push(e),
                Err(join) => {
                    warn!(task = %name, error = %join, "task did not complete");
                    failures.push(WorkerError::Aborted { task: name });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(GroupError(failures))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
