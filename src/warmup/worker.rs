use std::sync::Arc;

use derive_where::derive_where;

use super::{shared::TaskQueue, task::EstablishmentTask};
#[cfg(feature = "tracing-unstable")]
use crate::trace::{TracingRepresentation, WARMUP_TRACING_EVENT_TARGET};
use crate::{
    error::Error,
    establish::EstablishConnection,
    runtime::{self, AsyncJoinHandle},
};

/// A fixed-size group of workers draining a shared queue of connection attempts.
///
/// Dropping the group aborts any worker that is still running, so a warm-up whose future is
/// dropped does not leave workers behind.
#[derive_where(Debug)]
pub(crate) struct WorkerGroup<E: EstablishConnection> {
    workers: Vec<AsyncJoinHandle<()>>,

    queue: Arc<TaskQueue>,

    task: EstablishmentTask<E>,
}

impl<E: EstablishConnection> WorkerGroup<E> {
    /// Spawns `worker_count` workers that together run every attempt in `queue`.
    pub(crate) fn start(
        worker_count: u32,
        queue: Arc<TaskQueue>,
        task: EstablishmentTask<E>,
    ) -> Self {
        let workers = (0..worker_count)
            .map(|worker_id| {
                let queue = queue.clone();
                let task = task.clone();
                runtime::spawn(async move {
                    execute(worker_id, queue, task).await;
                })
            })
            .collect();

        Self {
            workers,
            queue,
            task,
        }
    }

    /// Waits for every worker to finish, then shuts the group down. A worker that terminated
    /// abnormally does not cut the wait short; any attempt that no worker got to run is recorded
    /// as failed.
    pub(crate) async fn join(mut self) {
        let results = runtime::join_all(self.workers.iter_mut()).await;
        for (_worker_id, result) in results.into_iter().enumerate() {
            if let Err(_error) = result {
                #[cfg(feature = "tracing-unstable")]
                tracing::warn!(
                    target: WARMUP_TRACING_EVENT_TARGET,
                    workerId = _worker_id,
                    error = _error.tracing_representation(),
                    "Warm-up worker terminated abnormally",
                );
            }
        }

        for attempt in self.queue.drain_remaining() {
            self.task.record_failure(
                attempt,
                Error::internal("connection attempt was never run because its worker terminated"),
            );
        }
    }
}

impl<E: EstablishConnection> Drop for WorkerGroup<E> {
    fn drop(&mut self) {
        for worker in &self.workers {
            worker.abort();
        }
    }
}

/// Run one worker until the queue is empty. The queue lock is released before the attempt runs.
async fn execute<E: EstablishConnection>(
    _worker_id: u32,
    queue: Arc<TaskQueue>,
    task: EstablishmentTask<E>,
) {
    #[cfg(feature = "tracing-unstable")]
    tracing::trace!(
        target: WARMUP_TRACING_EVENT_TARGET,
        workerId = _worker_id,
        "Warm-up worker started"
    );

    while let Some(attempt) = queue.next() {
        task.run(attempt).await;
    }

    #[cfg(feature = "tracing-unstable")]
    tracing::trace!(
        target: WARMUP_TRACING_EVENT_TARGET,
        workerId = _worker_id,
        "Warm-up worker stopped"
    );
}
