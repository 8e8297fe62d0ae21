
mod shared;
mod task;
mod worker;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use thiserror::Error;

use self::{
    shared::{EstablishedConnection, FirstFailureSlot, ResultCollection, TaskQueue},
    task::EstablishmentTask,
    worker::WorkerGroup,
};
use crate::{
    error::{Error as WarmupError, ErrorKind, Result},
    establish::EstablishConnection,
    event::warmup::{
        ConnectionClosedEvent,
        ConnectionClosedReason,
        WarmupEventEmitter,
        WarmupFailedEvent,
        WarmupStartedEvent,
        WarmupSucceededEvent,
    },
    options::WarmupRequest,
    pool::DestinationPool,
};

/// The failure captured from one connection attempt: the first one recorded among all the
/// attempts of a warm-up. When several attempts fail at about the same time, which of them is
/// recorded is unspecified.
#[derive(Clone, Debug, Error)]
#[error("connection attempt {attempt} failed: {error}")]
#[non_exhaustive]
pub struct FailureRecord {
    /// The zero-based index of the failed attempt.
    pub attempt: u32,

    /// Why the attempt failed.
    #[source]
    pub error: WarmupError,
}

impl FailureRecord {
    pub(crate) fn new(attempt: u32, error: WarmupError) -> Self {
        Self { attempt, error }
    }
}

/// Describes a warm-up that completed and transferred its connections to the pool.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct WarmupSummary {
    /// The number of connections handed to the pool.
    pub established: u32,

    /// The number of attempts that failed. Always zero for fail-fast warm-ups.
    pub failed: u32,

    /// A representative failure, present whenever `failed` is non-zero.
    pub first_failure: Option<FailureRecord>,

    /// How long the warm-up took.
    pub duration: Duration,
}

impl WarmupSummary {
    /// Whether every requested connection was established.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Establishes the initial connections of a pool, `request.target_count` of them, with at most
/// `request.effective_worker_count()` attempts in flight at once.
///
/// This waits for every attempt to finish, even after one has failed; nothing is cancelled or
/// retried. Afterwards:
///
/// - if `request.fail_fast` is set and any attempt failed, every established connection is closed
///   through [`DestinationPool::close_connection`] and an error of kind
///   [`ErrorKind::WarmupFailed`] carrying the first captured failure is returned. The pool never
///   receives any of this warm-up's connections.
/// - otherwise every established connection is handed to [`DestinationPool::accept`], in arrival
///   order, and a [`WarmupSummary`] is returned. With `fail_fast` unset this may be anywhere from
///   zero to `target_count` connections.
///
/// The pool is only touched from the calling task, after all attempts have finished.
pub async fn warm_up<E, P>(
    request: &WarmupRequest,
    establisher: Arc<E>,
    pool: &mut P,
) -> Result<WarmupSummary>
where
    E: EstablishConnection,
    P: DestinationPool<Connection = E::Connection> + ?Sized,
{
    request.validate()?;

    let start_time = Instant::now();
    let target_count = request.target_count;
    let worker_count = request.effective_worker_count();
    let emitter = WarmupEventEmitter::new(request);

    emitter.emit_event(|| {
        WarmupStartedEvent {
            pool_name: emitter.pool_name(),
            target_count,
            worker_count,
            fail_fast: request.fail_fast,
        }
        .into()
    });

    let results = Arc::new(ResultCollection::with_capacity(target_count as usize));
    let first_failure = Arc::new(FirstFailureSlot::new());
    let task = EstablishmentTask::new(
        establisher,
        results.clone(),
        first_failure.clone(),
        emitter.clone(),
    );

    WorkerGroup::start(worker_count, Arc::new(TaskQueue::new(target_count)), task)
        .join()
        .await;

    let connections = results.drain();
    // Bounded by `target_count`, so this cannot truncate.
    let established = connections.len() as u32;

    match first_failure.get().cloned() {
        Some(failure) if request.fail_fast => {
            for EstablishedConnection {
                attempt,
                connection,
            } in connections
            {
                pool.close_connection(connection);
                emitter.emit_event(|| {
                    ConnectionClosedEvent {
                        pool_name: emitter.pool_name(),
                        attempt,
                        reason: ConnectionClosedReason::WarmupFailed,
                    }
                    .into()
                });
            }

            emitter.emit_event(|| {
                WarmupFailedEvent {
                    pool_name: emitter.pool_name(),
                    failure: failure.clone(),
                    closed: established,
                    duration: start_time.elapsed(),
                }
                .into()
            });

            Err(ErrorKind::WarmupFailed(failure).into())
        }
        first_failure => {
            for EstablishedConnection { connection, .. } in connections {
                pool.accept(connection);
            }

            let summary = WarmupSummary {
                established,
                failed: target_count - established,
                first_failure,
                duration: start_time.elapsed(),
            };

            emitter.emit_event(|| {
                WarmupSucceededEvent {
                    pool_name: emitter.pool_name(),
                    established: summary.established,
                    failed: summary.failed,
                    duration: summary.duration,
                }
                .into()
            });

            Ok(summary)
        }
    }
}
