use std::{panic::AssertUnwindSafe, sync::Arc, time::Instant};

use derive_where::derive_where;
use futures_util::FutureExt;

use super::{
    shared::{EstablishedConnection, FirstFailureSlot, ResultCollection},
    FailureRecord,
};
use crate::{
    error::Error,
    establish::EstablishConnection,
    event::warmup::{ConnectionAttemptFailedEvent, ConnectionEstablishedEvent, WarmupEventEmitter},
};

/// The unit of work run by the workers: one connection attempt, whose outcome is recorded in the
/// shared result collection or the first-failure slot. Every worker holds a clone; all clones
/// share the same establisher and the same shared state.
#[derive_where(Clone, Debug)]
pub(crate) struct EstablishmentTask<E: EstablishConnection> {
    #[derive_where(skip(Debug))]
    establisher: Arc<E>,

    #[derive_where(skip(Debug))]
    results: Arc<ResultCollection<E::Connection>>,

    first_failure: Arc<FirstFailureSlot>,

    emitter: WarmupEventEmitter,
}

impl<E: EstablishConnection> EstablishmentTask<E> {
    pub(crate) fn new(
        establisher: Arc<E>,
        results: Arc<ResultCollection<E::Connection>>,
        first_failure: Arc<FirstFailureSlot>,
        emitter: WarmupEventEmitter,
    ) -> Self {
        Self {
            establisher,
            results,
            first_failure,
            emitter,
        }
    }

    /// Runs attempt number `attempt`. Never fails: a failed attempt, including one whose
    /// establisher panicked, is recorded rather than propagated.
    pub(crate) async fn run(&self, attempt: u32) {
        let start_time = Instant::now();
        let establisher = &self.establisher;
        let result = AssertUnwindSafe(async move { establisher.establish().await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(Error::from_panic(panic)));
        let duration = start_time.elapsed();

        match result {
            Ok(connection) => {
                self.results.append(EstablishedConnection {
                    attempt,
                    connection,
                });
                self.emitter.emit_event(|| {
                    ConnectionEstablishedEvent {
                        pool_name: self.emitter.pool_name(),
                        attempt,
                        duration,
                    }
                    .into()
                });
            }
            Err(error) => {
                self.record_failure(attempt, error.clone());
                self.emitter.emit_event(|| {
                    ConnectionAttemptFailedEvent {
                        pool_name: self.emitter.pool_name(),
                        attempt,
                        error,
                        duration,
                    }
                    .into()
                });
            }
        }
    }

    /// Records a failed attempt. Only the first failure recorded by any task is kept.
    pub(crate) fn record_failure(&self, attempt: u32, error: Error) {
        self.first_failure.set_if_absent(FailureRecord::new(attempt, error));
    }
}
