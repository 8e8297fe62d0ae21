use std::{
    collections::HashSet,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use futures_util::{future::BoxFuture, FutureExt};

use crate::{
    error::{Error, Result},
    establish::EstablishConnection,
    pool::DestinationPool,
};

/// A connection handle whose id is unique per establisher.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct MockConnection {
    pub(crate) id: u32,
}

/// An establisher whose calls succeed, fail or panic according to their invocation order, and
/// which records how many calls were in flight at once.
#[derive(Debug, Default)]
pub(crate) struct MockEstablisher {
    failing_calls: HashSet<u32>,
    panicking_calls: HashSet<u32>,
    delays: Vec<Duration>,
    default_delay: Duration,
    calls: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
    next_id: AtomicU32,
}

impl MockEstablisher {
    pub(crate) fn succeeding() -> Self {
        Self::default()
    }

    pub(crate) fn failing_calls(calls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            failing_calls: calls.into_iter().collect(),
            ..Default::default()
        }
    }

    pub(crate) fn always_failing(target_count: u32) -> Self {
        Self::failing_calls(0..target_count)
    }

    pub(crate) fn with_panicking_calls(mut self, calls: impl IntoIterator<Item = u32>) -> Self {
        self.panicking_calls = calls.into_iter().collect();
        self
    }

    /// Every call sleeps for `delay` before completing.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// The call with invocation index `i` sleeps for `delays[i]`, falling back to the default
    /// delay past the end.
    pub(crate) fn with_delays(mut self, delays: Vec<Duration>) -> Self {
        self.delays = delays;
        self
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl EstablishConnection for MockEstablisher {
    type Connection = MockConnection;

    fn establish(&self) -> BoxFuture<'_, Result<MockConnection>> {
        async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

            let delay = self
                .delays
                .get(call as usize)
                .copied()
                .unwrap_or(self.default_delay);
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panicking_calls.contains(&call) {
                panic!("establisher exploded on call {call}");
            }
            if self.failing_calls.contains(&call) {
                return Err(Error::establishment(format!("call {call} was refused")));
            }

            Ok(MockConnection {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
            })
        }
        .boxed()
    }
}

/// A pool that remembers every connection it accepted or closed.
#[derive(Debug, Default)]
pub(crate) struct MockPool {
    pub(crate) accepted: Vec<MockConnection>,
    pub(crate) closed: Vec<MockConnection>,
}

impl MockPool {
    /// Asserts that no connection reached the pool twice, whether accepted or closed.
    pub(crate) fn assert_no_duplicates(&self) {
        let ids: HashSet<_> = self
            .accepted
            .iter()
            .chain(self.closed.iter())
            .map(|connection| connection.id)
            .collect();
        assert_eq!(ids.len(), self.accepted.len() + self.closed.len());
    }
}

impl DestinationPool for MockPool {
    type Connection = MockConnection;

    fn accept(&mut self, connection: MockConnection) {
        self.accepted.push(connection);
    }

    fn close_connection(&mut self, connection: MockConnection) {
        self.closed.push(connection);
    }
}
