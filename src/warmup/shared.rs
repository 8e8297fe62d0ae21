use std::{
    collections::VecDeque,
    sync::{Mutex, OnceLock, PoisonError},
};

use super::FailureRecord;

/// A connection that was established during the warm-up, tagged with the attempt that produced
/// it.
#[derive(Debug)]
pub(crate) struct EstablishedConnection<C> {
    pub(crate) attempt: u32,
    pub(crate) connection: C,
}

/// The connections established so far, in arrival order. Supports only appending and draining.
///
/// The lock is never held across an await point, so a plain mutex is enough. None of the critical
/// sections can leave the buffer in an inconsistent state, so a poisoned lock is simply
/// recovered.
#[derive(Debug)]
pub(crate) struct ResultCollection<C> {
    connections: Mutex<Vec<EstablishedConnection<C>>>,
}

impl<C> ResultCollection<C> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            connections: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub(crate) fn append(&self, connection: EstablishedConnection<C>) {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(connection);
    }

    /// Removes and returns every connection collected so far, leaving the collection empty.
    pub(crate) fn drain(&self) -> Vec<EstablishedConnection<C>> {
        std::mem::take(&mut *self.connections.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Retains the first failure recorded by any attempt. Later writes are ignored; which of several
/// simultaneous failures wins is unspecified.
#[derive(Debug, Default)]
pub(crate) struct FirstFailureSlot {
    failure: OnceLock<FailureRecord>,
}

impl FirstFailureSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `failure` if the slot is empty. Returns whether it was stored.
    pub(crate) fn set_if_absent(&self, failure: FailureRecord) -> bool {
        self.failure.set(failure).is_ok()
    }

    pub(crate) fn get(&self) -> Option<&FailureRecord> {
        self.failure.get()
    }
}

/// The attempts waiting for a worker. Filled with exactly `target_count` attempt indices when
/// created and never grown afterwards.
#[derive(Debug)]
pub(crate) struct TaskQueue {
    attempts: Mutex<VecDeque<u32>>,
}

impl TaskQueue {
    pub(crate) fn new(target_count: u32) -> Self {
        Self {
            attempts: Mutex::new((0..target_count).collect()),
        }
    }

    /// Pops the next attempt to run, if any remain.
    pub(crate) fn next(&self) -> Option<u32> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    /// Removes every attempt that no worker picked up.
    pub(crate) fn drain_remaining(&self) -> Vec<u32> {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use std::{collections::HashSet, sync::Arc};

    use pretty_assertions::assert_eq;

    use super::{EstablishedConnection, FirstFailureSlot, ResultCollection, TaskQueue};
    use crate::{error::Error, warmup::FailureRecord};

    #[test]
    fn first_failure_wins() {
        let slot = FirstFailureSlot::new();
        assert!(slot.get().is_none());

        assert!(slot.set_if_absent(FailureRecord::new(3, Error::establishment("first"))));
        assert!(!slot.set_if_absent(FailureRecord::new(1, Error::establishment("second"))));

        assert_eq!(slot.get().map(|failure| failure.attempt), Some(3));
    }

    #[test]
    fn concurrent_failures_retain_exactly_one() {
        let slot = Arc::new(FirstFailureSlot::new());

        let stored: u32 = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|attempt| {
                    let slot = slot.clone();
                    scope.spawn(move || {
                        slot.set_if_absent(FailureRecord::new(
                            attempt,
                            Error::establishment("refused"),
                        ))
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| u32::from(handle.join().unwrap()))
                .sum()
        });

        assert_eq!(stored, 1);
        assert!(slot.get().unwrap().attempt < 16);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let results = Arc::new(ResultCollection::with_capacity(64));

        std::thread::scope(|scope| {
            for thread in 0..8_u32 {
                let results = results.clone();
                scope.spawn(move || {
                    for i in 0..8 {
                        let attempt = thread * 8 + i;
                        results.append(EstablishedConnection {
                            attempt,
                            connection: attempt,
                        });
                    }
                });
            }
        });

        assert_eq!(results.len(), 64);
        let drained = results.drain();
        assert_eq!(results.len(), 0);

        let unique: HashSet<_> = drained.iter().map(|c| c.connection).collect();
        assert_eq!(unique.len(), 64);
    }

    #[test]
    fn queue_hands_out_each_attempt_once() {
        let queue = TaskQueue::new(4);
        assert_eq!(queue.next(), Some(0));
        assert_eq!(queue.next(), Some(1));
        assert_eq!(queue.drain_remaining(), vec![2, 3]);
        assert_eq!(queue.next(), None);
        assert!(queue.drain_remaining().is_empty());
    }
}
