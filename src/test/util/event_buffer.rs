use std::sync::{Arc, Mutex};

use crate::event::{warmup::WarmupEvent, EventHandler};

/// A buffer of events that can be registered as an event handler and queried after the fact.
#[derive(Clone, Debug)]
pub(crate) struct EventBuffer<T = WarmupEvent> {
    events: Arc<Mutex<Vec<T>>>,
}

impl<T> EventBuffer<T> {
    pub(crate) fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn filter_map<R>(&self, f: impl Fn(&T) -> Option<R>) -> Vec<R> {
        self.events.lock().unwrap().iter().filter_map(f).collect()
    }

    pub(crate) fn push_event(&self, ev: T) {
        self.events.lock().unwrap().push(ev);
    }
}

impl<T: Clone> EventBuffer<T> {
    /// Returns a list of current events.
    pub(crate) fn all(&self) -> Vec<T> {
        self.events.lock().unwrap().clone()
    }
}

impl<T: Clone + Send + Sync + 'static> EventBuffer<T> {
    pub(crate) fn handler<V: Into<T> + Send + Sync + 'static>(&self) -> EventHandler<V> {
        let this = self.clone();
        EventHandler::callback(move |ev: V| this.push_event(ev.into()))
    }
}

impl EventBuffer<WarmupEvent> {
    /// Counts the buffered events matching `predicate`.
    pub(crate) fn count(&self, predicate: impl Fn(&WarmupEvent) -> bool) -> usize {
        self.filter_map(|ev| predicate(ev).then_some(())).len()
    }
}
