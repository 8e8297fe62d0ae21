//! Contains the events and functionality for monitoring a connection pool warm-up.

use std::time::Duration;

use derive_more::Display;
use derive_where::derive_where;

#[cfg(feature = "tracing-unstable")]
use crate::trace::warmup::WarmupTracingEventEmitter;
use crate::{error::Error, event::EventHandler, options::WarmupRequest, warmup::FailureRecord};

/// Event emitted when a warm-up begins, before any connection attempt is dispatched.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct WarmupStartedEvent {
    /// The label of the pool being warmed up, if one was configured.
    pub pool_name: Option<String>,

    /// The number of connections the warm-up will attempt to establish.
    pub target_count: u32,

    /// The number of workers used, after clamping to `target_count`.
    pub worker_count: u32,

    /// Whether a single failed attempt aborts the warm-up.
    pub fail_fast: bool,
}

/// Event emitted when a single connection attempt succeeds.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct ConnectionEstablishedEvent {
    /// The label of the pool being warmed up, if one was configured.
    pub pool_name: Option<String>,

    /// The zero-based index of the attempt. Indices are assigned in submission order and say
    /// nothing about completion order.
    pub attempt: u32,

    /// How long the attempt took.
    pub duration: Duration,
}

/// Event emitted when a single connection attempt fails.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct ConnectionAttemptFailedEvent {
    /// The label of the pool being warmed up, if one was configured.
    pub pool_name: Option<String>,

    /// The zero-based index of the attempt.
    pub attempt: u32,

    /// Why the attempt failed.
    pub error: Error,

    /// How long the attempt took.
    pub duration: Duration,
}

/// Event emitted when a connection established during the warm-up is closed before it ever
/// reaches the pool.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct ConnectionClosedEvent {
    /// The label of the pool being warmed up, if one was configured.
    pub pool_name: Option<String>,

    /// The zero-based index of the attempt that established the connection.
    pub attempt: u32,

    /// Why the connection was closed.
    pub reason: ConnectionClosedReason,
}

/// The reasons a connection may be closed during a warm-up.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConnectionClosedReason {
    /// A fail-fast warm-up failed, so every connection it established was discarded.
    #[display("warmupFailed")]
    WarmupFailed,
}

/// Event emitted when a warm-up completes and its connections have been handed to the pool.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct WarmupSucceededEvent {
    /// The label of the pool being warmed up, if one was configured.
    pub pool_name: Option<String>,

    /// The number of connections transferred to the pool.
    pub established: u32,

    /// The number of attempts that failed. Only non-zero for best-effort warm-ups.
    pub failed: u32,

    /// How long the whole warm-up took.
    pub duration: Duration,
}

/// Event emitted when a fail-fast warm-up is aborted.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct WarmupFailedEvent {
    /// The label of the pool being warmed up, if one was configured.
    pub pool_name: Option<String>,

    /// The failure reported to the caller.
    pub failure: FailureRecord,

    /// The number of successfully established connections that were closed.
    pub closed: u32,

    /// How long the whole warm-up took.
    pub duration: Duration,
}

/// Usage of this event is unstable and may change in minor version updates.
#[derive(Clone, Debug, derive_more::From)]
#[non_exhaustive]
pub enum WarmupEvent {
    /// A warm-up started.
    WarmupStarted(WarmupStartedEvent),

    /// A connection attempt succeeded.
    ConnectionEstablished(ConnectionEstablishedEvent),

    /// A connection attempt failed.
    ConnectionAttemptFailed(ConnectionAttemptFailedEvent),

    /// An established connection was discarded.
    ConnectionClosed(ConnectionClosedEvent),

    /// A warm-up completed.
    WarmupSucceeded(WarmupSucceededEvent),

    /// A fail-fast warm-up was aborted.
    WarmupFailed(WarmupFailedEvent),
}

/// Forwards warm-up events to the user's handler and, when enabled, to tracing.
#[derive(Clone)]
#[derive_where(Debug)]
pub(crate) struct WarmupEventEmitter {
    pool_name: Option<String>,

    #[derive_where(skip)]
    user_handler: Option<EventHandler<WarmupEvent>>,

    #[cfg(feature = "tracing-unstable")]
    #[derive_where(skip)]
    tracing_emitter: WarmupTracingEventEmitter,
}

impl WarmupEventEmitter {
    pub(crate) fn new(request: &WarmupRequest) -> Self {
        Self {
            pool_name: request.pool_name.clone(),
            user_handler: request.event_handler.clone(),
            #[cfg(feature = "tracing-unstable")]
            tracing_emitter: WarmupTracingEventEmitter::new(),
        }
    }

    pub(crate) fn pool_name(&self) -> Option<String> {
        self.pool_name.clone()
    }

    #[cfg(feature = "tracing-unstable")]
    fn should_emit(&self) -> bool {
        self.user_handler.is_some() || self.tracing_emitter.is_enabled()
    }

    #[cfg(not(feature = "tracing-unstable"))]
    fn should_emit(&self) -> bool {
        self.user_handler.is_some()
    }

    /// Events are only constructed when something will consume them.
    pub(crate) fn emit_event(&self, generate_event: impl FnOnce() -> WarmupEvent) {
        if !self.should_emit() {
            return;
        }

        let event = generate_event();

        #[cfg(feature = "tracing-unstable")]
        self.tracing_emitter.handle(event.clone());

        if let Some(ref handler) = self.user_handler {
            handler.handle(event);
        }
    }
}
