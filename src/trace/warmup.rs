use crate::{
    event::warmup::{ConnectionClosedReason, WarmupEvent},
    trace::{TracingRepresentation, WARMUP_TRACING_EVENT_TARGET},
};

#[derive(Clone, Debug, Default)]
pub(crate) struct WarmupTracingEventEmitter;

impl WarmupTracingEventEmitter {
    pub(crate) fn new() -> WarmupTracingEventEmitter {
        Self
    }

    pub(crate) fn is_enabled(&self) -> bool {
        tracing::enabled!(target: WARMUP_TRACING_EVENT_TARGET, tracing::Level::DEBUG)
    }

    pub(crate) fn handle(&self, event: WarmupEvent) {
        use WarmupEvent::*;
        match event {
            WarmupStarted(event) => {
                tracing::debug!(
                    target: WARMUP_TRACING_EVENT_TARGET,
                    poolName = event.pool_name.as_deref(),
                    targetCount = event.target_count,
                    workerCount = event.worker_count,
                    failFast = event.fail_fast,
                    "Connection pool warm-up started",
                );
            }
            ConnectionEstablished(event) => {
                tracing::debug!(
                    target: WARMUP_TRACING_EVENT_TARGET,
                    poolName = event.pool_name.as_deref(),
                    attempt = event.attempt,
                    durationMS = event.duration.as_millis(),
                    "Connection established",
                );
            }
            ConnectionAttemptFailed(event) => {
                tracing::debug!(
                    target: WARMUP_TRACING_EVENT_TARGET,
                    poolName = event.pool_name.as_deref(),
                    attempt = event.attempt,
                    error = event.error.tracing_representation(),
                    durationMS = event.duration.as_millis(),
                    "Connection attempt failed",
                );
            }
            ConnectionClosed(event) => {
                tracing::debug!(
                    target: WARMUP_TRACING_EVENT_TARGET,
                    poolName = event.pool_name.as_deref(),
                    attempt = event.attempt,
                    reason = event.reason.tracing_representation(),
                    "Connection closed",
                );
            }
            WarmupSucceeded(event) => {
                tracing::debug!(
                    target: WARMUP_TRACING_EVENT_TARGET,
                    poolName = event.pool_name.as_deref(),
                    established = event.established,
                    failed = event.failed,
                    durationMS = event.duration.as_millis(),
                    "Connection pool warm-up succeeded",
                );
            }
            WarmupFailed(event) => {
                tracing::debug!(
                    target: WARMUP_TRACING_EVENT_TARGET,
                    poolName = event.pool_name.as_deref(),
                    failure = event.failure.tracing_representation(),
                    closed = event.closed,
                    durationMS = event.duration.as_millis(),
                    "Connection pool warm-up failed",
                );
            }
        }
    }
}

impl TracingRepresentation for ConnectionClosedReason {
    type Representation = &'static str;

    fn tracing_representation(&self) -> &'static str {
        match self {
            Self::WarmupFailed => {
                "Another connection attempt failed during a fail-fast warm-up, so every connection \
                 established by the warm-up was discarded"
            }
        }
    }
}
