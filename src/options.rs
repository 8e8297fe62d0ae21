//! Contains the options that configure a single pool warm-up.

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::{
    error::{Error, Result},
    event::{warmup::WarmupEvent, EventHandler},
};

/// Describes one warm-up: how many connections to establish, how many of them may be established
/// concurrently, and what to do when an attempt fails.
///
/// A request can be assembled with [`WarmupRequest::builder`] or deserialized from configuration
/// using camelCase keys:
///
/// ```rust
/// # use pool_warmup::options::WarmupRequest;
/// let request = WarmupRequest::builder()
///     .target_count(10)
///     .worker_count(4)
///     .fail_fast(false)
///     .pool_name("ldap-primary")
///     .build();
/// assert_eq!(request.effective_worker_count(), 4);
/// ```
#[derive(Clone, Debug, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct WarmupRequest {
    /// The number of connections to establish. Must be at least 1.
    pub target_count: u32,

    /// The number of connection attempts that may be in flight at once. Must be at least 1.
    /// Values larger than `target_count` are clamped to `target_count`.
    pub worker_count: u32,

    /// Whether a single failed connection attempt aborts the warm-up. When `true`, every
    /// connection established during the warm-up is closed and the first captured failure is
    /// returned. When `false`, the pool receives however many connections could be established,
    /// which may be none.
    ///
    /// The default value is `true`.
    #[builder(default = true)]
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,

    /// A label for the pool being warmed up, included in monitoring events and tracing output.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub pool_name: Option<String>,

    /// The handler that should process all warm-up monitoring events.
    #[builder(default, setter(into, strip_option))]
    #[serde(skip)]
    pub event_handler: Option<EventHandler<WarmupEvent>>,
}

fn default_fail_fast() -> bool {
    true
}

impl WarmupRequest {
    /// Checks that both counts are positive.
    pub fn validate(&self) -> Result<()> {
        if self.target_count == 0 {
            return Err(Error::invalid_argument("`target_count` must be at least 1"));
        }

        if self.worker_count == 0 {
            return Err(Error::invalid_argument("`worker_count` must be at least 1"));
        }

        Ok(())
    }

    /// The number of workers that will actually be spawned. A worker never has fewer than one
    /// attempt to run, so there are never more workers than requested connections.
    pub fn effective_worker_count(&self) -> u32 {
        self.worker_count.min(self.target_count)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::WarmupRequest;
    use crate::error::ErrorKind;

    #[test]
    fn builder_defaults() {
        let request = WarmupRequest::builder()
            .target_count(5)
            .worker_count(2)
            .build();

        assert!(request.fail_fast);
        assert_eq!(request.pool_name, None);
        assert!(request.event_handler.is_none());
        request.validate().unwrap();
    }

    #[test]
    fn worker_count_is_clamped() {
        let request = WarmupRequest::builder()
            .target_count(3)
            .worker_count(64)
            .build();
        assert_eq!(request.effective_worker_count(), 3);

        let request = WarmupRequest::builder()
            .target_count(30)
            .worker_count(4)
            .build();
        assert_eq!(request.effective_worker_count(), 4);
    }

    #[test]
    fn zero_counts_are_rejected() {
        let error = WarmupRequest::builder()
            .target_count(0)
            .worker_count(1)
            .build()
            .validate()
            .unwrap_err();
        assert!(matches!(
            error.kind.as_ref(),
            ErrorKind::InvalidArgument { message } if message.contains("target_count")
        ));

        let error = WarmupRequest::builder()
            .target_count(1)
            .worker_count(0)
            .build()
            .validate()
            .unwrap_err();
        assert!(matches!(
            error.kind.as_ref(),
            ErrorKind::InvalidArgument { message } if message.contains("worker_count")
        ));
    }

    #[test]
    fn deserialize_from_config() {
        let request: WarmupRequest = serde_json::from_str(
            r#"{ "targetCount": 8, "workerCount": 3, "poolName": "replica-a" }"#,
        )
        .unwrap();

        assert_eq!(request.target_count, 8);
        assert_eq!(request.worker_count, 3);
        assert!(request.fail_fast);
        assert_eq!(request.pool_name.as_deref(), Some("replica-a"));

        let request: WarmupRequest = serde_json::from_str(
            r#"{ "targetCount": 2, "workerCount": 2, "failFast": false }"#,
        )
        .unwrap();
        assert!(!request.fail_fast);
    }
}
