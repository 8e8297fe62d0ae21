//! Contains the events and functionality for monitoring the progress of a pool warm-up.

pub mod warmup;

use std::sync::Arc;

use futures_core::future::BoxFuture;

/// A destination for events. Allows implicit conversion via [`From`] for concrete types for
/// convenience with [`crate::options::WarmupRequest`] construction:
///
/// ```rust
/// # use pool_warmup::options::WarmupRequest;
/// # async fn example() {
/// let (tx, mut rx) = tokio::sync::mpsc::channel(100);
/// tokio::spawn(async move {
///     while let Some(ev) = rx.recv().await {
///         println!("{:?}", ev);
///     }
/// });
/// let request = WarmupRequest::builder()
///     .target_count(4)
///     .worker_count(2)
///     .event_handler(tx)
///     .build();
/// # }
/// ```
///
/// or explicit construction for `Fn` traits:
///
/// ```rust
/// # use pool_warmup::{event::EventHandler, options::WarmupRequest};
/// let request = WarmupRequest::builder()
///     .target_count(4)
///     .worker_count(2)
///     .event_handler(EventHandler::callback(|ev| println!("{:?}", ev)))
///     .build();
/// ```
#[derive(Clone)]
#[non_exhaustive]
pub enum EventHandler<T> {
    /// A callback.
    Callback(Arc<dyn Fn(T) + Sync + Send>),
    /// An async callback.
    AsyncCallback(Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Sync + Send>),
    /// A `tokio` channel sender.
    TokioMpsc(tokio::sync::mpsc::Sender<T>),
}

impl<T> std::fmt::Debug for EventHandler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EventHandler").finish()
    }
}

impl<T> From<tokio::sync::mpsc::Sender<T>> for EventHandler<T> {
    fn from(value: tokio::sync::mpsc::Sender<T>) -> Self {
        Self::TokioMpsc(value)
    }
}

impl<T: Send + Sync + 'static> EventHandler<T> {
    /// Construct a new event handler with a callback.
    pub fn callback(f: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(f))
    }

    /// Construct a new event handler with an async callback.
    pub fn async_callback(f: impl Fn(T) -> BoxFuture<'static, ()> + Send + Sync + 'static) -> Self {
        Self::AsyncCallback(Arc::new(f))
    }

    /// Must be called from within a tokio runtime, since the async variants spawn a task to
    /// deliver the event.
    pub(crate) fn handle(&self, event: T) {
        match self {
            Self::Callback(cb) => (cb)(event),
            Self::AsyncCallback(cb) => {
                crate::runtime::execute((cb)(event));
            }
            Self::TokioMpsc(sender) => {
                let sender = sender.clone();
                crate::runtime::execute(async move {
                    let _ = sender.send(event).await;
                });
            }
        }
    }
}
