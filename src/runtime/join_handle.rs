use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::error::{Error, Result};

/// A handle used for awaiting on tasks spawned in `runtime::spawn`.
///
/// Unlike a bare tokio handle, a task that panicked or was aborted resolves to an internal error
/// rather than unwinding into the task awaiting it.
#[derive(Debug)]
pub(crate) struct AsyncJoinHandle<T>(tokio::task::JoinHandle<T>);

impl<T> AsyncJoinHandle<T> {
    pub(crate) fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::runtime::Handle::current();
        AsyncJoinHandle(handle.spawn(fut))
    }

    #[cfg(feature = "sync")]
    pub(crate) fn spawn_blocking<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::runtime::Handle::current();
        AsyncJoinHandle(handle.spawn_blocking(f))
    }

    /// Cancels the task if it has not completed yet.
    pub(crate) fn abort(&self) {
        self.0.abort();
    }
}

impl<T> Future for AsyncJoinHandle<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|result| {
            result.map_err(|join_error| {
                if join_error.is_panic() {
                    Error::internal(format!("background task panicked: {join_error}"))
                } else {
                    Error::internal(format!("background task was cancelled: {join_error}"))
                }
            })
        })
    }
}
