mod join_handle;

use std::future::Future;

pub(crate) use self::join_handle::AsyncJoinHandle;
use crate::error::Result;

/// Spawn a task in the background to run a future.
///
/// This must be called from an async block or function running on a runtime.
pub(crate) fn spawn<F, O>(fut: F) -> AsyncJoinHandle<O>
where
    F: Future<Output = O> + Send + 'static,
    O: Send + 'static,
{
    AsyncJoinHandle::spawn(fut)
}

/// Spawn a task in the background to run a future, without keeping a handle to it.
///
/// Note: this must only be called from an async block or function running on a runtime.
pub(crate) fn execute<F, O>(fut: F)
where
    F: Future<Output = O> + Send + 'static,
    O: Send + 'static,
{
    spawn(fut);
}

/// Run a blocking closure on the runtime's blocking thread pool and wait for its result.
#[cfg(feature = "sync")]
pub(crate) async fn spawn_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    AsyncJoinHandle::spawn_blocking(f).await
}

/// Run a future to completion on the crate-owned runtime, blocking the current thread.
#[cfg(feature = "sync")]
pub(crate) fn block_on<F, T>(fut: F) -> T
where
    F: Future<Output = T>,
{
    crate::sync::TOKIO_RUNTIME.block_on(fut)
}

/// Await every handle, collecting each task's outcome in the order the handles were given.
///
/// The handles are borrowed so that their owner can still abort the tasks if this future is
/// dropped before they complete.
pub(crate) async fn join_all<'a, T: 'a>(
    handles: impl IntoIterator<Item = &'a mut AsyncJoinHandle<T>>,
) -> Vec<Result<T>> {
    futures_util::future::join_all(handles).await
}
