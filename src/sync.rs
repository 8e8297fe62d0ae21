//! Contains the blocking API. This is only available when the `sync` feature is enabled.
//!
//! The blocking API drives the same warm-up as [`crate::warm_up`] on a runtime owned by this
//! crate. Each connection attempt runs on that runtime's blocking thread pool, so at most
//! [`WarmupRequest::effective_worker_count`] attempts run in parallel on real threads.


use std::{
    marker::PhantomData,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, LazyLock},
};

use futures_util::{future::BoxFuture, FutureExt};

use crate::{
    error::{Error, Result},
    establish::EstablishConnection,
    options::WarmupRequest,
    pool::DestinationPool,
    runtime,
    warmup::WarmupSummary,
};

pub(crate) static TOKIO_RUNTIME: LazyLock<tokio::runtime::Runtime> =
    LazyLock::new(|| match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => panic!(
            "Error occurred when starting the underlying async runtime: {}",
            err
        ),
    });

/// Establishes the initial connections of a pool using a blocking connection function.
///
/// `establish_one` is called once per requested connection, from up to
/// `request.effective_worker_count()` threads at once. This blocks the calling thread until every
/// attempt has finished, and otherwise behaves exactly like [`crate::warm_up`]. A panic in
/// `establish_one` is recorded as a failed attempt.
///
/// This must not be called from within an async runtime.
///
/// ```rust
/// # use std::collections::VecDeque;
/// # use pool_warmup::{error::Result, options::WarmupRequest};
/// # fn main() -> Result<()> {
/// let request = WarmupRequest::builder()
///     .target_count(4)
///     .worker_count(2)
///     .build();
/// let mut available = VecDeque::new();
///
/// let summary = pool_warmup::sync::warm_up(
///     &request,
///     || Ok(std::net::TcpListener::bind("127.0.0.1:0")?),
///     &mut available,
/// )?;
/// assert_eq!(summary.established, 4);
/// # Ok(())
/// # }
/// ```
pub fn warm_up<F, C, P>(
    request: &WarmupRequest,
    establish_one: F,
    pool: &mut P,
) -> Result<WarmupSummary>
where
    F: Fn() -> Result<C> + Send + Sync + 'static,
    C: Send + 'static,
    P: DestinationPool<Connection = C> + ?Sized,
{
    let establisher = Arc::new(BlockingEstablisher::new(establish_one));
    runtime::block_on(crate::warm_up(request, establisher, pool))
}

/// Runs a blocking connection function on the blocking thread pool.
struct BlockingEstablisher<F, C> {
    establish_one: Arc<F>,
    _connection: PhantomData<fn() -> C>,
}

impl<F, C> BlockingEstablisher<F, C> {
    fn new(establish_one: F) -> Self {
        Self {
            establish_one: Arc::new(establish_one),
            _connection: PhantomData,
        }
    }
}

impl<F, C> EstablishConnection for BlockingEstablisher<F, C>
where
    F: Fn() -> Result<C> + Send + Sync + 'static,
    C: Send + 'static,
{
    type Connection = C;

    fn establish(&self) -> BoxFuture<'_, Result<C>> {
        let establish_one = self.establish_one.clone();
        async move {
            // The panic surfaces on another thread, so it must be caught there.
            runtime::spawn_blocking(move || {
                panic::catch_unwind(AssertUnwindSafe(|| (*establish_one)()))
                    .unwrap_or_else(|payload| Err(Error::from_panic(payload)))
            })
            .await?
        }
        .boxed()
    }
}
