use futures_core::future::BoxFuture;

use crate::error::Result;

/// Contains the logic to establish a single connection, including whatever handshaking and
/// authentication the protocol requires.
///
/// A warm-up calls [`establish`](EstablishConnection::establish) once per requested connection,
/// concurrently from several workers, so implementations must be safe to share across tasks. A
/// failed attempt is final: the warm-up never retries it.
///
/// ```rust
/// # use futures_util::future::{BoxFuture, FutureExt};
/// # use pool_warmup::{error::Result, EstablishConnection};
/// struct TcpEstablisher {
///     address: std::net::SocketAddr,
/// }
///
/// impl EstablishConnection for TcpEstablisher {
///     type Connection = tokio::net::TcpStream;
///
///     fn establish(&self) -> BoxFuture<'_, Result<Self::Connection>> {
///         async move { Ok(tokio::net::TcpStream::connect(self.address).await?) }.boxed()
///     }
/// }
/// ```
pub trait EstablishConnection: Send + Sync + 'static {
    /// The handle to one established connection. Ownership moves from the establisher to the
    /// warm-up, and from there either to the destination pool or back to it for closing.
    type Connection: Send + 'static;

    /// Performs one connection attempt.
    fn establish(&self) -> BoxFuture<'_, Result<Self::Connection>>;
}
