use std::collections::VecDeque;

/// The pool that receives the connections established by a warm-up.
///
/// The pool is only ever touched by the task that called `warm_up`, after every connection
/// attempt has finished, so implementations need no internal synchronization.
pub trait DestinationPool {
    /// The handle type stored by the pool.
    type Connection;

    /// Takes ownership of an established connection.
    fn accept(&mut self, connection: Self::Connection);

    /// Forcibly closes a connection that was established but will never be handed to the pool.
    fn close_connection(&mut self, connection: Self::Connection);
}

/// A queue of available connections, oldest first. Closing a connection drops its handle.
impl<C> DestinationPool for VecDeque<C> {
    type Connection = C;

    fn accept(&mut self, connection: C) {
        self.push_back(connection);
    }

    fn close_connection(&mut self, connection: C) {
        drop(connection);
    }
}
