//! Contains the `Error` and `Result` types that `pool_warmup` uses.

use std::{any::Any, sync::Arc};

use thiserror::Error;

use crate::warmup::FailureRecord;

/// The result type for all methods that can return an error in the `pool_warmup` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `pool_warmup` crate. The inner
/// [`ErrorKind`](enum.ErrorKind.html) is boxed to keep `Result`s small, and every source that
/// cannot be cloned is wrapped in an `Arc` so that the error itself can be cloned.
#[derive(Clone, Debug, Error)]
#[error("Kind: {kind}")]
#[non_exhaustive]
pub struct Error {
    /// The type of error that occurred.
    pub kind: Box<ErrorKind>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    /// Creates an error describing why a single connection attempt failed. Establishers without
    /// a richer error type of their own should use this.
    pub fn establishment(message: impl Into<String>) -> Self {
        ErrorKind::ConnectionEstablishment {
            message: message.into(),
        }
        .into()
    }

    /// Wraps an arbitrary error raised by a connection establisher.
    pub fn custom(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        ErrorKind::Custom(Arc::new(error)).into()
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ErrorKind::InvalidArgument {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        ErrorKind::Internal {
            message: message.into(),
        }
        .into()
    }

    /// Builds the error recorded for an attempt whose establisher panicked.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&'static str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_string()
        };
        ErrorKind::EstablishmentPanicked { message }.into()
    }

    /// Whether this error was returned because a fail-fast warm-up observed a failed connection
    /// attempt.
    pub fn is_warmup_failure(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::WarmupFailed(_))
    }

    /// The failure that aborted the warm-up, if this error is a warm-up failure.
    pub fn failure_record(&self) -> Option<&FailureRecord> {
        match self.kind.as_ref() {
            ErrorKind::WarmupFailed(record) => Some(record),
            _ => None,
        }
    }

    /// Whether this error is an I/O error.
    pub fn is_network_error(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::Io(..))
    }
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        Self::new(err.into())
    }
}

impl From<std::io::Error> for ErrorKind {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

/// The types of errors that can occur.
#[allow(missing_docs)]
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An invalid argument was provided.
    #[error("An invalid argument was provided: {message}")]
    #[non_exhaustive]
    InvalidArgument { message: String },

    /// A single connection attempt failed.
    #[error("Failed to establish a connection: {message}")]
    #[non_exhaustive]
    ConnectionEstablishment { message: String },

    /// Wrapper around [`std::io::Error`].
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),

    /// An error raised by a connection establisher that has no dedicated variant.
    #[error("{0}")]
    Custom(Arc<dyn std::error::Error + Send + Sync>),

    /// The connection establisher panicked while attempting to establish a connection.
    #[error("Connection establisher panicked: {message}")]
    #[non_exhaustive]
    EstablishmentPanicked { message: String },

    /// A fail-fast warm-up observed at least one failed connection attempt. Every connection
    /// established during the warm-up was closed before this error was returned.
    #[error("Connection pool warm-up failed: {0}")]
    WarmupFailed(FailureRecord),

    /// A warm-up worker terminated abnormally, for example because an event handler panicked,
    /// or a background task could not be joined. Attempts the worker never ran are recorded with
    /// this kind.
    #[error("Internal error: {message}")]
    #[non_exhaustive]
    Internal { message: String },
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};

    #[test]
    fn panic_payload_message() {
        let error = Error::from_panic(Box::new("boom"));
        assert!(matches!(
            error.kind.as_ref(),
            ErrorKind::EstablishmentPanicked { message } if message == "boom"
        ));

        let error = Error::from_panic(Box::new(String::from("formatted boom")));
        assert!(matches!(
            error.kind.as_ref(),
            ErrorKind::EstablishmentPanicked { message } if message == "formatted boom"
        ));

        let error = Error::from_panic(Box::new(17_u32));
        assert!(matches!(
            error.kind.as_ref(),
            ErrorKind::EstablishmentPanicked { .. }
        ));
    }

    #[test]
    fn custom_errors_keep_their_message() {
        #[derive(Debug, thiserror::Error)]
        #[error("directory lookup timed out")]
        struct LookupTimeout;

        let error = Error::custom(LookupTimeout);
        assert!(matches!(error.kind.as_ref(), ErrorKind::Custom(_)));
        assert!(error.to_string().contains("directory lookup timed out"));
    }

    #[test]
    fn io_errors_convert() {
        let error: Error =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused").into();
        assert!(error.is_network_error());
        assert!(!error.is_warmup_failure());
        assert!(error.failure_record().is_none());
        assert!(error.to_string().contains("refused"));
    }
}
