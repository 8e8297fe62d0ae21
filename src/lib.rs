//! This crate warms up connection pools: before a pool serves its first request, it establishes a
//! configured number of connections with bounded parallelism and hands them to the pool, so that
//! the cost of connecting is paid once, up front.
//!
//! The crate is built on [`tokio`]. It contains a fully async API ([`warm_up`]) and, behind the
//! `"sync"` feature flag, a blocking API ([`sync::warm_up`](crate::sync)) for establishers that
//! perform blocking I/O.
//!
//! # Installation
//!
//! ```toml
//! [dependencies]
//! pool-warmup = "0.1.0"
//! ```
//!
//! ### All Feature flags
//!
//! | Feature            | Description                                                                  | Default |
//! |:-------------------|:-----------------------------------------------------------------------------|:--------|
//! | `sync`             | Expose the blocking API (`pool_warmup::sync`), backed by a crate-owned tokio runtime. | no |
//! | `tracing-unstable` | Emit warm-up events as [`tracing`](https://crates.io/crates/tracing) events. | no      |
//!
//! # Example Usage
//!
//! A warm-up needs three things: a [`options::WarmupRequest`] describing how many connections to
//! establish and how many attempts may run at once, an [`EstablishConnection`] that performs one
//! attempt, and a [`DestinationPool`] that receives the results.
//!
//! ```rust
//! # use std::{collections::VecDeque, sync::Arc};
//! # use futures_util::future::{BoxFuture, FutureExt};
//! # use pool_warmup::{error::Result, options::WarmupRequest, warm_up, EstablishConnection};
//! struct Loopback;
//!
//! impl EstablishConnection for Loopback {
//!     type Connection = u32;
//!
//!     fn establish(&self) -> BoxFuture<'_, Result<u32>> {
//!         async { Ok(7) }.boxed()
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let request = WarmupRequest::builder()
//!     .target_count(8)
//!     .worker_count(4)
//!     .build();
//! let mut available = VecDeque::new();
//!
//! let summary = warm_up(&request, Arc::new(Loopback), &mut available).await?;
//! assert_eq!(summary.established, 8);
//! assert_eq!(available.len(), 8);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure handling
//!
//! Every attempt runs to completion, even after another attempt has failed. With
//! [`fail_fast`](options::WarmupRequest::fail_fast) set (the default), a single failure closes
//! every connection the warm-up established and returns an error of kind
//! [`ErrorKind::WarmupFailed`](error::ErrorKind::WarmupFailed). Otherwise the pool receives
//! whatever could be established and the [`WarmupSummary`] reports how many attempts failed.
//!
//! ## Monitoring
//!
//! Progress can be observed by registering an
//! [`EventHandler`](event::EventHandler) on the request; see the [`event::warmup`] module for the
//! events emitted.

#![warn(missing_docs)]
#![cfg_attr(docsrs, warn(rustdoc::missing_crate_level_docs))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/pool-warmup/0.1.0")]

pub mod error;
pub mod event;
pub mod options;

mod establish;
mod pool;
mod runtime;
#[cfg(feature = "sync")]
#[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
pub mod sync;
#[cfg(test)]
mod test;
#[cfg(feature = "tracing-unstable")]
mod trace;
mod warmup;

pub use crate::{
    establish::EstablishConnection,
    pool::DestinationPool,
    warmup::{warm_up, FailureRecord, WarmupSummary},
};
