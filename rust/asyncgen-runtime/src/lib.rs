//! # asyncgen-runtime
//!
//! Small concurrency runtime shared by generated protocol clients.
//!
//! - [`WorkerGroup`] runs named tasks, turns a panicking task into a
//!   [`WorkerError`] and reports every failure together on [`WorkerGroup::wait`].
//! - [`FanOut`] delivers each value to every live subscriber.
//! - [`FanIn`] merges many sources into one receiver.

pub mod error;
pub mod fan;
pub mod worker;

pub use error::{GroupError, WorkerError};
pub use fan::{FanIn, FanOut};
pub use worker::{WorkerConfig, WorkerGroup};
