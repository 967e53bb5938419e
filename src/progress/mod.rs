//! Progress reporting for pipeline runs

mod handler;

pub use handler::{LoggingHandler, NoOpHandler, ProgressHandler};
