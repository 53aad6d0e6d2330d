//! Test doubles and fixtures for `flowexport`.
//!
//! Hook executors here never spawn processes, and the in-memory sink
//! captures whatever the output router would have written or sent, so
//! routing and chain behaviour can be asserted directly.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use flowexport::OutputRouter;
//! use flowexport_testing::{MemorySink, StaticExecutor, fixtures};
//!
//! let config = fixtures::exporter_config();
//! let router = OutputRouter::new(&config, Arc::new(StaticExecutor::default()));
//! let sink: MemorySink = MemorySink::default();
//! router.dispatch_records(&[fixtures::record(serde_json::json!({"a": 1}))], &sink);
//! assert_eq!(sink.records().len(), 1);
//! ```

pub mod executors;
pub mod fixtures;
pub mod logging;
pub mod sinks;

pub use executors::{FailingExecutor, RecordingExecutor, StaticExecutor};
pub use logging::{LoggerHandle, logger};
pub use sinks::{Delivery, MemorySink};
