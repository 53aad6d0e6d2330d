//! Output routing.
//!
//! [`OutputRouter`] prepares one route per configured output. Log routes
//! pass records through their hook chain before a [`LogSink`] writes them;
//! collector routes hand protocol messages to a [`CollectorSink`].

pub mod error;
pub mod router;
pub mod sink;

pub use error::SinkError;
pub use router::{DeliveryReport, DispatchReport, OutputRouter, Route};
pub use sink::{CollectorSink, JsonLinesSink, LogSink};

#[cfg(test)]
mod tests;
