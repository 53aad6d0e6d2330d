//! Metric helpers for `flowexport`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers do nothing.

/// Name of the counter tracking assembled data messages.
pub const MESSAGES_ASSEMBLED: &str = "flowexport_messages_assembled_total";
/// Name of the counter tracking records packed into data messages.
pub const RECORDS_PACKED: &str = "flowexport_records_packed_total";
/// Name of the counter tracking hook failures, labelled by hook name.
pub const HOOK_FAILURES: &str = "flowexport_hook_failures_total";
/// Name of the counter tracking records handed to log sinks.
pub const RECORDS_WRITTEN: &str = "flowexport_records_written_total";

/// Record the outcome of fragmenting one flow group.
#[cfg_attr(not(feature = "metrics"), expect(unused_variables, reason = "metrics disabled"))]
pub fn record_fragmented(messages: usize, records: usize) {
    #[cfg(feature = "metrics")]
    {
        metrics::counter!(MESSAGES_ASSEMBLED).increment(messages as u64);
        metrics::counter!(RECORDS_PACKED).increment(records as u64);
    }
}

/// Record a failed hook.
#[cfg_attr(not(feature = "metrics"), expect(unused_variables, reason = "metrics disabled"))]
pub fn inc_hook_failures(hook: &str) {
    #[cfg(feature = "metrics")]
    metrics::counter!(HOOK_FAILURES, "hook" => hook.to_owned()).increment(1);
}

/// Record a record written to a log sink.
pub fn inc_records_written() {
    #[cfg(feature = "metrics")]
    metrics::counter!(RECORDS_WRITTEN).increment(1);
}
