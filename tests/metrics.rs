#![cfg(feature = "metrics")]
//! Tests for `flowexport` metrics.
//!
//! These tests verify that counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.
use std::{collections::HashMap, sync::Arc};

use flowexport::{Config, OutputRouter, SequenceNumber};
use flowexport_testing::{FailingExecutor, MemorySink, StaticExecutor, fixtures};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use rstest::rstest;

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

/// Counter values by name from a single snapshot.
///
/// Taking a snapshot drains the recorder, so each test reads it once.
fn counters(snapshotter: &Snapshotter) -> HashMap<String, u64> {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(c) => Some((key.key().name().to_owned(), c)),
            _ => None,
        })
        .collect()
}

fn assert_counter_eq(counters: &HashMap<String, u64>, name: &str, expected: u64) {
    assert_eq!(
        counters.get(name).copied(),
        Some(expected),
        "expected {name} == {expected}, got {counters:#?}"
    );
}

#[rstest]
#[case(12, 3)]
#[case(5, 1)]
#[case(1, 1)]
fn fragmentation_counts_messages_and_records(#[case] records: u64, #[case] messages: u64) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let config = fixtures::exporter_config();

    metrics::with_local_recorder(&recorder, || {
        fixtures::timestamp_flows(records)
            .into_data_messages(&config, SequenceNumber::default())
            .expect("fragmentation succeeds");
    });

    let snapshot = counters(&snapshotter);
    assert_counter_eq(&snapshot, flowexport::MESSAGES_ASSEMBLED, messages);
    assert_counter_eq(&snapshot, flowexport::RECORDS_PACKED, records);
}

#[test]
fn hook_failure_metric_is_labelled_with_hook_name() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let config: Config = fixtures::exporter_config();
    let router = OutputRouter::new(
        &config,
        Arc::new(FailingExecutor::new(StaticExecutor::default()).fail("add-stamp")),
    );
    let sink: MemorySink = MemorySink::default();

    metrics::with_local_recorder(&recorder, || {
        router.dispatch_records(&fixtures::timestamps(2), &sink);
    });

    let metrics = snapshotter.snapshot().into_vec();
    let found = metrics.iter().any(|(k, _, _, v)| {
        k.key().name() == flowexport::HOOK_FAILURES
            && k.key()
                .labels()
                .any(|l| l.key() == "hook" && l.value() == "stamp")
            && matches!(v, DebugValue::Counter(2))
    });
    assert!(found, "hook failure metric not recorded: {metrics:#?}");
}

#[test]
fn written_records_are_counted() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let config = fixtures::exporter_config();
    let router = OutputRouter::new(&config, Arc::new(StaticExecutor::default()));
    let sink: MemorySink = MemorySink::default();

    metrics::with_local_recorder(&recorder, || {
        router.dispatch_records(&fixtures::timestamps(3), &sink);
    });

    assert_counter_eq(&counters(&snapshotter), flowexport::RECORDS_WRITTEN, 3);
}
