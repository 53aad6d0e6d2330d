//! Unit tests for output routing and the JSON-lines sink.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tracing_test::traced_test;

use super::*;
use crate::{
    Record,
    config::{CollectorOutput, Config, LogOutput, Output},
    hook::{Hook, HookBackend, HookError, HookExecutor},
    message::{FlowDataMessage, FlowSet, Header, SequenceNumber, TemplateMessage},
    template::TemplateId,
};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Tags records with the command string; fails records whose `id` equals
/// the command `"fail-<id>"`.
struct TagExecutor;

impl HookExecutor for TagExecutor {
    fn execute(&self, backend: &HookBackend, mut record: Record) -> Result<Record, HookError> {
        let (HookBackend::Command(tag) | HookBackend::Shell(tag)) = backend;
        let id = record.get("id").and_then(Value::as_u64).unwrap_or_default();
        if *tag == format!("fail-{id}") {
            return Err(HookError::Backend(format!("rejected {id}")));
        }
        record.insert("tag".into(), Value::String(tag.clone()));
        Ok(record)
    }
}

#[derive(Default)]
struct MemorySink {
    writes: Mutex<Vec<(PathBuf, Record)>>,
}

impl MemorySink {
    fn writes(&self) -> Vec<(PathBuf, Record)> { self.writes.lock().expect("writes lock").clone() }
}

impl LogSink for MemorySink {
    fn write(&self, path: &Path, record: &Record) -> Result<(), SinkError> {
        self.writes
            .lock()
            .expect("writes lock")
            .push((path.to_path_buf(), record.clone()));
        Ok(())
    }
}

fn log_output(file: &str, hooks: &[(&str, &str)]) -> Output {
    Output::Log(LogOutput {
        file: PathBuf::from(file),
        hooks: hooks
            .iter()
            .map(|(name, tag)| Hook::new(*name, HookBackend::Command((*tag).into())))
            .collect(),
    })
}

fn collector_output(remote: &str) -> Output {
    Output::Collector(CollectorOutput {
        remote_address: remote.into(),
        local_address: String::new(),
    })
}

#[fixture]
fn router() -> OutputRouter {
    let config = Config {
        outputs: vec![
            collector_output("10.0.0.9:2100"),
            log_output("/var/log/a.json", &[("first", "a"), ("second", "fail-2")]),
            log_output("/var/log/b.json", &[("only", "b")]),
        ],
        ..Config::default()
    };
    OutputRouter::new(&config, Arc::new(TagExecutor))
}

#[rstest]
fn routes_follow_configuration_order(router: OutputRouter) {
    let kinds: Vec<_> = router
        .routes()
        .iter()
        .map(|route| match route {
            Route::Collector(_) => "collector",
            Route::Log { chain, .. } if chain.len() == 2 => "log2",
            Route::Log { .. } => "log",
        })
        .collect();
    assert_eq!(kinds, vec!["collector", "log2", "log"]);
}

#[rstest]
#[traced_test]
fn hook_failure_drops_record_for_that_output_only(router: OutputRouter) {
    let sink = MemorySink::default();
    let records = vec![record(json!({"id": 1})), record(json!({"id": 2}))];

    let reports = router.dispatch_records(&records, &sink);

    assert_eq!(
        reports,
        vec![
            DispatchReport {
                output: 1,
                written: 1,
                dropped: 1,
                failed: 0,
            },
            DispatchReport {
                output: 2,
                written: 2,
                dropped: 0,
                failed: 0,
            },
        ]
    );
    let writes = sink.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0].0, PathBuf::from("/var/log/a.json"));
    assert_eq!(writes[0].1, record(json!({"id": 1, "tag": "fail-2"})));
    assert!(
        writes[1..]
            .iter()
            .all(|(path, rec)| path == Path::new("/var/log/b.json") && rec["tag"] == "b")
    );
    assert!(logs_contain("hook failed; record dropped"));
    assert!(logs_contain("second"));
}

struct BrokenSink;

impl LogSink for BrokenSink {
    fn write(&self, _path: &Path, _record: &Record) -> Result<(), SinkError> {
        Err(SinkError::Transport("disk full".into()))
    }
}

#[rstest]
fn sink_errors_are_counted_separately(router: OutputRouter) {
    let reports = router.dispatch_records(&[record(json!({"id": 7}))], &BrokenSink);
    assert!(reports.iter().all(|r| r.written == 0 && r.failed == 1));
}

#[derive(Default)]
struct RecordingCollector {
    sent: Mutex<Vec<(String, Option<u32>)>>,
    fail_after: Option<usize>,
}

impl RecordingCollector {
    fn push(&self, remote: &str, seq: Option<u32>) -> Result<(), SinkError> {
        let mut sent = self.sent.lock().expect("sent lock");
        if self.fail_after.is_some_and(|n| sent.len() >= n) {
            return Err(SinkError::Transport("connection refused".into()));
        }
        sent.push((remote.to_owned(), seq));
        Ok(())
    }
}

impl CollectorSink<u8> for RecordingCollector {
    fn send_templates(
        &self,
        collector: &CollectorOutput,
        _message: &TemplateMessage,
    ) -> Result<(), SinkError> {
        self.push(&collector.remote_address, None)
    }

    fn send_data(
        &self,
        collector: &CollectorOutput,
        message: &FlowDataMessage<u8>,
    ) -> Result<(), SinkError> {
        self.push(
            &collector.remote_address,
            Some(message.header.sequence_number.get()),
        )
    }
}

fn data(seq: u32) -> FlowDataMessage<u8> {
    FlowDataMessage {
        header: Header::new(SequenceNumber::new(seq)),
        flow_sets: vec![FlowSet {
            flow_set_id: TemplateId::new(1024),
            flows: vec![0],
        }],
    }
}

fn templates() -> TemplateMessage {
    TemplateMessage {
        header: Header::new(SequenceNumber::default()),
        templates: Vec::new(),
    }
}

#[rstest]
fn collectors_receive_templates_then_data_in_order(router: OutputRouter) {
    let sink = RecordingCollector::default();
    let reports = router.dispatch_messages(&templates(), &[data(0), data(5)], &sink);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].output, 0);
    assert_eq!(reports[0].sent, 3);
    assert!(reports[0].error.is_none());
    assert_eq!(
        *sink.sent.lock().expect("sent lock"),
        vec![
            ("10.0.0.9:2100".to_owned(), None),
            ("10.0.0.9:2100".to_owned(), Some(0)),
            ("10.0.0.9:2100".to_owned(), Some(5)),
        ]
    );
}

#[test]
fn collector_failure_stops_that_collector_only() {
    let config = Config {
        outputs: vec![collector_output("a:1"), collector_output("b:1")],
        ..Config::default()
    };
    let router = OutputRouter::new(&config, Arc::new(TagExecutor));
    let sink = RecordingCollector {
        fail_after: Some(2),
        ..RecordingCollector::default()
    };

    let reports = router.dispatch_messages(&templates(), &[data(0), data(1)], &sink);

    assert_eq!(reports[0].sent, 2);
    assert!(matches!(reports[0].error, Some(SinkError::Transport(_))));
    assert_eq!(reports[1].sent, 0);
    assert!(reports[1].error.is_some());
}

#[test]
fn json_lines_sink_appends_one_object_per_line() {
    let path = std::env::temp_dir().join(format!("flowexport-sink-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);

    JsonLinesSink
        .write(&path, &record(json!({"a": 1})))
        .expect("first write");
    JsonLinesSink
        .write(&path, &record(json!({"b": "two"})))
        .expect("second write");

    let contents = std::fs::read_to_string(&path).expect("read back");
    std::fs::remove_file(&path).expect("clean up");
    assert_eq!(contents, "{\"a\":1}\n{\"b\":\"two\"}\n");
}
