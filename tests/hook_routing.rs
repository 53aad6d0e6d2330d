//! Hook chains and output routing driven from the sample exporter config.

use std::sync::Arc;

use flowexport::{
    Config,
    HookChain,
    OutputRouter,
    SequenceNumber,
    hook::{Hook, HookBackend},
    output::Route,
};
use flowexport_testing::{
    Delivery,
    FailingExecutor,
    MemorySink,
    RecordingExecutor,
    StaticExecutor,
    fixtures::{self, COLLECTOR, LOG_FILE, exporter_config},
};
use rstest::rstest;
use serde_json::json;

fn annotating() -> StaticExecutor {
    StaticExecutor::default()
        .with_field("add-hostname", "hostname", "exporter-1")
        .with_field("lookup-geo", "country", "NZ")
        .with_field("add-stamp", "stamped", true)
}

#[rstest]
fn hooks_rewrite_records_in_order(exporter_config: Config) {
    let executor = Arc::new(RecordingExecutor::new(annotating()));
    let router = OutputRouter::new(&exporter_config, executor.clone());
    let sink: MemorySink = MemorySink::default();

    let reports = router.dispatch_records(&[fixtures::record(json!({"id": 1}))], &sink);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].written, 1);
    assert_eq!(
        sink.records_for(LOG_FILE),
        vec![fixtures::record(json!({
            "id": 1,
            "hostname": "exporter-1",
            "country": "NZ",
            "stamped": true,
        }))]
    );
    assert_eq!(
        executor.backends(),
        vec!["add-hostname", "lookup-geo", "add-stamp"]
    );
    let calls = executor.calls();
    assert_eq!(calls[1].backend, HookBackend::Shell("lookup-geo".into()));
    assert_eq!(calls[1].input["hostname"], json!("exporter-1"));
}

#[rstest]
fn failing_middle_hook_drops_record_and_skips_the_rest(exporter_config: Config) {
    let executor = Arc::new(RecordingExecutor::new(
        FailingExecutor::new(annotating()).fail("lookup-geo"),
    ));
    let router = OutputRouter::new(&exporter_config, executor.clone());
    let sink: MemorySink = MemorySink::default();

    let reports = router.dispatch_records(&fixtures::timestamps(2), &sink);

    assert_eq!(reports[0].written, 0);
    assert_eq!(reports[0].dropped, 2);
    assert!(sink.records().is_empty());
    assert_eq!(
        executor.backends(),
        vec!["add-hostname", "lookup-geo", "add-hostname", "lookup-geo"]
    );
}

#[test]
fn chain_error_names_the_failing_hook() {
    let hooks = vec![
        Hook::new("hook1", HookBackend::Command("one".into())),
        Hook::new("hook2", HookBackend::Command("two".into())),
        Hook::new("hook3", HookBackend::Command("three".into())),
    ];
    let chain = HookChain::new(
        hooks,
        Arc::new(FailingExecutor::new(StaticExecutor::default()).fail("two")),
    );

    let err = chain
        .execute(fixtures::record(json!({"a": 1})))
        .expect_err("second hook fails");

    assert_eq!(err.hook(), "hook2");
    assert_eq!(err.to_string(), "hook \"hook2\" (#1) failed: two refused the record");
}

#[test]
fn empty_chain_returns_record_unchanged() {
    let chain = HookChain::new(Vec::new(), Arc::new(StaticExecutor::default()));
    let record = fixtures::record(json!({"a": 1}));
    assert_eq!(chain.execute(record.clone()).expect("no hooks to fail"), record);
}

#[rstest]
fn collector_receives_templates_then_data(exporter_config: Config) {
    let router = OutputRouter::new(&exporter_config, Arc::new(StaticExecutor::default()));
    let templates = exporter_config.template_message().expect("templates resolve");
    let batch = fixtures::timestamp_flows(7)
        .into_data_messages(&exporter_config, SequenceNumber::default())
        .expect("fragmentation succeeds");
    let sink: MemorySink = MemorySink::default();

    let reports = router.dispatch_messages(&templates, batch.messages(), &sink);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].sent, 3);
    assert!(reports[0].error.is_none());
    let deliveries = sink.deliveries();
    assert!(matches!(&deliveries[0], Delivery::Templates { remote, .. } if remote == COLLECTOR));
    let seqs: Vec<_> = deliveries[1..]
        .iter()
        .map(|d| match d {
            Delivery::Data { message, .. } => message.header.sequence_number.get(),
            Delivery::Templates { .. } => panic!("templates are sent once"),
        })
        .collect();
    assert_eq!(seqs, vec![0, 5]);
    assert!(sink.records().is_empty());
}

#[test]
fn refused_collector_does_not_block_others() {
    let config = Config::from_yaml_str(
        "\
maxIpfixMessageLen: 60
templates:
- id: 1024
  template:
  - name: FlowEndMilliseconds
outputs:
- collector:
    remoteAddress: 192.0.2.1:2100
- collector:
    remoteAddress: 192.0.2.2:2100
",
    )
    .expect("config parses");
    let router = OutputRouter::new(&config, Arc::new(StaticExecutor::default()));
    assert!(router.routes().iter().all(|r| matches!(r, Route::Collector(_))));
    let templates = config.template_message().expect("templates resolve");
    let batch = fixtures::timestamp_flows(3)
        .into_data_messages(&config, SequenceNumber::default())
        .expect("fragmentation succeeds");
    let sink: MemorySink = MemorySink::default().refuse("192.0.2.1:2100");

    let reports = router.dispatch_messages(&templates, batch.messages(), &sink);

    assert_eq!(reports[0].sent, 0);
    assert!(reports[0].error.is_some());
    assert_eq!(reports[1].sent, 2);
    assert!(sink.deliveries().iter().all(|d| d.remote() == "192.0.2.2:2100"));
}
