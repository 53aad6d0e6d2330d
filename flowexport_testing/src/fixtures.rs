//! Sample configurations and flow batches.

use flowexport::{Config, FlowFile, FlowGroup, Record};
use rstest::fixture;
use serde_json::{Value, json};

/// Collector address used by [`EXPORTER_YAML`].
pub const COLLECTOR: &str = "10.146.0.6:2100";

/// Log file used by [`EXPORTER_YAML`].
pub const LOG_FILE: &str = "/tmp/flowlog.json";

/// Template whose records are one 8-byte timestamp.
pub const TIMESTAMP_TEMPLATE: u16 = 1024;

/// Template of source and destination IPv4 addresses plus the end time.
pub const ADDRESS_TEMPLATE: u16 = 1025;

/// A 60-byte message limit with one collector and one log output running
/// three hooks: `add-hostname`, `lookup-geo` (a shell script), and
/// `add-stamp`.
pub const EXPORTER_YAML: &str = "\
maxIpfixMessageLen: 60
timerTemplateFlushSeconds: 10
templates:
- id: 1024
  template:
  - name: FlowEndMilliseconds
- id: 1025
  template:
  - name: SourceIPv4Address
  - name: DestinationIPv4Address
  - name: FlowEndMilliseconds
outputs:
- collector:
    remoteAddress: 10.146.0.6:2100
    localAddress: 0.0.0.0:50102
- log:
    file: /tmp/flowlog.json
    hooks:
    - name: hostname
      command: add-hostname
    - name: geo
      shell: lookup-geo
    - name: stamp
      command: add-stamp
";

/// [`EXPORTER_YAML`], parsed and validated.
///
/// # Panics
///
/// Panics if the bundled YAML no longer parses.
#[fixture]
pub fn exporter_config() -> Config {
    Config::from_yaml_str(EXPORTER_YAML).expect("bundled exporter config is valid")
}

/// Convert a JSON object literal into a [`Record`].
///
/// # Panics
///
/// Panics if `value` is not an object.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("record fixture must be a JSON object, got {other}"),
    }
}

/// `count` timestamp records numbered from zero.
pub fn timestamps(count: u64) -> Vec<Record> {
    (0..count)
        .map(|i| record(json!({"FlowEndMilliseconds": 1_700_000_000_000_u64 + i})))
        .collect()
}

/// A flow file with one group of `count` records for [`TIMESTAMP_TEMPLATE`].
pub fn timestamp_flows(count: u64) -> FlowFile {
    FlowFile::new(vec![FlowGroup::new(TIMESTAMP_TEMPLATE, timestamps(count))])
}
