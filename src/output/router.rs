//! Fan-out of records and messages to configured outputs.

use std::{path::PathBuf, sync::Arc};

use super::{CollectorSink, LogSink, SinkError};
use crate::{
    Record,
    config::{CollectorOutput, Config, Output},
    hook::{HookChain, HookExecutor},
    message::{FlowDataMessage, TemplateMessage},
    metrics,
};

/// A prepared output: either a collector address pair or a log file with
/// its hook chain.
#[derive(Debug)]
pub enum Route {
    Collector(CollectorOutput),
    Log { file: PathBuf, chain: HookChain },
}

/// Outcome of dispatching a record batch to one log output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Index of the output in configuration order.
    pub output: usize,
    /// Records written to the sink.
    pub written: usize,
    /// Records dropped because a hook failed.
    pub dropped: usize,
    /// Records that passed the chain but could not be written.
    pub failed: usize,
}

/// Outcome of delivering messages to one collector output.
#[derive(Debug)]
pub struct DeliveryReport {
    /// Index of the output in configuration order.
    pub output: usize,
    /// Messages delivered, including the template message.
    pub sent: usize,
    /// Error that stopped delivery to this collector, if any.
    pub error: Option<SinkError>,
}

/// Routes data to every configured output.
///
/// Log outputs receive records rewritten by their hook chain; collector
/// outputs receive protocol messages untouched. A failure at one output
/// never affects another.
#[derive(Debug)]
pub struct OutputRouter {
    routes: Vec<Route>,
}

impl OutputRouter {
    /// Prepare routes for `config.outputs`, running hooks through `executor`.
    #[must_use]
    pub fn new(config: &Config, executor: Arc<dyn HookExecutor>) -> Self {
        let routes = config
            .outputs
            .iter()
            .map(|output| match output {
                Output::Collector(collector) => Route::Collector(collector.clone()),
                Output::Log(log) => Route::Log {
                    file: log.file.clone(),
                    chain: HookChain::new(log.hooks.clone(), Arc::clone(&executor)),
                },
            })
            .collect();
        Self { routes }
    }

    /// Prepared routes in configuration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] { &self.routes }

    /// Run each record through every log output's chain and write the
    /// survivors to `sink`.
    ///
    /// A hook failure drops that record for that output only; the failure is
    /// logged with the hook's name and counted in the report.
    pub fn dispatch_records<S>(&self, records: &[Record], sink: &S) -> Vec<DispatchReport>
    where
        S: LogSink + ?Sized,
    {
        self.routes
            .iter()
            .enumerate()
            .filter_map(|(output, route)| match route {
                Route::Log { file, chain } => {
                    let mut report = DispatchReport {
                        output,
                        ..DispatchReport::default()
                    };
                    for record in records {
                        let rewritten = match chain.execute(record.clone()) {
                            Ok(rewritten) => rewritten,
                            Err(err) => {
                                tracing::warn!(
                                    output,
                                    hook = err.hook(),
                                    error = %err,
                                    "hook failed; record dropped"
                                );
                                report.dropped += 1;
                                continue;
                            }
                        };
                        match sink.write(file, &rewritten) {
                            Ok(()) => {
                                metrics::inc_records_written();
                                report.written += 1;
                            }
                            Err(err) => {
                                tracing::warn!(
                                    output,
                                    file = %file.display(),
                                    error = %err,
                                    "failed to write record"
                                );
                                report.failed += 1;
                            }
                        }
                    }
                    Some(report)
                }
                Route::Collector(_) => None,
            })
            .collect()
    }

    /// Deliver the template message followed by `messages` to every
    /// collector output.
    ///
    /// Delivery to a collector stops at its first error; other collectors
    /// still receive everything.
    pub fn dispatch_messages<F, S>(
        &self,
        templates: &TemplateMessage,
        messages: &[FlowDataMessage<F>],
        sink: &S,
    ) -> Vec<DeliveryReport>
    where
        S: CollectorSink<F> + ?Sized,
    {
        self.routes
            .iter()
            .enumerate()
            .filter_map(|(output, route)| match route {
                Route::Collector(collector) => {
                    Some(deliver(output, collector, templates, messages, sink))
                }
                Route::Log { .. } => None,
            })
            .collect()
    }
}

fn deliver<F, S>(
    output: usize,
    collector: &CollectorOutput,
    templates: &TemplateMessage,
    messages: &[FlowDataMessage<F>],
    sink: &S,
) -> DeliveryReport
where
    S: CollectorSink<F> + ?Sized,
{
    let mut sent = 0;
    let error = send_all(collector, templates, messages, sink, &mut sent).err();
    if let Some(err) = &error {
        tracing::warn!(
            output,
            remote = %collector.remote_address,
            sent,
            error = %err,
            "collector delivery failed"
        );
    }
    DeliveryReport {
        output,
        sent,
        error,
    }
}

fn send_all<F, S>(
    collector: &CollectorOutput,
    templates: &TemplateMessage,
    messages: &[FlowDataMessage<F>],
    sink: &S,
    sent: &mut usize,
) -> Result<(), SinkError>
where
    S: CollectorSink<F> + ?Sized,
{
    sink.send_templates(collector, templates)?;
    *sent += 1;
    for message in messages {
        sink.send_data(collector, message)?;
        *sent += 1;
    }
    Ok(())
}
