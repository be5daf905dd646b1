use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::cloudwatch::MetricsSource;
use crate::collector::MetricsCollector;
use crate::error::PublishError;
use crate::report::UtilizationReport;
use crate::sns::{publish_report, Notifier};
use crate::types::{Config, HandlerResponse, ReportWindow};

/// One scheduled invocation: collect, render, publish.
pub struct UtilizationReporter<'a> {
    source: &'a dyn MetricsSource,
    notifier: &'a dyn Notifier,
    config: &'a Config,
}

/// What a single run produced, kept for logging and tests.
pub struct ReportRun {
    pub report: UtilizationReport,
    pub body: String,
    pub published: Result<Option<String>, PublishError>,
}

impl<'a> UtilizationReporter<'a> {
    pub fn new(source: &'a dyn MetricsSource, notifier: &'a dyn Notifier, config: &'a Config) -> Self {
        Self { source, notifier, config }
    }

    /// Run once and answer the trigger. Always reports success: collection
    /// and publish failures are logged, not propagated.
    pub async fn run(&self, now: DateTime<Utc>) -> HandlerResponse {
        let run = self.execute(now).await;
        if run.published.is_err() {
            warn!("Report was not delivered; answering the trigger with success anyway");
        }
        HandlerResponse::processed()
    }

    pub async fn execute(&self, now: DateTime<Utc>) -> ReportRun {
        let window = ReportWindow::ending_at(now, self.config.lookback());
        info!(
            "Collecting {} namespaces for window {} .. {}",
            self.config.namespaces.len(),
            window.start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            window.end.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        );

        let collected = MetricsCollector::new(self.source, self.config)
            .collect_samples(&window)
            .await;
        let report = UtilizationReport::new(window, collected);

        let summary = report.summary();
        match &summary.highest {
            Some(h) => info!(
                "Collected {} samples; highest: {}/{} = {:.2}",
                summary.sample_count, h.namespace, h.metric_name, h.average
            ),
            None if summary.has_samples() => info!(
                "Collected {} samples; none above zero, no highest entry",
                summary.sample_count
            ),
            None => info!("No datapoints collected in window"),
        }
        if summary.has_failures() {
            warn!(
                "{} namespaces failed: {}",
                summary.failed_namespace_count,
                report.collected.failed_namespaces().join(", ")
            );
        }

        let body = report.email_body();
        let published = publish_report(
            self.notifier,
            &self.config.topic_arn,
            &self.config.subject,
            &body,
        )
        .await;

        ReportRun { report, body, published }
    }
}
