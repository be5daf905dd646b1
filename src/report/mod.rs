use std::fmt::Write as _;

use crate::collector::CollectedSamples;
use crate::types::*;

const SEPARATOR_WIDTH: usize = 100;

/// Everything one run produced, ready to be rendered and sent.
pub struct UtilizationReport {
    pub window: ReportWindow,
    pub collected: CollectedSamples,
}

impl UtilizationReport {
    pub fn new(window: ReportWindow, collected: CollectedSamples) -> Self {
        Self { window, collected }
    }

    pub fn highest(&self) -> Option<&MetricSample> {
        self.collected.highest_sample()
    }

    pub fn table(&self) -> String {
        render_report(&self.collected.samples, self.collected.highest)
    }

    /// Full message body as sent to subscribers.
    pub fn email_body(&self) -> String {
        render_email_body(&self.table())
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            sample_count: self.collected.samples.len(),
            failed_namespace_count: self.collected.errors.len(),
            highest: self.highest().cloned(),
        }
    }
}

/// Fixed-width table with the highest sample pinned on top. `highest` is an
/// index into `samples`; rows equal to that sample are not repeated below it.
pub fn render_report(samples: &[MetricSample], highest: Option<usize>) -> String {
    let mut table = String::new();
    let pinned = highest.and_then(|i| samples.get(i));

    if let Some(top) = pinned {
        let _ = writeln!(table, "{:<50} | {:<30} | {:<15}", "Service", "Metric", "Utilization");
        table.push_str(&"-".repeat(SEPARATOR_WIDTH));
        table.push('\n');
        let _ = writeln!(
            table,
            "{:<50} | {:<30} | {:<15.2} <== HIGHEST",
            top.namespace, top.metric_name, top.average
        );
        table.push_str(&"-".repeat(SEPARATOR_WIDTH));
        table.push('\n');
    }

    for s in samples {
        if pinned == Some(s) {
            continue;
        }
        let _ = writeln!(table, "{:<50} | {:<30} | {:<15.2}", s.namespace, s.metric_name, s.average);
    }

    table
}

pub fn render_email_body(table: &str) -> String {
    format!(
        "\n    AWS Service Utilization Report\n    ==============================\n\n    Service utilization in the last hour:\n\n    {}\n    ",
        table
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub sample_count: usize,
    pub failed_namespace_count: usize,
    pub highest: Option<MetricSample>,
}

impl ReportSummary {
    pub fn has_samples(&self) -> bool {
        self.sample_count > 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed_namespace_count > 0
    }
}
