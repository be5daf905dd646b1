use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub region: String,
    pub topic_arn: String,
    pub subject: String,
    pub namespaces: Vec<String>,
    pub lookback_minutes: u16,
}

impl Config {
    /// Aggregation period requested from CloudWatch. One period spans the
    /// whole window so at most one data point comes back per metric.
    pub fn period_seconds(&self) -> i32 {
        i32::from(self.lookback_minutes) * 60
    }

    pub fn lookback(&self) -> Duration {
        Duration::minutes(i64::from(self.lookback_minutes))
    }
}

/// One metric that reported at least one data point in the window.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub namespace: String,
    pub metric_name: String,
    pub average: f64,
}

impl MetricSample {
    pub fn new(namespace: impl Into<String>, metric_name: impl Into<String>, average: f64) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            average,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Trailing window `[end - lookback, end]`.
    pub fn ending_at(end: DateTime<Utc>, lookback: Duration) -> Self {
        Self {
            start: end - lookback,
            end,
        }
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDimension {
    pub name: String,
    pub value: String,
}

/// A metric as listed by the monitoring service, with the dimensions needed
/// to query its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub metric_name: String,
    pub dimensions: Vec<MetricDimension>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn processed() -> Self {
        Self {
            status_code: 200,
            body: "Notification processed successfully".to_string(),
        }
    }
}
