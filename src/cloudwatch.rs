use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Dimension, Statistic};
use aws_sdk_cloudwatch::Client;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::types::{MetricDescriptor, MetricDimension};

/// Read side of the monitoring service.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Metrics registered in `namespace`. Only the first page is returned.
    async fn list_metrics(&self, namespace: &str) -> Result<Vec<MetricDescriptor>>;

    /// Average statistic of the first data point in `[start, end]`, if any.
    async fn get_average(
        &self,
        namespace: &str,
        metric: &MetricDescriptor,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period_seconds: i32,
    ) -> Result<Option<f64>>;
}

pub struct CloudWatchSource {
    client: Client,
}

impl CloudWatchSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricsSource for CloudWatchSource {
    async fn list_metrics(&self, namespace: &str) -> Result<Vec<MetricDescriptor>> {
        let out = self
            .client
            .list_metrics()
            .namespace(namespace)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(e)))
            .context("ListMetrics request failed")?;

        let metrics: Vec<MetricDescriptor> = out
            .metrics()
            .iter()
            .filter_map(|m| {
                let metric_name = m.metric_name()?.to_string();
                let dimensions = m
                    .dimensions()
                    .iter()
                    .filter_map(|d| {
                        Some(MetricDimension {
                            name: d.name()?.to_string(),
                            value: d.value()?.to_string(),
                        })
                    })
                    .collect();
                Some(MetricDescriptor { metric_name, dimensions })
            })
            .collect();

        debug!("{}: {} metrics listed", namespace, metrics.len());
        Ok(metrics)
    }

    async fn get_average(
        &self,
        namespace: &str,
        metric: &MetricDescriptor,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period_seconds: i32,
    ) -> Result<Option<f64>> {
        let dimensions: Vec<Dimension> = metric
            .dimensions
            .iter()
            .map(|d| Dimension::builder().name(&d.name).value(&d.value).build())
            .collect();

        let out = self
            .client
            .get_metric_statistics()
            .namespace(namespace)
            .metric_name(&metric.metric_name)
            .set_dimensions(Some(dimensions))
            .start_time(to_aws_time(start))
            .end_time(to_aws_time(end))
            .period(period_seconds)
            .statistics(Statistic::Average)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("{}", DisplayErrorContext(e)))
            .context("GetMetricStatistics request failed")?;

        Ok(out.datapoints().first().and_then(|p| p.average()))
    }
}

fn to_aws_time(t: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_millis(t.timestamp_millis())
}
