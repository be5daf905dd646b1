use tracing::{debug, error, info};

use crate::cloudwatch::MetricsSource;
use crate::error::CollectionError;
use crate::types::*;

/// Walks the configured namespaces and gathers one average per metric.
pub struct MetricsCollector<'a> {
    source: &'a dyn MetricsSource,
    config: &'a Config,
}

impl<'a> MetricsCollector<'a> {
    pub fn new(source: &'a dyn MetricsSource, config: &'a Config) -> Self {
        Self { source, config }
    }

    /// Collect samples for every namespace in configuration order.
    pub async fn collect_samples(&self, window: &ReportWindow) -> CollectedSamples {
        let mut collected = CollectedSamples::default();

        for ns in &self.config.namespaces {
            info!("Collecting metrics for namespace: {}", ns);
            let result = self.collect_namespace(ns, window).await;

            for sample in result.samples {
                collected.push(sample);
            }
            if let Some(err) = result.error {
                error!("Error fetching metrics: {}", err);
                collected.errors.push(err);
            }
        }

        collected
    }

    /// Collect one namespace. Stops at the first failing call; samples
    /// gathered before the failure are kept.
    pub async fn collect_namespace(&self, namespace: &str, window: &ReportWindow) -> NamespaceCollection {
        let mut samples = Vec::new();

        let metrics = match self.source.list_metrics(namespace).await {
            Ok(m) => m,
            Err(source) => {
                return NamespaceCollection {
                    samples,
                    error: Some(CollectionError::ListMetrics {
                        namespace: namespace.to_string(),
                        source,
                    }),
                };
            }
        };

        for metric in &metrics {
            let average = self
                .source
                .get_average(
                    namespace,
                    metric,
                    window.start,
                    window.end,
                    self.config.period_seconds(),
                )
                .await;

            match average {
                Ok(Some(avg)) => {
                    samples.push(MetricSample::new(namespace, metric.metric_name.clone(), avg));
                }
                Ok(None) => {
                    debug!("{}/{}: no datapoints in window", namespace, metric.metric_name);
                }
                Err(source) => {
                    return NamespaceCollection {
                        samples,
                        error: Some(CollectionError::GetStatistics {
                            namespace: namespace.to_string(),
                            metric_name: metric.metric_name.clone(),
                            source,
                        }),
                    };
                }
            }
        }

        NamespaceCollection { samples, error: None }
    }
}

/// Result of collecting a single namespace
pub struct NamespaceCollection {
    pub samples: Vec<MetricSample>,
    pub error: Option<CollectionError>,
}

/// Samples across all namespaces, in discovery order
#[derive(Debug, Default)]
pub struct CollectedSamples {
    pub samples: Vec<MetricSample>,
    /// Index into `samples` of the strictly largest positive average.
    pub highest: Option<usize>,
    pub errors: Vec<CollectionError>,
}

impl CollectedSamples {
    /// Append a sample and update the running maximum. The maximum starts at
    /// zero and only a strictly greater value replaces it, so the first of
    /// equal values wins.
    pub fn push(&mut self, sample: MetricSample) {
        let current = self
            .highest_sample()
            .map(|h| h.average)
            .unwrap_or(0.0);
        if sample.average > current {
            self.highest = Some(self.samples.len());
        }
        self.samples.push(sample);
    }

    pub fn highest_sample(&self) -> Option<&MetricSample> {
        self.highest.and_then(|i| self.samples.get(i))
    }

    pub fn failed_namespaces(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.namespace()).collect()
    }
}

impl FromIterator<MetricSample> for CollectedSamples {
    fn from_iter<I: IntoIterator<Item = MetricSample>>(iter: I) -> Self {
        let mut collected = CollectedSamples::default();
        for sample in iter {
            collected.push(sample);
        }
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSource {
        listings: HashMap<String, Vec<MetricDescriptor>>,
        averages: HashMap<(String, String), f64>,
        failing_lists: Vec<String>,
        failing_metrics: Vec<String>,
        calls: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>, i32)>>,
    }

    impl FakeSource {
        fn metric(mut self, namespace: &str, name: &str, average: Option<f64>) -> Self {
            self.listings
                .entry(namespace.to_string())
                .or_default()
                .push(MetricDescriptor {
                    metric_name: name.to_string(),
                    dimensions: vec![],
                });
            if let Some(avg) = average {
                self.averages.insert((namespace.to_string(), name.to_string()), avg);
            }
            self
        }
    }

    #[async_trait]
    impl MetricsSource for FakeSource {
        async fn list_metrics(&self, namespace: &str) -> Result<Vec<MetricDescriptor>> {
            if self.failing_lists.iter().any(|n| n == namespace) {
                return Err(anyhow!("AccessDenied for {}", namespace));
            }
            Ok(self.listings.get(namespace).cloned().unwrap_or_default())
        }

        async fn get_average(
            &self,
            namespace: &str,
            metric: &MetricDescriptor,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            period_seconds: i32,
        ) -> Result<Option<f64>> {
            self.calls.lock().unwrap().push((metric.metric_name.clone(), start, end, period_seconds));
            if self.failing_metrics.contains(&metric.metric_name) {
                return Err(anyhow!("Throttling"));
            }
            Ok(self
                .averages
                .get(&(namespace.to_string(), metric.metric_name.clone()))
                .copied())
        }
    }

    fn config(namespaces: &[&str]) -> Config {
        Config {
            namespaces: namespaces.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    fn window() -> ReportWindow {
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        ReportWindow::ending_at(end, Duration::hours(1))
    }

    #[tokio::test]
    async fn test_collects_in_namespace_order_and_tracks_highest() {
        let source = FakeSource::default()
            .metric("A", "m1", Some(42.5))
            .metric("B", "m2", Some(99.0));
        let cfg = config(&["A", "B"]);

        let collected = MetricsCollector::new(&source, &cfg).collect_samples(&window()).await;

        assert_eq!(collected.samples, vec![
            MetricSample::new("A", "m1", 42.5),
            MetricSample::new("B", "m2", 99.0),
        ]);
        assert_eq!(collected.highest, Some(1));
        assert!(collected.errors.is_empty());
    }

    #[tokio::test]
    async fn test_metrics_without_datapoints_are_skipped() {
        let source = FakeSource::default()
            .metric("A", "idle", None)
            .metric("A", "busy", Some(3.0));
        let cfg = config(&["A"]);

        let collected = MetricsCollector::new(&source, &cfg).collect_samples(&window()).await;

        assert_eq!(collected.samples, vec![MetricSample::new("A", "busy", 3.0)]);
    }

    #[tokio::test]
    async fn test_failed_listing_skips_namespace_only() {
        let mut source = FakeSource::default()
            .metric("A", "m1", Some(10.0))
            .metric("B", "m2", Some(20.0))
            .metric("C", "m3", Some(5.0));
        source.failing_lists.push("B".to_string());
        let cfg = config(&["A", "B", "C"]);

        let collected = MetricsCollector::new(&source, &cfg).collect_samples(&window()).await;

        assert_eq!(collected.samples.len(), 2);
        assert!(collected.samples.iter().all(|s| s.namespace != "B"));
        assert_eq!(collected.failed_namespaces(), vec!["B"]);
        assert!(collected.errors[0].to_string().contains("AccessDenied"));
        assert_eq!(collected.highest_sample().unwrap().metric_name, "m1");
    }

    #[tokio::test]
    async fn test_partial_namespace_keeps_earlier_samples() {
        let mut source = FakeSource::default()
            .metric("A", "first", Some(1.0))
            .metric("A", "broken", Some(2.0))
            .metric("A", "never", Some(3.0))
            .metric("B", "other", Some(4.0));
        source.failing_metrics.push("broken".to_string());
        let cfg = config(&["A", "B"]);

        let collected = MetricsCollector::new(&source, &cfg).collect_samples(&window()).await;

        let names: Vec<&str> = collected.samples.iter().map(|s| s.metric_name.as_str()).collect();
        assert_eq!(names, vec!["first", "other"]);
        assert_eq!(collected.errors.len(), 1);
        match &collected.errors[0] {
            CollectionError::GetStatistics { namespace, metric_name, .. } => {
                assert_eq!(namespace, "A");
                assert_eq!(metric_name, "broken");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_requests_use_full_window_as_period() {
        let source = FakeSource::default().metric("A", "m1", Some(1.0));
        let cfg = config(&["A"]);
        let w = window();

        MetricsCollector::new(&source, &cfg).collect_samples(&w).await;

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, w.start);
        assert_eq!(calls[0].2, w.end);
        assert_eq!(calls[0].3, 3600);
    }

    #[test]
    fn test_highest_first_seen_wins_on_tie() {
        let collected: CollectedSamples = vec![
            MetricSample::new("A", "m1", 50.0),
            MetricSample::new("B", "m2", 50.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(collected.highest, Some(0));
    }

    #[test]
    fn test_no_highest_when_all_averages_are_zero_or_negative() {
        let collected: CollectedSamples = vec![
            MetricSample::new("A", "m1", 0.0),
            MetricSample::new("B", "m2", -1.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(collected.samples.len(), 2);
        assert!(collected.highest.is_none());
    }
}
