use thiserror::Error;

/// Failure while collecting one namespace. Collection moves on to the next
/// namespace after logging it.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("failed to list metrics for {namespace}: {source:#}")]
    ListMetrics {
        namespace: String,
        source: anyhow::Error,
    },

    #[error("failed to fetch {metric_name} statistics for {namespace}: {source:#}")]
    GetStatistics {
        namespace: String,
        metric_name: String,
        source: anyhow::Error,
    },
}

impl CollectionError {
    pub fn namespace(&self) -> &str {
        match self {
            CollectionError::ListMetrics { namespace, .. } => namespace,
            CollectionError::GetStatistics { namespace, .. } => namespace,
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to publish to {topic_arn}: {source:#}")]
    Send {
        topic_arn: String,
        source: anyhow::Error,
    },
}
