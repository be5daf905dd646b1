use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;
use tracing::{error, info};

use crate::error::PublishError;

/// Delivery side of the report.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish `body` to `topic_arn`. Returns the message id when the service
    /// provides one.
    async fn publish(&self, topic_arn: &str, subject: &str, body: &str) -> Result<Option<String>>;
}

pub struct SnsNotifier {
    client: Client,
}

impl SnsNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, topic_arn: &str, subject: &str, body: &str) -> Result<Option<String>> {
        let out = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(e)))
            .context("Failed to send SNS publish request")?;
        Ok(out.message_id().map(str::to_string))
    }
}

/// Send the report and log the outcome. A failed send is returned for
/// inspection but never aborts the run.
pub async fn publish_report<N: Notifier + ?Sized>(
    notifier: &N,
    topic_arn: &str,
    subject: &str,
    body: &str,
) -> Result<Option<String>, PublishError> {
    match notifier.publish(topic_arn, subject, body).await {
        Ok(message_id) => {
            info!(
                "Notification sent successfully (message id: {})",
                message_id.as_deref().unwrap_or("-")
            );
            Ok(message_id)
        }
        Err(source) => {
            let err = PublishError::Send {
                topic_arn: topic_arn.to_string(),
                source,
            };
            error!("Error sending notification: {}", err);
            Err(err)
        }
    }
}
