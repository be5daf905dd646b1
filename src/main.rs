use anyhow::{anyhow, Result};
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatch::config::Region;
use chrono::Utc;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::info;

use aws_utilization_reporter::{
    load_config, CloudWatchSource, SnsNotifier, UtilizationReporter,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    info!("region = {}, namespaces = {:?}", cfg.region, cfg.namespaces);

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(cfg.region.clone()))
        .load()
        .await;
    let source = CloudWatchSource::new(aws_sdk_cloudwatch::Client::new(&sdk_config));
    let notifier = SnsNotifier::new(aws_sdk_sns::Client::new(&sdk_config));
    let reporter = UtilizationReporter::new(&source, &notifier, &cfg);

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Starting Lambda runtime");
        let reporter = &reporter;
        lambda_runtime::run(service_fn(|_event: LambdaEvent<Value>| async move {
            Ok::<_, lambda_runtime::Error>(reporter.run(Utc::now()).await)
        }))
        .await
        .map_err(|e| anyhow!(e))?;
    } else {
        // One-shot mode for cron or manual runs
        let response = reporter.run(Utc::now()).await;
        println!("{}", serde_json::to_string(&response)?);
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .try_init();
}
