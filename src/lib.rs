// Public modules
pub mod types;
pub mod config;
pub mod error;
pub mod cloudwatch;
pub mod sns;
pub mod collector;
pub mod report;
pub mod handler;

// Re-export commonly used items
pub use types::*;
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use error::{CollectionError, PublishError};
pub use cloudwatch::{CloudWatchSource, MetricsSource};
pub use sns::{publish_report, Notifier, SnsNotifier};
pub use collector::{CollectedSamples, MetricsCollector};
pub use report::{render_email_body, render_report, ReportSummary, UtilizationReport};
pub use handler::{ReportRun, UtilizationReporter};
