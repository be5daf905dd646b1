use anyhow::{anyhow, Result};
use std::collections::HashMap;
use crate::types::Config;

pub const DEFAULT_REGION: &str = "eu-north-1";
pub const DEFAULT_TOPIC_ARN: &str = "arn:aws:sns:eu-north-1:863518417872:AllServiceUtilization";
pub const REPORT_SUBJECT: &str = "AWS Service Utilization Report";
pub const LOOKBACK_MINUTES: u16 = 60;

/// Namespaces scanned on every run. Order decides report ordering.
pub const DEFAULT_NAMESPACES: [&str; 16] = [
    "AWS/EC2",
    "AWS/Lambda",
    "AWS/RDS",
    "AWS/S3",
    "AWS/DynamoDB",
    "AWS/ElasticBeanstalk",
    "AWS/ElastiCache",
    "AWS/ElasticLoadBalancing",
    "AWS/SNS",
    "AWS/SQS",
    "AWS/CloudFront",
    "AWS/CloudWatch",
    "AWS/ApiGateway",
    "AWS/Route53",
    "AWS/Kinesis",
    "AWS/Redshift",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            topic_arn: DEFAULT_TOPIC_ARN.to_string(),
            subject: REPORT_SUBJECT.to_string(),
            namespaces: DEFAULT_NAMESPACES.iter().map(|s| s.to_string()).collect(),
            lookback_minutes: LOOKBACK_MINUTES,
        }
    }
}

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

/// Start from the built-in defaults and apply any `REPORT_*` overrides.
/// The lookback window is fixed and cannot be overridden.
pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(region) = non_empty(env.get_var("REPORT_REGION")) {
        cfg.region = region;
    }
    if let Some(topic_arn) = non_empty(env.get_var("REPORT_TOPIC_ARN")) {
        cfg.topic_arn = topic_arn;
    }
    if let Some(subject) = non_empty(env.get_var("REPORT_SUBJECT")) {
        cfg.subject = subject;
    }

    if let Some(raw) = env.get_var("REPORT_NAMESPACES") {
        let namespaces: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if namespaces.is_empty() {
            return Err(anyhow!("REPORT_NAMESPACES must list at least one namespace (comma-separated)"));
        }
        cfg.namespaces = namespaces;
    }

    Ok(cfg)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
