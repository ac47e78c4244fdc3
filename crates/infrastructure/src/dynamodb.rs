use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use shared::Config;

/// Loads the shared AWS configuration with caller-side operation timeouts,
/// once at process start. Every store client is built from this handle.
pub async fn load_aws_config() -> aws_config::SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(10))
                .operation_attempt_timeout(Duration::from_secs(5))
                .build(),
        )
        .load()
        .await
}

pub(crate) fn dynamodb_client(
    aws_config: &aws_config::SdkConfig,
    config: &Config,
) -> aws_sdk_dynamodb::Client {
    match &config.dynamodb_endpoint {
        Some(endpoint) => {
            let conf = aws_sdk_dynamodb::config::Builder::from(aws_config)
                .endpoint_url(endpoint)
                .build();
            aws_sdk_dynamodb::Client::from_conf(conf)
        }
        None => aws_sdk_dynamodb::Client::new(aws_config),
    }
}
