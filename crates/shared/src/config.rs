use std::env;

/// Runtime configuration, resolved from the process environment once at
/// startup. Missing table or bucket names fall back to empty strings and
/// surface later as store errors on the first call.
#[derive(Debug, Clone)]
pub struct Config {
    pub todos_table: String,
    pub bucket_name: String,
    /// Points the DynamoDB client at a local endpoint during development.
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            todos_table: env::var("TODOS_TABLE").unwrap_or_default(),
            bucket_name: env::var("S3_BUCKET_NAME").unwrap_or_default(),
            dynamodb_endpoint: env::var("DYNAMODB_ENDPOINT").ok(),
        }
    }
}
