use thiserror::Error;

/// Failures raised by the storage layer. Store call failures keep the
/// underlying SDK message; nothing here is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Presigning error: {0}")]
    Presign(String),

    #[error("Malformed item: missing or mistyped attribute {0}")]
    MalformedItem(String),
}
