pub mod attachments;
pub mod dynamodb;
pub mod error;
pub mod models;
pub mod store;

pub use attachments::{S3UploadSigner, UploadUrlSigner};
pub use dynamodb::load_aws_config;
pub use error::StoreError;
pub use store::{DynamoItemStore, ItemStore};
