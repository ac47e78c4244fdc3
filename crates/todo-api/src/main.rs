use std::sync::Arc;

use infrastructure::{load_aws_config, DynamoItemStore, S3UploadSigner};
use lambda_http::{run, service_fn, Error, Request};
use shared::Config;
use todo_api::router;
use todo_api::todos::TodoApp;

#[tokio::main]
async fn main() -> Result<(), Error> {
    shared::init_tracing()?;

    let config = Config::from_env();
    let aws_config = load_aws_config().await;

    // Store clients are built once and shared by handle across invocations.
    let store = Arc::new(DynamoItemStore::new(&aws_config, &config));
    let signer = Arc::new(S3UploadSigner::new(&aws_config, &config));
    let app = TodoApp::new(store, signer, config.bucket_name.clone());

    run(service_fn(move |req: Request| {
        let app = app.clone();
        async move { router::route(req, &app).await }
    }))
    .await
}
