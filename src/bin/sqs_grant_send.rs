use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use virus_scan_custom_resources::{
    config::Environment, grant::GrantSendReconciler, handle_event, response::HttpResponder,
    CustomResourceEvent, SqsPolicyStore,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let env = Environment::process();
    let queue_arn = env.queue_arn()?;
    let queue_url = env.queue_url()?;
    let log_location = env.log_location();

    // Get AWS Configuration
    let config = aws_config::load_from_env().await;
    let reconciler = GrantSendReconciler::new(SqsPolicyStore::new(&config, &queue_url), queue_arn);
    let responder = HttpResponder::new()?;

    run(service_fn(|event: LambdaEvent<CustomResourceEvent>| {
        handle_event(&reconciler, &responder, &log_location, event)
    }))
    .await
}
