use crate::{
    config::LogLocation,
    error::{RuntimeError, ValidationError},
    event::{CustomResourceEvent, Properties, RequestType},
    response::{CustomResourceResponse, Outcome, Responder},
};
use async_trait::async_trait;
use lambda_runtime::LambdaEvent;
use serde_json::{Map, Value};

/// A validated lifecycle request, carrying the parsed properties.
#[derive(Clone, Debug, PartialEq)]
pub enum Change<P> {
    Create(P),
    Update { current: P, previous: P },
    Delete(P),
}

/// A custom resource that owns one identified entry in a shared AWS document.
#[async_trait]
pub trait Reconciler: Send + Sync {
    /// Properties the resource is configured with.
    type Properties: Send + Sync + std::fmt::Debug;

    /// Reason reported when the document cannot be read or written.
    const FAILURE_REASON: &'static str;

    /// Extract the properties, naming the first missing field on failure.
    fn parse(
        properties: &Map<String, Value>,
        which: Properties,
    ) -> Result<Self::Properties, ValidationError>;

    /// Bring the shared document in line with `change` for the entry `logical_id`.
    async fn reconcile(
        &self,
        logical_id: &str,
        change: &Change<Self::Properties>,
    ) -> Result<(), RuntimeError>;
}

/// Validate the request and turn it into a `Change` without any AWS call.
pub fn validate<R: Reconciler>(
    event: &CustomResourceEvent,
) -> Result<Change<R::Properties>, ValidationError> {
    let current = R::parse(event.properties(Properties::Current)?, Properties::Current)?;

    Ok(match event.request_type {
        RequestType::Create => Change::Create(current),
        RequestType::Delete => Change::Delete(current),
        RequestType::Update => {
            let previous = R::parse(event.properties(Properties::Previous)?, Properties::Previous)?;
            Change::Update { current, previous }
        }
    })
}

/// Run one lifecycle request to completion and work out what to report.
/// Error details only go to the logs, CloudFormation gets a fixed reason.
#[tracing::instrument(skip_all, fields(logical_id = %event.logical_resource_id, request_type = ?event.request_type))]
pub async fn reconcile_request<R: Reconciler>(
    reconciler: &R,
    log_location: &LogLocation,
    event: &CustomResourceEvent,
) -> Outcome {
    let change = match validate::<R>(event) {
        Ok(change) => change,
        Err(err) => {
            tracing::warn!(reason = %err, "rejecting invalid request");
            return Outcome::failed(err.to_string());
        }
    };

    match reconciler.reconcile(&event.logical_resource_id, &change).await {
        Ok(()) => {
            tracing::info!("reconciliation succeeded");
            Outcome::success(log_location.reason())
        }
        Err(err) => {
            tracing::error!(error = ?err, "reconciliation failed: {}", err);
            Outcome::failed(R::FAILURE_REASON)
        }
    }
}

/// Reconcile the request and send exactly one response to CloudFormation.
pub async fn handle_request<R: Reconciler, S: Responder>(
    reconciler: &R,
    responder: &S,
    log_location: &LogLocation,
    event: &CustomResourceEvent,
) -> Result<Outcome, RuntimeError> {
    let outcome = reconcile_request(reconciler, log_location, event).await;

    let response = CustomResourceResponse::new(event, &outcome);
    responder.send(&event.response_url, &response).await?;

    Ok(outcome)
}

/// `handle_event` is the Lambda function entry point
/// that receives the events from CloudFormation
#[tracing::instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn handle_event<R: Reconciler, S: Responder>(
    reconciler: &R,
    responder: &S,
    log_location: &LogLocation,
    event: LambdaEvent<CustomResourceEvent>,
) -> Result<Outcome, RuntimeError> {
    handle_request(reconciler, responder, log_location, &event.payload).await
}
