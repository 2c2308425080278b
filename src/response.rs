use crate::{error::RuntimeError, event::CustomResourceEvent};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use std::time::Duration;

/// How long to wait for the pre-signed URL to accept the response.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Status reported to CloudFormation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// `Outcome` is the result of one reconciliation, as seen by CloudFormation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub status: ResponseStatus,
    pub reason: String,
}

impl Outcome {
    pub fn success(reason: impl Into<String>) -> Outcome {
        Outcome {
            status: ResponseStatus::Success,
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Outcome {
        Outcome {
            status: ResponseStatus::Failed,
            reason: reason.into(),
        }
    }
}

/// `CustomResourceResponse` is the body uploaded to the request's response URL
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
}

impl CustomResourceResponse {
    /// Build the response for `event`. The logical id doubles as the physical id.
    pub fn new(event: &CustomResourceEvent, outcome: &Outcome) -> CustomResourceResponse {
        CustomResourceResponse {
            status: outcome.status,
            reason: outcome.reason.clone(),
            physical_resource_id: event.logical_resource_id.clone(),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
        }
    }
}

/// Channel used to hand the outcome back to CloudFormation.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn send(&self, url: &str, response: &CustomResourceResponse) -> Result<(), RuntimeError>;
}

/// Uploads responses to the pre-signed S3 URL CloudFormation provides.
#[derive(Clone, Debug)]
pub struct HttpResponder {
    inner: reqwest::Client,
}

impl HttpResponder {
    pub fn new() -> Result<HttpResponder, RuntimeError> {
        HttpResponder::with_timeout(RESPONSE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<HttpResponder, RuntimeError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpResponder { inner })
    }
}

#[async_trait]
impl Responder for HttpResponder {
    #[tracing::instrument(skip(self, url))]
    async fn send(&self, url: &str, response: &CustomResourceResponse) -> Result<(), RuntimeError> {
        let body = serde_json::to_string(response).map_err(RuntimeError::ResponseBody)?;
        tracing::info!("sending custom resource response");

        // the pre-signed url is signed without a content type
        self.inner
            .put(url)
            .header(CONTENT_TYPE, "")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
