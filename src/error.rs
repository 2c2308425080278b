use thiserror::Error as ThisError;

/// Different errors that the application can raise
#[derive(Debug, ThisError)]
pub enum RuntimeError {
    /// Error returned if a required environment variable is not set
    #[error("missing environment variable {0}")]
    MissingEnvironment(&'static str),
    /// Error returned by the S3 API
    #[error("unexpected s3 error")]
    S3(#[from] aws_sdk_s3::Error),
    /// Error returned by the SQS API
    #[error("unexpected sqs error")]
    Sqs(#[from] aws_sdk_sqs::Error),
    /// Error returned if the queue policy is not a valid policy document
    #[error("invalid queue policy document")]
    InvalidPolicy(#[from] serde_json::Error),
    /// Error returned if the custom resource response cannot be encoded
    #[error("failed to serialize custom resource response")]
    ResponseBody(#[source] serde_json::Error),
    /// Error returned if the outcome could not be delivered to CloudFormation
    #[error("failed to send custom resource response")]
    Response(#[from] reqwest::Error),
}

/// Reasons a lifecycle request is rejected before touching any AWS resource.
///
/// The display text is reported back to CloudFormation as the failure reason.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    /// `ResourceProperties` is absent
    #[error("No property provided.")]
    MissingProperties,
    /// `OldResourceProperties` is absent on an update
    #[error("No old property provided.")]
    MissingOldProperties,
    /// A required `ResourceProperties` field is absent or not a string
    #[error("No {0} provided.")]
    MissingField(&'static str),
    /// A required `OldResourceProperties` field is absent or not a string
    #[error("No old {0} provided.")]
    MissingOldField(&'static str),
}
