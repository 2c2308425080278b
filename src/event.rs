use crate::error::ValidationError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// `RequestType` is the lifecycle action CloudFormation asks the
/// custom resource to perform
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// `CustomResourceEvent` represents the raw event sent by CloudFormation
/// to a Lambda-backed custom resource
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    #[serde(default)]
    pub resource_type: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub old_resource_properties: Option<Map<String, Value>>,
}

/// A string property the reconcilers require, with the label used
/// in failure reasons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
}

/// Account that owns the bucket.
pub const ACCOUNT: Field = Field {
    key: "account",
    label: "AWS Account",
};

/// Name of the bucket sending notifications.
pub const BUCKET_NAME: Field = Field {
    key: "s3Name",
    label: "S3 Bucket Name",
};

/// ARN of the bucket allowed to send messages.
pub const BUCKET_ARN: Field = Field {
    key: "s3Arn",
    label: "S3 Bucket ARN",
};

/// Which property set of the request is being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Properties {
    Current,
    Previous,
}

impl CustomResourceEvent {
    /// Borrow one of the property maps, failing when CloudFormation did not send it.
    pub fn properties(&self, which: Properties) -> Result<&Map<String, Value>, ValidationError> {
        match which {
            Properties::Current => self
                .resource_properties
                .as_ref()
                .ok_or(ValidationError::MissingProperties),
            Properties::Previous => self
                .old_resource_properties
                .as_ref()
                .ok_or(ValidationError::MissingOldProperties),
        }
    }
}

/// Read a required string field out of a property map.
/// Values that are not strings count as missing.
pub fn required(
    properties: &Map<String, Value>,
    field: Field,
    which: Properties,
) -> Result<String, ValidationError> {
    match properties.get(field.key).and_then(Value::as_str) {
        Some(value) => Ok(value.to_owned()),
        None => Err(match which {
            Properties::Current => ValidationError::MissingField(field.label),
            Properties::Previous => ValidationError::MissingOldField(field.label),
        }),
    }
}
