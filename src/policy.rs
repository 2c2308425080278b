use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// Version written into documents created from scratch.
pub const POLICY_VERSION: &str = "2012-10-17";

/// `PolicyDocument` is an access policy attached to a queue.
/// Only `Statement` is interpreted, other keys are carried through untouched.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PolicyDocument {
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(rename = "Statement", default, deserialize_with = "one_or_many")]
    pub statement: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        PolicyDocument {
            version: Some(Value::from(POLICY_VERSION)),
            statement: Vec::new(),
            extra: Map::new(),
        }
    }
}

// `Statement` may be a single object instead of a list
fn one_or_many<'d, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'d>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(statements) => statements,
        Value::Null => Vec::new(),
        statement => vec![statement],
    })
}

/// Statement letting S3 send messages from one bucket of one account to the queue.
pub fn send_message_grant(sid: &str, queue_arn: &str, account: &str, bucket_arn: &str) -> Value {
    json!({
        "Sid": sid,
        "Effect": "Allow",
        "Principal": {
            "Service": "s3.amazonaws.com",
        },
        "Action": "sqs:SendMessage",
        "Resource": queue_arn,
        "Condition": {
            "StringEquals": {
                "aws:SourceAccount": account,
            },
            "ArnEquals": {
                "aws:SourceArn": bucket_arn,
            },
        },
    })
}
