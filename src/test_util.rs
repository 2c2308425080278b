use crate::{
    error::RuntimeError,
    event::{CustomResourceEvent, RequestType},
    grant::PolicyStore,
    notification::NotificationStore,
    policy::PolicyDocument,
    response::{CustomResourceResponse, Responder},
};
use async_trait::async_trait;
use aws_sdk_s3::{
    model::{Event, NotificationConfiguration, QueueConfiguration},
    Credentials,
};
use aws_smithy_http::body::SdkBody;
use aws_types::{region::Region, SdkConfig};
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

pub const ACCOUNT_ID: &str = "123456789012";
pub const QUEUE_ARN: &str = "arn:aws:sqs:us-west-1:123456789012:scan";
pub const OTHER_QUEUE_ARN: &str = "arn:aws:sqs:us-west-1:123456789012:other";
pub const RESPONSE_URL: &str = "https://cloudformation-custom-resource-response-uswest1.s3.amazonaws.com/response";

/// Configuration for mocking AWS SDK clients
pub async fn get_mock_config() -> SdkConfig {
    aws_config::from_env()
        .region(Region::new("us-west-1"))
        .credentials_provider(Credentials::new(
            "accesskey",
            "privatekey",
            None,
            None,
            "dummy",
        ))
        .load()
        .await
}

/// Body the SDK sent with `request`
pub fn sent_body(request: &http::Request<SdkBody>) -> String {
    String::from_utf8_lossy(request.body().bytes().unwrap_or_default()).into_owned()
}

/// Base request builder for the AWS SDK calls
pub fn get_request_builder(service: &str) -> http::request::Builder {
    http::Request::builder().uri(format!("https://{service}.us-west-1.amazonaws.com/"))
}

/// Properties of a notification custom resource for `bucket`
pub fn notification_properties(bucket: &str) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("account".into(), ACCOUNT_ID.into());
    properties.insert("s3Name".into(), bucket.into());
    properties
}

/// Properties of a grant custom resource for `bucket_arn`
pub fn grant_properties(bucket_arn: &str) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("account".into(), ACCOUNT_ID.into());
    properties.insert("s3Arn".into(), bucket_arn.into());
    properties
}

/// Lifecycle request for the logical id `abc`
pub fn request(
    request_type: RequestType,
    resource_properties: Option<Map<String, Value>>,
    old_resource_properties: Option<Map<String, Value>>,
) -> CustomResourceEvent {
    CustomResourceEvent {
        request_type,
        response_url: RESPONSE_URL.into(),
        stack_id: "arn:aws:cloudformation:us-west-1:123456789012:stack/virus-scan/guid".into(),
        request_id: "request-1".into(),
        resource_type: "Custom::Test".into(),
        logical_resource_id: "abc".into(),
        physical_resource_id: None,
        resource_properties,
        old_resource_properties,
    }
}

fn unavailable() -> aws_sdk_s3::Error {
    aws_sdk_s3::Error::Unhandled("service unavailable".into())
}

/// Bucket notifications kept in memory, counting calls
#[derive(Default)]
pub struct MemoryNotificationStore {
    buckets: Mutex<HashMap<String, NotificationConfiguration>>,
    fetches: AtomicUsize,
    stores: AtomicUsize,
    failing: bool,
    failing_bucket: Option<String>,
}

impl MemoryNotificationStore {
    /// A store whose writes always fail
    pub fn failing() -> Self {
        MemoryNotificationStore {
            failing: true,
            ..Default::default()
        }
    }

    /// A store whose writes fail for `bucket` only
    pub fn failing_on(bucket: &str) -> Self {
        MemoryNotificationStore {
            failing_bucket: Some(bucket.into()),
            ..Default::default()
        }
    }

    pub fn put(&self, bucket: &str, configuration: NotificationConfiguration) {
        self.buckets
            .lock()
            .unwrap()
            .insert(bucket.into(), configuration);
    }

    /// Seed `bucket` with queue configurations given as (id, queue arn)
    pub fn insert(&self, bucket: &str, queues: &[(&str, &str)]) {
        let queues = queues
            .iter()
            .map(|(id, arn)| {
                QueueConfiguration::builder()
                    .id(*id)
                    .queue_arn(*arn)
                    .events(Event::from("s3:ObjectCreated:*"))
                    .build()
            })
            .collect();
        self.put(
            bucket,
            NotificationConfiguration::builder()
                .set_queue_configurations(Some(queues))
                .build(),
        );
    }

    pub fn get(&self, bucket: &str) -> NotificationConfiguration {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .cloned()
            .unwrap_or_else(|| NotificationConfiguration::builder().build())
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn fetch(
        &self,
        _account: &str,
        bucket: &str,
    ) -> Result<NotificationConfiguration, RuntimeError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(bucket))
    }

    async fn store(
        &self,
        _account: &str,
        bucket: &str,
        configuration: NotificationConfiguration,
    ) -> Result<(), RuntimeError> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        if self.failing || self.failing_bucket.as_deref() == Some(bucket) {
            return Err(RuntimeError::S3(unavailable()));
        }
        self.put(bucket, configuration);
        Ok(())
    }
}

/// Queue policy kept in memory, counting calls
#[derive(Default)]
pub struct MemoryPolicyStore {
    policy: Mutex<Option<PolicyDocument>>,
    fetches: AtomicUsize,
    stores: AtomicUsize,
    failing: bool,
}

impl MemoryPolicyStore {
    /// A store whose reads always fail
    pub fn failing() -> Self {
        MemoryPolicyStore {
            failing: true,
            ..Default::default()
        }
    }

    pub fn with_statements(statement: Vec<Value>) -> Self {
        let store = MemoryPolicyStore::default();
        *store.policy.lock().unwrap() = Some(PolicyDocument {
            statement,
            ..Default::default()
        });
        store
    }

    pub fn get(&self) -> PolicyDocument {
        self.policy.lock().unwrap().clone().unwrap_or_default()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn fetch(&self) -> Result<PolicyDocument, RuntimeError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(RuntimeError::Sqs(aws_sdk_sqs::Error::Unhandled(
                "service unavailable".into(),
            )));
        }
        Ok(self.get())
    }

    async fn store(&self, policy: PolicyDocument) -> Result<(), RuntimeError> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        *self.policy.lock().unwrap() = Some(policy);
        Ok(())
    }
}

/// Responder keeping every response it is asked to send
#[derive(Default)]
pub struct RecordingResponder {
    sent: Mutex<Vec<(String, CustomResourceResponse)>>,
    failing: bool,
}

impl RecordingResponder {
    /// A responder whose uploads always fail
    pub fn failing() -> Self {
        RecordingResponder {
            failing: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, CustomResourceResponse)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn send(&self, url: &str, response: &CustomResourceResponse) -> Result<(), RuntimeError> {
        self.sent
            .lock()
            .unwrap()
            .push((url.to_owned(), response.clone()));
        if self.failing {
            // an unparsable url fails before any network call
            let err = reqwest::Client::new()
                .put("not a url")
                .build()
                .unwrap_err();
            return Err(RuntimeError::Response(err));
        }
        Ok(())
    }
}
