//! Queue subscription owned by a custom resource inside an S3 bucket's
//! notification configuration.
use crate::{
    error::{RuntimeError, ValidationError},
    event::{required, Properties, ACCOUNT, BUCKET_NAME},
    lifecycle::{Change, Reconciler},
    merge::Mutation,
};
use async_trait::async_trait;
use aws_sdk_s3::model::{Event, NotificationConfiguration, QueueConfiguration};
use serde_json::{Map, Value};

/// Event type the scan queue subscribes to.
pub const OBJECT_CREATED: &str = "s3:ObjectCreated:*";

/// Read and replace a bucket's notification configuration.
///
/// `store` replaces the whole configuration: anything written by a third
/// party between `fetch` and `store` is lost.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Fetch the configuration. A bucket without one yields an empty configuration.
    async fn fetch(
        &self,
        account: &str,
        bucket: &str,
    ) -> Result<NotificationConfiguration, RuntimeError>;

    async fn store(
        &self,
        account: &str,
        bucket: &str,
        configuration: NotificationConfiguration,
    ) -> Result<(), RuntimeError>;
}

#[async_trait]
impl<T: NotificationStore + ?Sized> NotificationStore for &T {
    async fn fetch(
        &self,
        account: &str,
        bucket: &str,
    ) -> Result<NotificationConfiguration, RuntimeError> {
        (**self).fetch(account, bucket).await
    }

    async fn store(
        &self,
        account: &str,
        bucket: &str,
        configuration: NotificationConfiguration,
    ) -> Result<(), RuntimeError> {
        (**self).store(account, bucket, configuration).await
    }
}

/// `NotificationProperties` are the custom resource properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationProperties {
    pub account: String,
    pub bucket_name: String,
}

/// Keeps one queue configuration, identified by the logical id, in the bucket's
/// notification configuration.
pub struct NotificationReconciler<S> {
    store: S,
    queue_arn: String,
}

impl<S: NotificationStore> NotificationReconciler<S> {
    pub fn new(store: S, queue_arn: impl Into<String>) -> Self {
        NotificationReconciler {
            store,
            queue_arn: queue_arn.into(),
        }
    }

    /// The queue configuration owned by `logical_id`.
    pub fn queue_configuration(&self, logical_id: &str) -> QueueConfiguration {
        QueueConfiguration::builder()
            .id(logical_id)
            .events(Event::from(OBJECT_CREATED))
            .queue_arn(&self.queue_arn)
            .build()
    }

    /// Read-modify-write of a single bucket.
    async fn rewrite(
        &self,
        properties: &NotificationProperties,
        mutation: Mutation<QueueConfiguration>,
    ) -> Result<(), RuntimeError> {
        let configuration = self
            .store
            .fetch(&properties.account, &properties.bucket_name)
            .await?;
        self.store
            .store(
                &properties.account,
                &properties.bucket_name,
                apply(configuration, mutation),
            )
            .await
    }

    /// Move the entry from the previous bucket to the current one.
    #[tracing::instrument(skip(self))]
    async fn relocate(
        &self,
        logical_id: &str,
        current: &NotificationProperties,
        previous: &NotificationProperties,
    ) -> Result<(), RuntimeError> {
        let (fresh, stale) = tokio::try_join!(
            self.store.fetch(&current.account, &current.bucket_name),
            self.store.fetch(&previous.account, &previous.bucket_name),
        )?;

        let fresh = apply(fresh, Mutation::Upsert(self.queue_configuration(logical_id)));
        let stale = apply(stale, Mutation::Remove(logical_id.to_owned()));

        // wait for both writes, even when one of them fails
        let (fresh, stale) = tokio::join!(
            self.store.store(&current.account, &current.bucket_name, fresh),
            self.store.store(&previous.account, &previous.bucket_name, stale),
        );
        fresh.and(stale)
    }
}

/// Apply the mutation to the queue configurations, leaving topic,
/// lambda and EventBridge configurations alone.
fn apply(
    mut configuration: NotificationConfiguration,
    mutation: Mutation<QueueConfiguration>,
) -> NotificationConfiguration {
    configuration.queue_configurations =
        Some(mutation.apply(configuration.queue_configurations.take()));
    configuration
}

#[async_trait]
impl<S: NotificationStore> Reconciler for NotificationReconciler<S> {
    type Properties = NotificationProperties;

    const FAILURE_REASON: &'static str = "Cannot update S3 Bucket notification configuration.";

    fn parse(
        properties: &Map<String, Value>,
        which: Properties,
    ) -> Result<NotificationProperties, ValidationError> {
        Ok(NotificationProperties {
            account: required(properties, ACCOUNT, which)?,
            bucket_name: required(properties, BUCKET_NAME, which)?,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn reconcile(
        &self,
        logical_id: &str,
        change: &Change<NotificationProperties>,
    ) -> Result<(), RuntimeError> {
        match change {
            Change::Update { current, previous } if current.bucket_name != previous.bucket_name => {
                tracing::info!("bucket renamed, moving queue notification");
                self.relocate(logical_id, current, previous).await
            }
            Change::Create(current) | Change::Update { current, .. } => {
                self.rewrite(current, Mutation::Upsert(self.queue_configuration(logical_id)))
                    .await
            }
            Change::Delete(current) => {
                self.rewrite(current, Mutation::Remove(logical_id.to_owned()))
                    .await
            }
        }
    }
}
