use crate::{error::RuntimeError, notification::NotificationStore};
use async_trait::async_trait;
use aws_sdk_s3::{model::NotificationConfiguration, Client, Error};

/// Notification store backed by the S3 API.
pub struct S3NotificationStore {
    inner: Client,
}

impl S3NotificationStore {
    #[tracing::instrument(skip(config))]
    pub fn new(config: &aws_types::SdkConfig) -> S3NotificationStore {
        tracing::info!("Initializing S3 client");
        S3NotificationStore {
            inner: Client::new(config),
        }
    }
}

#[async_trait]
impl NotificationStore for S3NotificationStore {
    #[tracing::instrument(skip(self))]
    async fn fetch(
        &self,
        account: &str,
        bucket: &str,
    ) -> Result<NotificationConfiguration, RuntimeError> {
        let res = self
            .inner
            .get_bucket_notification_configuration()
            .bucket(bucket)
            .expected_bucket_owner(account)
            .send()
            .await
            .map_err(Error::from)?;

        tracing::info!(queues = ?res.queue_configurations, "fetched queue notifications");
        if res.queue_configurations.is_none() {
            tracing::warn!("{} queue notification is undefined or empty", bucket);
        }

        Ok(NotificationConfiguration::builder()
            .set_topic_configurations(res.topic_configurations)
            .set_queue_configurations(res.queue_configurations)
            .set_lambda_function_configurations(res.lambda_function_configurations)
            .set_event_bridge_configuration(res.event_bridge_configuration)
            .build())
    }

    #[tracing::instrument(skip(self, configuration))]
    async fn store(
        &self,
        account: &str,
        bucket: &str,
        configuration: NotificationConfiguration,
    ) -> Result<(), RuntimeError> {
        tracing::info!(
            queues = ?configuration.queue_configurations,
            "replacing queue notifications"
        );

        self.inner
            .put_bucket_notification_configuration()
            .bucket(bucket)
            .expected_bucket_owner(account)
            .notification_configuration(configuration)
            .send()
            .await
            .map_err(Error::from)?;

        Ok(())
    }
}
