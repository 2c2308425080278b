use crate::{error::RuntimeError, grant::PolicyStore, policy::PolicyDocument};
use async_trait::async_trait;
use aws_sdk_sqs::{model::QueueAttributeName, Client, Error};

/// Policy store backed by the `Policy` attribute of an SQS queue.
pub struct SqsPolicyStore {
    inner: Client,
    queue_url: String,
}

impl SqsPolicyStore {
    #[tracing::instrument(skip(config))]
    pub fn new(config: &aws_types::SdkConfig, queue_url: &str) -> SqsPolicyStore {
        tracing::info!("Initializing SQS client");
        SqsPolicyStore {
            inner: Client::new(config),
            queue_url: queue_url.into(),
        }
    }
}

#[async_trait]
impl PolicyStore for SqsPolicyStore {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self) -> Result<PolicyDocument, RuntimeError> {
        let res = self
            .inner
            .get_queue_attributes()
            .queue_url(&self.queue_url)
            .attribute_names(QueueAttributeName::Policy)
            .send()
            .await
            .map_err(Error::from)?;

        let policy = res
            .attributes
            .and_then(|mut attributes| attributes.remove(&QueueAttributeName::Policy))
            .filter(|policy| !policy.is_empty());

        match policy {
            Some(policy) => {
                tracing::info!(%policy, "fetched queue policy");
                Ok(serde_json::from_str(&policy)?)
            }
            None => {
                tracing::warn!("{} policy is undefined or empty", self.queue_url);
                Ok(PolicyDocument::default())
            }
        }
    }

    #[tracing::instrument(skip(self, policy))]
    async fn store(&self, policy: PolicyDocument) -> Result<(), RuntimeError> {
        let policy = serde_json::to_string(&policy)?;
        tracing::info!(%policy, "replacing queue policy");

        self.inner
            .set_queue_attributes()
            .queue_url(&self.queue_url)
            .attributes(QueueAttributeName::Policy, policy)
            .send()
            .await
            .map_err(Error::from)?;

        Ok(())
    }
}
