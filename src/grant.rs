//! Statement owned by a custom resource inside the scan queue's access policy,
//! letting one bucket send it messages.
use crate::{
    error::{RuntimeError, ValidationError},
    event::{required, Properties, ACCOUNT, BUCKET_ARN},
    lifecycle::{Change, Reconciler},
    merge::Mutation,
    policy::{send_message_grant, PolicyDocument},
};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Read and replace the managed queue's access policy.
///
/// `store` replaces the whole document: statements written by a third
/// party between `fetch` and `store` are lost.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetch the policy. A queue without one yields an empty document.
    async fn fetch(&self) -> Result<PolicyDocument, RuntimeError>;

    async fn store(&self, policy: PolicyDocument) -> Result<(), RuntimeError>;
}

#[async_trait]
impl<T: PolicyStore + ?Sized> PolicyStore for &T {
    async fn fetch(&self) -> Result<PolicyDocument, RuntimeError> {
        (**self).fetch().await
    }

    async fn store(&self, policy: PolicyDocument) -> Result<(), RuntimeError> {
        (**self).store(policy).await
    }
}

/// `GrantProperties` are the custom resource properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrantProperties {
    pub account: String,
    pub bucket_arn: String,
}

/// Keeps one `sqs:SendMessage` statement, with the logical id as `Sid`,
/// in the queue policy.
pub struct GrantSendReconciler<S> {
    store: S,
    queue_arn: String,
}

impl<S: PolicyStore> GrantSendReconciler<S> {
    pub fn new(store: S, queue_arn: impl Into<String>) -> Self {
        GrantSendReconciler {
            store,
            queue_arn: queue_arn.into(),
        }
    }
}

#[async_trait]
impl<S: PolicyStore> Reconciler for GrantSendReconciler<S> {
    type Properties = GrantProperties;

    const FAILURE_REASON: &'static str = "Cannot update SQS Queue send message permission.";

    fn parse(
        properties: &Map<String, Value>,
        which: Properties,
    ) -> Result<GrantProperties, ValidationError> {
        Ok(GrantProperties {
            account: required(properties, ACCOUNT, which)?,
            bucket_arn: required(properties, BUCKET_ARN, which)?,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn reconcile(
        &self,
        logical_id: &str,
        change: &Change<GrantProperties>,
    ) -> Result<(), RuntimeError> {
        let mutation = match change {
            Change::Create(current) | Change::Update { current, .. } => {
                Mutation::Upsert(send_message_grant(
                    logical_id,
                    &self.queue_arn,
                    &current.account,
                    &current.bucket_arn,
                ))
            }
            Change::Delete(_) => Mutation::Remove(logical_id.to_owned()),
        };

        let mut policy = self.store.fetch().await?;
        policy.statement = mutation.apply(Some(policy.statement));
        self.store.store(policy).await
    }
}
