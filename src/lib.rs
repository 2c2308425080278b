//! <fullname>Virus scan custom resources</fullname>
//!
//! Lambda functions backing the CloudFormation custom resources of the
//! virus scan stack. Each one owns a single entry, keyed by the resource's
//! logical id, inside a document other consumers share: a queue
//! notification in a bucket's notification configuration, or a
//! `sqs:SendMessage` statement in the scan queue's policy.
//!
//! Every invocation reads the document, edits its own entry and writes the
//! whole document back. There is no locking: two writers racing on the
//! same document can lose an update.

/// `config` reads the settings the functions need at cold start
pub mod config;

mod error;
pub use error::{RuntimeError, ValidationError};

/// `event` models the CloudFormation custom resource request
pub mod event;
pub use event::CustomResourceEvent;

/// `grant` manages the queue policy statement
pub mod grant;

/// `lifecycle` validates requests and reports their outcome
pub mod lifecycle;
pub use lifecycle::handle_event;

/// `merge` edits shared lists by entry identifier
pub mod merge;

/// `notification` manages the bucket queue notification
pub mod notification;

/// `policy` models SQS access policy documents
pub mod policy;

/// `response` sends outcomes back to CloudFormation
pub mod response;

mod s3;
pub use s3::S3NotificationStore;

mod sqs;
pub use sqs::SqsPolicyStore;

#[cfg(test)]
mod test_util;
