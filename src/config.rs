use crate::error::RuntimeError;

/// Environment variable holding the ARN of the scan queue.
pub const QUEUE_ARN_VAR: &str = "sqsArn";
/// Environment variable holding the URL of the scan queue.
pub const QUEUE_URL_VAR: &str = "sqsUrl";

const LOG_GROUP_VAR: &str = "AWS_LAMBDA_LOG_GROUP_NAME";
const LOG_STREAM_VAR: &str = "AWS_LAMBDA_LOG_STREAM_NAME";

/// Where this function's logs end up, referenced in every success reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLocation {
    pub log_group: String,
    pub log_stream: String,
}

impl LogLocation {
    pub fn reason(&self) -> String {
        format!(
            "See the details in CloudWatch Log Group Stream: {} {}",
            self.log_group, self.log_stream
        )
    }
}

/// Settings read once at cold start.
pub struct Environment<F> {
    lookup: F,
}

impl Environment<fn(&str) -> Option<String>> {
    /// Read settings from the process environment.
    pub fn process() -> Self {
        Environment { lookup: process_var }
    }
}

fn process_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl<F> Environment<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Environment { lookup }
    }

    fn required(&self, name: &'static str) -> Result<String, RuntimeError> {
        (self.lookup)(name)
            .filter(|value| !value.is_empty())
            .ok_or(RuntimeError::MissingEnvironment(name))
    }

    /// ARN of the queue that receives the bucket notifications.
    pub fn queue_arn(&self) -> Result<String, RuntimeError> {
        self.required(QUEUE_ARN_VAR)
    }

    /// URL of the queue whose policy is managed.
    pub fn queue_url(&self) -> Result<String, RuntimeError> {
        self.required(QUEUE_URL_VAR)
    }

    pub fn log_location(&self) -> LogLocation {
        let unknown = || "unknown".to_string();
        LogLocation {
            log_group: (self.lookup)(LOG_GROUP_VAR).unwrap_or_else(unknown),
            log_stream: (self.lookup)(LOG_STREAM_VAR).unwrap_or_else(unknown),
        }
    }
}
