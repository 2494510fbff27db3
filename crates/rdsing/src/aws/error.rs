//! AWS error classification and handling
//!
//! RDS SDK errors are classified by their `.code()` as soon as a call fails,
//! so the rest of the crate only ever sees an [`AwsError`] at the root of an
//! `anyhow` chain.

use aws_sdk_rds::error::ProvideErrorMetadata;
use thiserror::Error;

/// AWS error categories
#[derive(Debug, Error)]
pub enum AwsError {
    /// Instance, snapshot or security group does not exist
    #[error("Resource not found: {message}")]
    NotFound { code: String, message: String },

    /// Identifier is already taken
    #[error("Resource already exists: {message}")]
    AlreadyExists { code: String, message: String },

    /// Resource is busy or in a state that rejects the request
    #[error("Invalid resource state: {message}")]
    InvalidState { code: String, message: String },

    /// Account quota or regional capacity exhausted
    #[error("Quota or capacity exceeded: {message}")]
    QuotaExceeded { code: String, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    Throttled,

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Check if this is an "already exists" error
    pub fn is_already_exists(&self) -> bool {
        matches!(self, AwsError::AlreadyExists { .. })
    }

    /// The AWS error code, when the service returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            AwsError::NotFound { code, .. }
            | AwsError::AlreadyExists { code, .. }
            | AwsError::InvalidState { code, .. }
            | AwsError::QuotaExceeded { code, .. } => Some(code.as_str()),
            AwsError::Throttled => None,
            AwsError::Sdk { code, .. } => code.as_deref(),
        }
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            AwsError::Throttled => suggestion_for_code("Throttling"),
            _ => self.code().and_then(suggestion_for_code),
        }
    }
}

/// Known RDS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &[
    "DBInstanceNotFound",
    "DBInstanceNotFoundFault",
    "DBSnapshotNotFound",
    "DBSnapshotNotFoundFault",
    "DBSecurityGroupNotFound",
    "DBSecurityGroupNotFoundFault",
    "DBSubnetGroupNotFoundFault",
    "DBParameterGroupNotFound",
    "OptionGroupNotFoundFault",
];

/// Known RDS error codes for "already exists" conditions
const ALREADY_EXISTS_CODES: &[&str] = &[
    "DBInstanceAlreadyExists",
    "DBInstanceAlreadyExistsFault",
    "DBSnapshotAlreadyExists",
    "DBSnapshotAlreadyExistsFault",
];

/// Known RDS error codes for requests rejected because of resource state
const INVALID_STATE_CODES: &[&str] = &[
    "InvalidDBInstanceState",
    "InvalidDBInstanceStateFault",
    "InvalidDBSnapshotState",
    "InvalidDBSnapshotStateFault",
    "InvalidDBSecurityGroupState",
    "InvalidRestoreFault",
];

/// Known RDS error codes for quota and capacity limits
const QUOTA_CODES: &[&str] = &[
    "InstanceQuotaExceeded",
    "InstanceQuotaExceededFault",
    "StorageQuotaExceeded",
    "StorageQuotaExceededFault",
    "SnapshotQuotaExceeded",
    "SnapshotQuotaExceededFault",
    "InsufficientDBInstanceCapacity",
    "InsufficientDBInstanceCapacityFault",
];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound {
            code: c.to_string(),
            message,
        },
        Some(c) if ALREADY_EXISTS_CODES.contains(&c) => AwsError::AlreadyExists {
            code: c.to_string(),
            message,
        },
        Some(c) if INVALID_STATE_CODES.contains(&c) => AwsError::InvalidState {
            code: c.to_string(),
            message,
        },
        Some(c) if QUOTA_CODES.contains(&c) => AwsError::QuotaExceeded {
            code: c.to_string(),
            message,
        },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Convert a failed SDK call into an `anyhow::Error` rooted at its [`AwsError`].
///
/// Errors without service metadata (dispatch, timeout, credential failures)
/// keep their display text so the operator still sees what went wrong.
pub fn sdk_error<E>(err: E) -> anyhow::Error
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let classified = if err.code().is_some() {
        classify_aws_error(err.code(), err.message())
    } else {
        AwsError::Sdk {
            code: None,
            message: error_text(&err),
        }
    };
    anyhow::Error::new(classified)
}

/// Render an error with its sources on one line.
fn error_text(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Find the [`AwsError`] at the root of an error chain, if any.
pub fn classify_anyhow_error(error: &anyhow::Error) -> Option<&AwsError> {
    error.chain().find_map(|cause| cause.downcast_ref::<AwsError>())
}

/// Error code to user-friendly suggestion mapping
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "DBInstanceNotFound",
        "Check the instance name with `aws rds describe-db-instances` and the --region flag.",
    ),
    (
        "DBSnapshotNotFound",
        "The snapshot was deleted while the restore was starting. Run the restore again.",
    ),
    (
        "DBSecurityGroupNotFound",
        "Check the --group values. VPC security groups must be given by their sg- id.",
    ),
    (
        "DBInstanceAlreadyExists",
        "An instance with this identifier already exists. Wait a second and retry.",
    ),
    (
        "DBSnapshotAlreadyExists",
        "Choose a different --snapshot name for the final snapshot.",
    ),
    (
        "InvalidDBInstanceState",
        "The instance is busy (modifying, backing up or already deleting). Retry once it is available.",
    ),
    (
        "InvalidDBSnapshotState",
        "The latest snapshot is not available yet. Wait for it to finish and retry.",
    ),
    (
        "InstanceQuotaExceeded",
        "Request a limit increase via the AWS Service Quotas console or destroy unused instances.",
    ),
    (
        "StorageQuotaExceeded",
        "Request a storage limit increase via the AWS Service Quotas console.",
    ),
    (
        "SnapshotQuotaExceeded",
        "Delete old manual snapshots or request a limit increase.",
    ),
    (
        "InsufficientDBInstanceCapacity",
        "Try a different --instancetype or retry later.",
    ),
    (
        "InvalidParameterCombination",
        "Check that --iops, --storage-type and --instancetype are compatible with the engine.",
    ),
    (
        "Throttling",
        "AWS API rate limit hit. Wait a moment and run the command again.",
    ),
];

/// Get a user-friendly suggestion for a known error code.
///
/// Codes with a trailing `Fault` share the suggestion of their short form.
fn suggestion_for_code(code: &str) -> Option<String> {
    let code = code.strip_suffix("Fault").unwrap_or(code);
    let code = match code {
        "ThrottlingException" | "RequestLimitExceeded" => "Throttling",
        other => other,
    };
    SUGGESTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| (*s).to_string())
}
