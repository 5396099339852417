//! Error types for ddb-emr-steps.
//!
//! This module maps AWS SDK errors to [`StepsError`].
//! Uses typed `SdkError` variant matching — no string parsing of debug output.

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = StepsError> = std::result::Result<T, E>;

/// Everything that can stop a step-generation run.
#[derive(Debug, Error)]
pub enum StepsError {
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Credentials(String),

    #[error("Access denied to {service}: {message}")]
    AccessDenied {
        service: &'static str,
        message: String,
    },

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("{0} request rate too high")]
    Throttled(&'static str),

    #[error("{service} operation failed: {message}")]
    Service {
        service: &'static str,
        message: String,
    },

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize steps: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// AWS service type for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwsService {
    DynamoDB,
    ApplicationAutoScaling,
}

impl AwsService {
    fn name(&self) -> &'static str {
        match self {
            AwsService::DynamoDB => "DynamoDB",
            AwsService::ApplicationAutoScaling => "Application Auto Scaling",
        }
    }
}

// ========== TYPED ERROR MAPPING ==========

/// Map non-service `SdkError` variants (dispatch failures, timeouts, etc.).
///
/// Returns `Some(StepsError)` for non-service errors, `None` for `ServiceError`.
fn map_outer_sdk_error<E, R>(err: &SdkError<E, R>, service: AwsService) -> Option<StepsError>
where
    E: std::fmt::Debug,
    R: std::fmt::Debug,
{
    match err {
        SdkError::DispatchFailure(dispatch) => {
            let msg = if dispatch.is_timeout() {
                format!(
                    "Connection timed out to {}. Check your network or endpoint.",
                    service.name()
                )
            } else if dispatch.is_io() {
                format!(
                    "Connection failed to {} (I/O error). Check if the endpoint is reachable.",
                    service.name()
                )
            } else {
                format!(
                    "Connection failed to {}. Check if the endpoint is reachable.",
                    service.name()
                )
            };
            Some(StepsError::Connection(msg))
        }
        SdkError::TimeoutError(_) => Some(StepsError::Connection(format!(
            "Connection timed out to {}. Check your network or endpoint.",
            service.name()
        ))),
        SdkError::ConstructionFailure(err) => {
            let msg = format!("{:?}", err);
            if msg.contains("credentials")
                || msg.contains("Credentials")
                || msg.contains("NoCredentialsError")
            {
                Some(StepsError::Credentials(
                    "No AWS credentials found. Configure credentials via environment variables \
                    (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY), AWS profile, or IAM role."
                        .to_string(),
                ))
            } else {
                Some(StepsError::Service {
                    service: service.name(),
                    message: format!("Failed to build request: {}", msg),
                })
            }
        }
        SdkError::ResponseError(err) => Some(StepsError::Service {
            service: service.name(),
            message: format!("Invalid response: {:?}", err),
        }),
        SdkError::ServiceError(_) => None,
        _ => Some(StepsError::Service {
            service: service.name(),
            message: format!("Unknown error: {:?}", err),
        }),
    }
}

/// Map service error codes shared by DynamoDB and Application Auto Scaling.
///
/// Returns `Some(StepsError)` if matched, `None` if the code needs service-specific handling.
fn map_common_service_code(
    code: Option<&str>,
    message: Option<&str>,
    service: AwsService,
) -> Option<StepsError> {
    let code = code?;

    match code {
        "UnrecognizedClientException" => Some(StepsError::Credentials(
            "Invalid AWS credentials. Check your access key and secret.".to_string(),
        )),
        "InvalidSignatureException" | "SignatureDoesNotMatch" => Some(StepsError::Credentials(
            "AWS signature mismatch. Check your secret access key.".to_string(),
        )),
        "ExpiredTokenException" | "ExpiredToken" => Some(StepsError::Credentials(
            "AWS credentials have expired. Refresh your session token.".to_string(),
        )),
        "AccessDeniedException" | "AccessDenied" => Some(StepsError::AccessDenied {
            service: service.name(),
            message: message.unwrap_or("Check your IAM permissions.").to_string(),
        }),
        "LimitExceededException"
        | "RequestLimitExceeded"
        | "Throttling"
        | "ThrottlingException"
        | "TooManyRequestsException" => Some(StepsError::Throttled(service.name())),
        _ => None,
    }
}

/// Map an SDK error from either service to a [`StepsError`].
///
/// For `ServiceError`, uses `ProvideErrorMetadata` to get the error code and message
/// instead of parsing debug strings. `table` names the table the call was about,
/// when there is one.
pub fn map_sdk_error<E, R>(err: SdkError<E, R>, service: AwsService, table: Option<&str>) -> StepsError
where
    E: ProvideErrorMetadata + std::fmt::Debug + std::fmt::Display,
    R: std::fmt::Debug,
{
    if let Some(mapped) = map_outer_sdk_error(&err, service) {
        return mapped;
    }

    if let Some(service_err) = err.as_service_error() {
        let code = service_err.code();
        let message = service_err.message();

        if let Some(mapped) = map_common_service_code(code, message, service) {
            return mapped;
        }

        return match (code, table) {
            (Some("ResourceNotFoundException"), Some(t)) => StepsError::TableNotFound(t.to_string()),
            _ => StepsError::Service {
                service: service.name(),
                message: message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| service_err.to_string()),
            },
        };
    }

    StepsError::Service {
        service: service.name(),
        message: format!("Unexpected error: {:?}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_access_denied_code() {
        let err = map_common_service_code(
            Some("AccessDeniedException"),
            Some("not allowed to ListTables"),
            AwsService::DynamoDB,
        );
        match err {
            Some(StepsError::AccessDenied { service, message }) => {
                assert_eq!(service, "DynamoDB");
                assert_eq!(message, "not allowed to ListTables");
            }
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_should_map_throttling_codes() {
        for code in ["ThrottlingException", "LimitExceededException"] {
            let err = map_common_service_code(Some(code), None, AwsService::ApplicationAutoScaling);
            assert!(matches!(
                err,
                Some(StepsError::Throttled("Application Auto Scaling"))
            ));
        }
    }

    #[test]
    fn test_should_leave_unknown_codes_to_caller() {
        assert!(map_common_service_code(Some("ValidationException"), None, AwsService::DynamoDB).is_none());
        assert!(map_common_service_code(None, None, AwsService::DynamoDB).is_none());
    }

    #[test]
    fn test_should_include_path_in_io_error() {
        let err = StepsError::Io {
            path: PathBuf::from("/tmp/out/exportSteps.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write /tmp/out/exportSteps.json: denied");
    }
}
