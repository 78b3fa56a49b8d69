//! OCI provider error types

use fnflow_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OciError {
    #[error("oci CLI not found. Please install: brew install oci-cli")]
    OciCliNotFound,

    #[error("oci command failed: {0}")]
    CommandFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service error {status} {code}: {message}")]
    ServiceError {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Unexpected oci output: {0}")]
    UnexpectedOutput(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<OciError> for CloudError {
    fn from(err: OciError) -> Self {
        match err {
            OciError::NotFound(what) => CloudError::ResourceNotFound(what),
            OciError::OciCliNotFound | OciError::CommandFailed(_) => {
                CloudError::CommandFailed(err.to_string())
            }
            OciError::JsonError(e) => CloudError::Json(e),
            OciError::IoError(e) => CloudError::Io(e),
            other => CloudError::ApiError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, OciError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let err: CloudError = OciError::NotFound("ocid1.vcn.oc1..x".to_string()).into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_service_error_maps_to_api_error() {
        let err: CloudError = OciError::ServiceError {
            status: 409,
            code: "Conflict".to_string(),
            message: "Subnet still has attached VNICs".to_string(),
        }
        .into();
        assert!(matches!(err, CloudError::ApiError(ref m) if m.contains("Conflict")));
    }
}
