//! Cloud lifecycle error types

use crate::resource::ResourceKind;
use thiserror::Error;

/// Errors raised while provisioning, invoking or tearing down resources
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("{kind} '{name}' does not exist. Run `fnflow setup` first")]
    NotProvisioned { kind: ResourceKind, name: String },

    #[error("{kind} '{name}' is {state}, not ready to use")]
    NotReady {
        kind: ResourceKind,
        name: String,
        state: String,
    },

    #[error("Found {count} {kind} resources named '{name}', expected at most one")]
    AmbiguousResource {
        kind: ResourceKind,
        name: String,
        count: usize,
    },

    #[error("Run '{run}' already has {kind} '{name}'. Run `fnflow teardown` first or pick another run name")]
    AlreadyProvisioned {
        run: String,
        kind: ResourceKind,
        name: String,
    },

    #[error("{kind} {id} entered the FAILED state")]
    ResourceFailed { kind: ResourceKind, id: String },

    #[error("Compartment not found: {0}")]
    CompartmentNotFound(String),

    #[error("No availability domain found in compartment {0}")]
    NoAvailabilityDomain(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether the remote side reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::ResourceNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
