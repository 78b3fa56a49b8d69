//! fnflow configuration
//!
//! Settings are read once from the environment at start-up. The OCI CLI
//! profile is only consulted when the compartment is given by name and the
//! tenancy has to be looked up.

pub mod error;
pub mod oci_profile;
pub mod settings;

pub use error::*;
pub use oci_profile::{default_oci_config_path, expand_home, read_tenancy};
pub use settings::{
    ALLOWED_MEMORY_MBS, CompartmentRef, DEFAULT_OCI_PROFILE, Settings, TIMEOUT_RANGE_SECONDS,
};
