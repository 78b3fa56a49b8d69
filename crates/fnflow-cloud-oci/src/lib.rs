//! Oracle Cloud Infrastructure provider for fnflow
//!
//! Implements the `fnflow-cloud` collaborator traits on top of the `oci`
//! CLI, so networking, Functions and identity calls all go through one
//! authenticated tool.
//!
//! # Requirements
//!
//! - `oci` CLI must be installed and configured (`oci setup config`)
//! - Authentication is read from the CLI's config file and profile
//!
//! # Example
//!
//! ```ignore
//! use fnflow_cloud::{FunctionLifecycle, ResourceNames};
//! use fnflow_cloud_oci::{OciCli, OciProvider};
//!
//! let provider = OciProvider::new(OciCli::new().with_profile("DEFAULT"));
//! let lifecycle = FunctionLifecycle::new(&provider, &provider, &provider, ResourceNames::default());
//! let response = lifecycle.invoke(&compartment_id, "hello").await?;
//! ```

pub mod error;
pub mod oci_cli;
pub mod provider;

pub use error::{OciError, Result};
pub use oci_cli::OciCli;
pub use provider::OciProvider;
