//! fnflow cloud lifecycle
//!
//! Resource model, collaborator traits and the setup / invoke / teardown
//! orchestration for a single serverless function and the network it runs
//! in. Provider crates (e.g. `fnflow-cloud-oci`) implement the traits in
//! [`api`]; the lifecycle only ever sees those traits.
//!
//! ```text
//! setup:    VCN → Internet Gateway → Route Table → Subnet → Application → Function
//! teardown: Function → Application → Subnet → Route Table → Internet Gateway → VCN
//! ```

pub mod api;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod report;
pub mod resource;
pub mod waiter;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use api::{
    CreateApplicationDetails, CreateFunctionDetails, CreateInternetGatewayDetails,
    CreateRouteTableDetails, CreateSubnetDetails, CreateVcnDetails, FunctionsApi, IdentityApi,
    NetworkApi,
};
pub use error::{CloudError, Result};
pub use lifecycle::{
    DEFAULT_MEMORY_MBS, DEFAULT_SUBNET_CIDR, DEFAULT_TIMEOUT_SECONDS, DEFAULT_VCN_CIDR,
    DiscoveredResources, FunctionLifecycle, SetupRequest, SubnetPlacement, resolve_compartment,
};
pub use naming::{DEFAULT_RUN_NAME, RUN_TAG, ResourceNames};
pub use report::{ProvisionedResources, StepOutcome, TeardownReport, TeardownStep, TeardownSummary};
pub use resource::{
    Application, AvailabilityDomain, Compartment, FreeformTags, Function, InternetGateway,
    LifecycleState, Resource, ResourceKind, RouteRule, RouteTable, Subnet, Vcn,
};
pub use waiter::WaitConfig;
