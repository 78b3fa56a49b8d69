//! Remote collaborator traits
//!
//! The lifecycle talks to the cloud only through these traits. Each method is
//! a single remote call; waiting, discovery and ordering live in
//! [`crate::lifecycle`].
//!
//! `get_*` must return [`CloudError::ResourceNotFound`](crate::CloudError::ResourceNotFound)
//! when the resource does not exist, so the waiter can tell a finished
//! deletion apart from a failed call.

use crate::error::Result;
use crate::resource::{
    Application, AvailabilityDomain, Compartment, FreeformTags, Function, InternetGateway,
    RouteRule, RouteTable, Subnet, Vcn,
};
use async_trait::async_trait;

/// Virtual networking operations
#[async_trait]
pub trait NetworkApi: Send + Sync {
    async fn create_vcn(&self, details: &CreateVcnDetails) -> Result<Vcn>;
    async fn get_vcn(&self, vcn_id: &str) -> Result<Vcn>;
    async fn list_vcns(&self, compartment_id: &str, display_name: &str) -> Result<Vec<Vcn>>;
    async fn delete_vcn(&self, vcn_id: &str) -> Result<()>;

    async fn create_internet_gateway(
        &self,
        details: &CreateInternetGatewayDetails,
    ) -> Result<InternetGateway>;
    async fn get_internet_gateway(&self, ig_id: &str) -> Result<InternetGateway>;
    async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<InternetGateway>>;
    async fn delete_internet_gateway(&self, ig_id: &str) -> Result<()>;

    async fn create_route_table(&self, details: &CreateRouteTableDetails) -> Result<RouteTable>;
    async fn get_route_table(&self, rt_id: &str) -> Result<RouteTable>;
    async fn list_route_tables(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<RouteTable>>;
    async fn delete_route_table(&self, rt_id: &str) -> Result<()>;

    async fn create_subnet(&self, details: &CreateSubnetDetails) -> Result<Subnet>;
    async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet>;
    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<Subnet>>;
    async fn delete_subnet(&self, subnet_id: &str) -> Result<()>;
}

/// Functions management and invocation
#[async_trait]
pub trait FunctionsApi: Send + Sync {
    async fn create_application(&self, details: &CreateApplicationDetails) -> Result<Application>;
    async fn get_application(&self, application_id: &str) -> Result<Application>;
    async fn list_applications(
        &self,
        compartment_id: &str,
        display_name: &str,
    ) -> Result<Vec<Application>>;
    async fn delete_application(&self, application_id: &str) -> Result<()>;

    async fn create_function(&self, details: &CreateFunctionDetails) -> Result<Function>;
    async fn get_function(&self, function_id: &str) -> Result<Function>;
    async fn list_functions(&self, application_id: &str, display_name: &str)
    -> Result<Vec<Function>>;
    async fn delete_function(&self, function_id: &str) -> Result<()>;

    /// Invoke synchronously and return the raw response body
    async fn invoke_function(&self, function: &Function, payload: &str) -> Result<String>;
}

/// Identity lookups
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn list_availability_domains(&self, compartment_id: &str)
    -> Result<Vec<AvailabilityDomain>>;

    /// All accessible compartments under `tenancy_id`, including nested ones
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateVcnDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub cidr_block: String,
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateInternetGatewayDetails {
    pub compartment_id: String,
    pub vcn_id: String,
    pub display_name: String,
    pub is_enabled: bool,
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateRouteTableDetails {
    pub compartment_id: String,
    pub vcn_id: String,
    pub display_name: String,
    pub route_rules: Vec<RouteRule>,
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubnetDetails {
    pub compartment_id: String,
    pub vcn_id: String,
    pub display_name: String,
    pub cidr_block: String,
    pub route_table_id: String,
    /// `None` creates a regional subnet
    pub availability_domain: Option<String>,
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateApplicationDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub subnet_ids: Vec<String>,
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateFunctionDetails {
    pub application_id: String,
    pub display_name: String,
    pub image: String,
    pub memory_in_mbs: u32,
    pub timeout_in_seconds: u32,
    pub freeform_tags: FreeformTags,
}
