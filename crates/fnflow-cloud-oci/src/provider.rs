//! OCI provider implementation

use crate::oci_cli::OciCli;
use async_trait::async_trait;
use fnflow_cloud::{
    Application, AvailabilityDomain, Compartment, CreateApplicationDetails, CreateFunctionDetails,
    CreateInternetGatewayDetails, CreateRouteTableDetails, CreateSubnetDetails, CreateVcnDetails,
    Function, FunctionsApi, IdentityApi, InternetGateway, NetworkApi, RouteTable, Subnet, Vcn,
};

/// Oracle Cloud Infrastructure provider backed by the `oci` CLI
pub struct OciProvider {
    cli: OciCli,
}

impl OciProvider {
    pub fn new(cli: OciCli) -> Self {
        Self { cli }
    }

    /// Fail early with a readable error when the CLI is missing
    pub async fn check_cli(&self) -> fnflow_cloud::Result<String> {
        let version = self.cli.version().await?;
        tracing::debug!("oci CLI version {}", version);
        Ok(version)
    }
}

#[async_trait]
impl NetworkApi for OciProvider {
    async fn create_vcn(&self, details: &CreateVcnDetails) -> fnflow_cloud::Result<Vcn> {
        Ok(self.cli.create_vcn(details).await?)
    }

    async fn get_vcn(&self, vcn_id: &str) -> fnflow_cloud::Result<Vcn> {
        Ok(self.cli.get_vcn(vcn_id).await?)
    }

    async fn list_vcns(
        &self,
        compartment_id: &str,
        display_name: &str,
    ) -> fnflow_cloud::Result<Vec<Vcn>> {
        Ok(self.cli.list_vcns(compartment_id, display_name).await?)
    }

    async fn delete_vcn(&self, vcn_id: &str) -> fnflow_cloud::Result<()> {
        Ok(self.cli.delete_vcn(vcn_id).await?)
    }

    async fn create_internet_gateway(
        &self,
        details: &CreateInternetGatewayDetails,
    ) -> fnflow_cloud::Result<InternetGateway> {
        Ok(self.cli.create_internet_gateway(details).await?)
    }

    async fn get_internet_gateway(&self, ig_id: &str) -> fnflow_cloud::Result<InternetGateway> {
        Ok(self.cli.get_internet_gateway(ig_id).await?)
    }

    async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> fnflow_cloud::Result<Vec<InternetGateway>> {
        Ok(self
            .cli
            .list_internet_gateways(compartment_id, vcn_id, display_name)
            .await?)
    }

    async fn delete_internet_gateway(&self, ig_id: &str) -> fnflow_cloud::Result<()> {
        Ok(self.cli.delete_internet_gateway(ig_id).await?)
    }

    async fn create_route_table(
        &self,
        details: &CreateRouteTableDetails,
    ) -> fnflow_cloud::Result<RouteTable> {
        Ok(self.cli.create_route_table(details).await?)
    }

    async fn get_route_table(&self, rt_id: &str) -> fnflow_cloud::Result<RouteTable> {
        Ok(self.cli.get_route_table(rt_id).await?)
    }

    async fn list_route_tables(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> fnflow_cloud::Result<Vec<RouteTable>> {
        Ok(self
            .cli
            .list_route_tables(compartment_id, vcn_id, display_name)
            .await?)
    }

    async fn delete_route_table(&self, rt_id: &str) -> fnflow_cloud::Result<()> {
        Ok(self.cli.delete_route_table(rt_id).await?)
    }

    async fn create_subnet(&self, details: &CreateSubnetDetails) -> fnflow_cloud::Result<Subnet> {
        Ok(self.cli.create_subnet(details).await?)
    }

    async fn get_subnet(&self, subnet_id: &str) -> fnflow_cloud::Result<Subnet> {
        Ok(self.cli.get_subnet(subnet_id).await?)
    }

    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> fnflow_cloud::Result<Vec<Subnet>> {
        Ok(self
            .cli
            .list_subnets(compartment_id, vcn_id, display_name)
            .await?)
    }

    async fn delete_subnet(&self, subnet_id: &str) -> fnflow_cloud::Result<()> {
        Ok(self.cli.delete_subnet(subnet_id).await?)
    }
}

#[async_trait]
impl FunctionsApi for OciProvider {
    async fn create_application(
        &self,
        details: &CreateApplicationDetails,
    ) -> fnflow_cloud::Result<Application> {
        Ok(self.cli.create_application(details).await?)
    }

    async fn get_application(&self, application_id: &str) -> fnflow_cloud::Result<Application> {
        Ok(self.cli.get_application(application_id).await?)
    }

    async fn list_applications(
        &self,
        compartment_id: &str,
        display_name: &str,
    ) -> fnflow_cloud::Result<Vec<Application>> {
        Ok(self
            .cli
            .list_applications(compartment_id, display_name)
            .await?)
    }

    async fn delete_application(&self, application_id: &str) -> fnflow_cloud::Result<()> {
        Ok(self.cli.delete_application(application_id).await?)
    }

    async fn create_function(
        &self,
        details: &CreateFunctionDetails,
    ) -> fnflow_cloud::Result<Function> {
        Ok(self.cli.create_function(details).await?)
    }

    async fn get_function(&self, function_id: &str) -> fnflow_cloud::Result<Function> {
        Ok(self.cli.get_function(function_id).await?)
    }

    async fn list_functions(
        &self,
        application_id: &str,
        display_name: &str,
    ) -> fnflow_cloud::Result<Vec<Function>> {
        Ok(self.cli.list_functions(application_id, display_name).await?)
    }

    async fn delete_function(&self, function_id: &str) -> fnflow_cloud::Result<()> {
        Ok(self.cli.delete_function(function_id).await?)
    }

    async fn invoke_function(
        &self,
        function: &Function,
        payload: &str,
    ) -> fnflow_cloud::Result<String> {
        if function.invoke_endpoint.is_none() {
            tracing::warn!(
                "Function {} has no invoke endpoint yet; the CLI will look it up",
                function.id
            );
        }
        Ok(self.cli.invoke_function(&function.id, payload).await?)
    }
}

#[async_trait]
impl IdentityApi for OciProvider {
    async fn list_availability_domains(
        &self,
        compartment_id: &str,
    ) -> fnflow_cloud::Result<Vec<AvailabilityDomain>> {
        Ok(self.cli.list_availability_domains(compartment_id).await?)
    }

    async fn list_compartments(&self, tenancy_id: &str) -> fnflow_cloud::Result<Vec<Compartment>> {
        Ok(self.cli.list_compartments(tenancy_id).await?)
    }
}
