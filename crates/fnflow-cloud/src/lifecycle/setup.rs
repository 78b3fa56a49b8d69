use super::FunctionLifecycle;
use crate::api::{
    CreateApplicationDetails, CreateFunctionDetails, CreateInternetGatewayDetails,
    CreateRouteTableDetails, CreateSubnetDetails, CreateVcnDetails,
};
use crate::error::{CloudError, Result};
use crate::report::ProvisionedResources;
use crate::resource::{
    Application, Function, InternetGateway, ResourceKind, RouteRule, RouteTable, Subnet, Vcn,
};
use crate::waiter::wait_until_ready;

pub const DEFAULT_VCN_CIDR: &str = "10.0.0.0/16";
pub const DEFAULT_SUBNET_CIDR: &str = "10.0.0.0/24";
pub const DEFAULT_MEMORY_MBS: u32 = 128;
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 30;

/// Where the subnet lives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubnetPlacement {
    /// Regional subnet spanning every availability domain
    #[default]
    Regional,
    /// First availability domain reported for the compartment
    FirstAvailabilityDomain,
    AvailabilityDomain(String),
}

/// Inputs for a setup run
#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub compartment_id: String,
    pub image: String,
    pub vcn_cidr: String,
    pub subnet_cidr: String,
    pub placement: SubnetPlacement,
    pub memory_in_mbs: u32,
    pub timeout_in_seconds: u32,
}

impl SetupRequest {
    pub fn new(compartment_id: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            image: image.into(),
            vcn_cidr: DEFAULT_VCN_CIDR.to_string(),
            subnet_cidr: DEFAULT_SUBNET_CIDR.to_string(),
            placement: SubnetPlacement::default(),
            memory_in_mbs: DEFAULT_MEMORY_MBS,
            timeout_in_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl FunctionLifecycle<'_> {
    /// Create VCN → Internet Gateway → Route Table → Subnet → Application →
    /// Function, each one ready before the next is requested. Refuses to
    /// start while any resource of the same run is still live.
    pub async fn setup(&self, request: &SetupRequest) -> Result<ProvisionedResources> {
        let compartment_id = request.compartment_id.as_str();

        let existing = self.discover(compartment_id).await?;
        if let Some(kind) = ResourceKind::CREATION_ORDER
            .into_iter()
            .find(|kind| existing.lookup(*kind).is_some())
        {
            return Err(CloudError::AlreadyProvisioned {
                run: self.names.run().to_string(),
                kind,
                name: self.names.for_kind(kind),
            });
        }

        tracing::info!(
            "Setting up function resources for run '{}' in {}",
            self.names.run(),
            compartment_id
        );

        let vcn = self.create_vcn(compartment_id, &request.vcn_cidr).await?;
        let internet_gateway = self.create_internet_gateway(compartment_id, &vcn).await?;
        let route_table = self
            .create_route_table(compartment_id, &vcn, &internet_gateway)
            .await?;
        let availability_domain = self
            .resolve_placement(compartment_id, &request.placement)
            .await?;
        let subnet = self
            .create_subnet(
                compartment_id,
                &vcn,
                &route_table,
                &request.subnet_cidr,
                availability_domain,
            )
            .await?;
        let application = self.create_application(compartment_id, &subnet).await?;
        let function = self
            .create_function(
                &application,
                &request.image,
                request.memory_in_mbs,
                request.timeout_in_seconds,
            )
            .await?;

        Ok(ProvisionedResources {
            vcn,
            internet_gateway,
            route_table,
            subnet,
            application,
            function,
        })
    }

    pub async fn create_vcn(&self, compartment_id: &str, cidr_block: &str) -> Result<Vcn> {
        let details = CreateVcnDetails {
            compartment_id: compartment_id.to_string(),
            display_name: self.names.vcn(),
            cidr_block: cidr_block.to_string(),
            freeform_tags: self.names.tags(),
        };

        let created = self.network.create_vcn(&details).await?;
        let vcn = wait_until_ready(&self.wait, &created.id, || self.network.get_vcn(&created.id))
            .await?;
        tracing::info!("Created VCN: {} ({})", vcn.display_name, vcn.id);
        Ok(vcn)
    }

    pub async fn create_internet_gateway(
        &self,
        compartment_id: &str,
        vcn: &Vcn,
    ) -> Result<InternetGateway> {
        let details = CreateInternetGatewayDetails {
            compartment_id: compartment_id.to_string(),
            vcn_id: vcn.id.clone(),
            display_name: self.names.internet_gateway(),
            is_enabled: true,
            freeform_tags: self.names.tags(),
        };

        let created = self.network.create_internet_gateway(&details).await?;
        let ig = wait_until_ready(&self.wait, &created.id, || {
            self.network.get_internet_gateway(&created.id)
        })
        .await?;
        tracing::info!("Created Internet Gateway: {} ({})", ig.display_name, ig.id);
        Ok(ig)
    }

    /// Route table sending all egress traffic through the internet gateway
    pub async fn create_route_table(
        &self,
        compartment_id: &str,
        vcn: &Vcn,
        internet_gateway: &InternetGateway,
    ) -> Result<RouteTable> {
        let details = CreateRouteTableDetails {
            compartment_id: compartment_id.to_string(),
            vcn_id: vcn.id.clone(),
            display_name: self.names.route_table(),
            route_rules: vec![RouteRule::default_route(&internet_gateway.id)],
            freeform_tags: self.names.tags(),
        };

        let created = self.network.create_route_table(&details).await?;
        let rt = wait_until_ready(&self.wait, &created.id, || {
            self.network.get_route_table(&created.id)
        })
        .await?;
        tracing::info!("Created Route Table: {} ({})", rt.display_name, rt.id);
        Ok(rt)
    }

    pub async fn create_subnet(
        &self,
        compartment_id: &str,
        vcn: &Vcn,
        route_table: &RouteTable,
        cidr_block: &str,
        availability_domain: Option<String>,
    ) -> Result<Subnet> {
        let details = CreateSubnetDetails {
            compartment_id: compartment_id.to_string(),
            vcn_id: vcn.id.clone(),
            display_name: self.names.subnet(),
            cidr_block: cidr_block.to_string(),
            route_table_id: route_table.id.clone(),
            availability_domain,
            freeform_tags: self.names.tags(),
        };

        let created = self.network.create_subnet(&details).await?;
        let subnet = wait_until_ready(&self.wait, &created.id, || {
            self.network.get_subnet(&created.id)
        })
        .await?;
        tracing::info!("Created Subnet: {} ({})", subnet.display_name, subnet.id);
        Ok(subnet)
    }

    pub async fn create_application(
        &self,
        compartment_id: &str,
        subnet: &Subnet,
    ) -> Result<Application> {
        let details = CreateApplicationDetails {
            compartment_id: compartment_id.to_string(),
            display_name: self.names.application(),
            subnet_ids: vec![subnet.id.clone()],
            freeform_tags: self.names.tags(),
        };

        let created = self.functions.create_application(&details).await?;
        let app = wait_until_ready(&self.wait, &created.id, || {
            self.functions.get_application(&created.id)
        })
        .await?;
        tracing::info!("Created Application: {} ({})", app.display_name, app.id);
        Ok(app)
    }

    pub async fn create_function(
        &self,
        application: &Application,
        image: &str,
        memory_in_mbs: u32,
        timeout_in_seconds: u32,
    ) -> Result<Function> {
        let details = CreateFunctionDetails {
            application_id: application.id.clone(),
            display_name: self.names.function(),
            image: image.to_string(),
            memory_in_mbs,
            timeout_in_seconds,
            freeform_tags: self.names.tags(),
        };

        let created = self.functions.create_function(&details).await?;
        let function = wait_until_ready(&self.wait, &created.id, || {
            self.functions.get_function(&created.id)
        })
        .await?;
        tracing::info!("Created Function: {} ({})", function.display_name, function.id);
        Ok(function)
    }

    async fn resolve_placement(
        &self,
        compartment_id: &str,
        placement: &SubnetPlacement,
    ) -> Result<Option<String>> {
        match placement {
            SubnetPlacement::Regional => Ok(None),
            SubnetPlacement::AvailabilityDomain(name) => Ok(Some(name.clone())),
            SubnetPlacement::FirstAvailabilityDomain => {
                let domains = self.identity.list_availability_domains(compartment_id).await?;
                let first = domains
                    .into_iter()
                    .next()
                    .ok_or_else(|| CloudError::NoAvailabilityDomain(compartment_id.to_string()))?;
                tracing::info!("Using availability domain: {}", first.name);
                Ok(Some(first.name))
            }
        }
    }
}
