use super::FunctionLifecycle;
use crate::error::Result;
use crate::report::TeardownReport;
use crate::resource::{
    Application, Function, InternetGateway, LifecycleState, Resource, ResourceKind, RouteTable,
    Subnet, Vcn,
};
use crate::waiter::wait_until_gone;
use serde::Serialize;
use std::future::Future;

/// This run's resources as currently found in the compartment
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveredResources {
    pub vcn: Option<Vcn>,
    pub internet_gateway: Option<InternetGateway>,
    pub route_table: Option<RouteTable>,
    pub subnet: Option<Subnet>,
    pub application: Option<Application>,
    pub function: Option<Function>,
}

impl DiscoveredResources {
    pub fn is_empty(&self) -> bool {
        self.vcn.is_none()
            && self.internet_gateway.is_none()
            && self.route_table.is_none()
            && self.subnet.is_none()
            && self.application.is_none()
            && self.function.is_none()
    }

    /// `(id, state)` of the resource of `kind`, if found
    pub fn lookup(&self, kind: ResourceKind) -> Option<(&str, LifecycleState)> {
        fn pick<R: Resource>(r: &Option<R>) -> Option<(&str, LifecycleState)> {
            r.as_ref().map(|r| (r.id(), r.lifecycle_state()))
        }
        match kind {
            ResourceKind::Vcn => pick(&self.vcn),
            ResourceKind::InternetGateway => pick(&self.internet_gateway),
            ResourceKind::RouteTable => pick(&self.route_table),
            ResourceKind::Subnet => pick(&self.subnet),
            ResourceKind::Application => pick(&self.application),
            ResourceKind::Function => pick(&self.function),
        }
    }
}

impl FunctionLifecycle<'_> {
    /// Find this run's resources by display name and run tag
    pub async fn discover(&self, compartment_id: &str) -> Result<DiscoveredResources> {
        let mut found = DiscoveredResources::default();

        let vcn_name = self.names.vcn();
        let vcns = self.network.list_vcns(compartment_id, &vcn_name).await?;
        found.vcn = self.find_unique(vcns, &vcn_name)?;

        // Network children can only be listed through their VCN
        if let Some(vcn) = &found.vcn {
            let name = self.names.internet_gateway();
            let igs = self
                .network
                .list_internet_gateways(compartment_id, &vcn.id, &name)
                .await?;
            found.internet_gateway = self.find_unique(igs, &name)?;

            let name = self.names.route_table();
            let rts = self
                .network
                .list_route_tables(compartment_id, &vcn.id, &name)
                .await?;
            found.route_table = self.find_unique(rts, &name)?;

            let name = self.names.subnet();
            let subnets = self
                .network
                .list_subnets(compartment_id, &vcn.id, &name)
                .await?;
            found.subnet = self.find_unique(subnets, &name)?;
        }

        let app_name = self.names.application();
        let apps = self
            .functions
            .list_applications(compartment_id, &app_name)
            .await?;
        found.application = self.find_unique(apps, &app_name)?;

        if let Some(app) = &found.application {
            let name = self.names.function();
            let functions = self.functions.list_functions(&app.id, &name).await?;
            found.function = self.find_unique(functions, &name)?;
        }

        Ok(found)
    }

    /// Delete Function → Application → Subnet → Route Table → Internet
    /// Gateway → VCN, waiting for each removal before the next. Missing
    /// resources are skipped; the first error aborts.
    pub async fn teardown(&self, compartment_id: &str) -> Result<TeardownReport> {
        let start = std::time::Instant::now();
        let mut report = TeardownReport::new();
        let found = self.discover(compartment_id).await?;

        tracing::info!(
            "Tearing down function resources for run '{}' in {}",
            self.names.run(),
            compartment_id
        );

        match &found.function {
            Some(function) => {
                self.remove(
                    &mut report,
                    function,
                    self.functions.delete_function(&function.id),
                    || self.functions.get_function(&function.id),
                )
                .await?
            }
            None => report.add_skipped(Function::KIND, self.names.function()),
        }

        match &found.application {
            Some(app) => {
                self.remove(
                    &mut report,
                    app,
                    self.functions.delete_application(&app.id),
                    || self.functions.get_application(&app.id),
                )
                .await?
            }
            None => report.add_skipped(Application::KIND, self.names.application()),
        }

        match &found.subnet {
            Some(subnet) => {
                self.remove(
                    &mut report,
                    subnet,
                    self.network.delete_subnet(&subnet.id),
                    || self.network.get_subnet(&subnet.id),
                )
                .await?
            }
            None => report.add_skipped(Subnet::KIND, self.names.subnet()),
        }

        match &found.route_table {
            Some(rt) => {
                self.remove(
                    &mut report,
                    rt,
                    self.network.delete_route_table(&rt.id),
                    || self.network.get_route_table(&rt.id),
                )
                .await?
            }
            None => report.add_skipped(RouteTable::KIND, self.names.route_table()),
        }

        match &found.internet_gateway {
            Some(ig) => {
                self.remove(
                    &mut report,
                    ig,
                    self.network.delete_internet_gateway(&ig.id),
                    || self.network.get_internet_gateway(&ig.id),
                )
                .await?
            }
            None => report.add_skipped(InternetGateway::KIND, self.names.internet_gateway()),
        }

        match &found.vcn {
            Some(vcn) => {
                self.remove(
                    &mut report,
                    vcn,
                    self.network.delete_vcn(&vcn.id),
                    || self.network.get_vcn(&vcn.id),
                )
                .await?
            }
            None => report.add_skipped(Vcn::KIND, self.names.vcn()),
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    async fn remove<R, D, F, Fut>(
        &self,
        report: &mut TeardownReport,
        resource: &R,
        delete: D,
        fetch: F,
    ) -> Result<()>
    where
        R: Resource,
        D: Future<Output = Result<()>>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        tracing::info!("Deleting {}: {} ({})", R::KIND, resource.display_name(), resource.id());
        delete.await?;
        wait_until_gone(&self.wait, resource.id(), fetch).await?;
        tracing::info!("Deleted {}: {}", R::KIND, resource.display_name());

        report.add_deleted(
            R::KIND,
            resource.display_name().to_string(),
            resource.id().to_string(),
        );
        Ok(())
    }
}
