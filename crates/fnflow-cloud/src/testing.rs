//! In-memory fake of the collaborator traits
//!
//! Behaves like a very small cloud: new resources start out PROVISIONING and
//! become ready on the second poll, deletions go through TERMINATING, and
//! parent/child rules are enforced in both directions (no child before its
//! parent is ready, no parent deletion while children are live). Every call
//! is recorded so tests can assert on ordering.

use crate::api::{
    CreateApplicationDetails, CreateFunctionDetails, CreateInternetGatewayDetails,
    CreateRouteTableDetails, CreateSubnetDetails, CreateVcnDetails, FunctionsApi, IdentityApi,
    NetworkApi,
};
use crate::error::{CloudError, Result};
use crate::resource::{
    Application, AvailabilityDomain, Compartment, Function, InternetGateway, LifecycleState,
    Resource, RouteTable, Subnet, Vcn,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Polls a new resource needs before it reports ready
const SETTLE_POLLS: u32 = 2;

trait FakeResource: Resource + Clone {
    fn set_state(&mut self, state: LifecycleState);

    fn ready_state() -> LifecycleState {
        LifecycleState::Available
    }

    fn gone_state() -> LifecycleState {
        LifecycleState::Terminated
    }
}

macro_rules! fake_resource {
    ($ty:ty) => {
        impl FakeResource for $ty {
            fn set_state(&mut self, state: LifecycleState) {
                self.lifecycle_state = state;
            }
        }
    };
    ($ty:ty, functions) => {
        impl FakeResource for $ty {
            fn set_state(&mut self, state: LifecycleState) {
                self.lifecycle_state = state;
            }

            fn ready_state() -> LifecycleState {
                LifecycleState::Active
            }

            fn gone_state() -> LifecycleState {
                LifecycleState::Deleted
            }
        }
    };
}

fake_resource!(Vcn);
fake_resource!(InternetGateway);
fake_resource!(RouteTable);
fake_resource!(Subnet);
fake_resource!(Application, functions);
fake_resource!(Function, functions);

#[derive(Default)]
struct FakeState {
    vcns: Vec<Vcn>,
    internet_gateways: Vec<InternetGateway>,
    route_tables: Vec<RouteTable>,
    subnets: Vec<Subnet>,
    applications: Vec<Application>,
    functions: Vec<Function>,
    polls: HashMap<String, u32>,
    calls: Vec<String>,
    next_id: u32,
}

impl FakeState {
    fn new_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("ocid1.{}.oc1..fake{:04}", kind, self.next_id)
    }

    fn live_count(&self) -> usize {
        fn live<R: Resource>(items: &[R]) -> usize {
            items
                .iter()
                .filter(|r| !r.lifecycle_state().is_gone())
                .count()
        }
        live(&self.vcns)
            + live(&self.internet_gateways)
            + live(&self.route_tables)
            + live(&self.subnets)
            + live(&self.applications)
            + live(&self.functions)
    }
}

/// Recording in-memory cloud
pub struct FakeCloud {
    state: Mutex<FakeState>,
    fail_on: Option<String>,
    fail_state_on: Option<String>,
    availability_domains: Vec<AvailabilityDomain>,
    compartments: Vec<Compartment>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            fail_on: None,
            fail_state_on: None,
            availability_domains: Vec::new(),
            compartments: Vec::new(),
        }
    }

    /// Make the named call return an API error
    pub fn fail_on(mut self, call: &str) -> Self {
        self.fail_on = Some(call.to_string());
        self
    }

    /// Make the resource created by the named call end up FAILED
    pub fn fail_state_on(mut self, call: &str) -> Self {
        self.fail_state_on = Some(call.to_string());
        self
    }

    pub fn with_availability_domains(mut self, domains: Vec<AvailabilityDomain>) -> Self {
        self.availability_domains = domains;
        self
    }

    pub fn with_compartments(mut self, compartments: Vec<Compartment>) -> Self {
        self.compartments = compartments;
        self
    }

    /// Every call made so far, by method name
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn create_calls(&self) -> Vec<String> {
        self.calls_with_prefix("create_")
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls_with_prefix("delete_")
    }

    /// Resources not yet terminated or deleted
    pub fn live_count(&self) -> usize {
        self.lock().live_count()
    }

    fn calls_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and apply failure injection
    fn enter(&self, call: &str) -> Result<MutexGuard<'_, FakeState>> {
        let mut state = self.lock();
        state.calls.push(call.to_string());
        if self.fail_on.as_deref() == Some(call) {
            return Err(CloudError::ApiError(format!("injected failure in {}", call)));
        }
        Ok(state)
    }

    fn initial_state(&self, call: &str) -> LifecycleState {
        if self.fail_state_on.as_deref() == Some(call) {
            LifecycleState::Failed
        } else {
            LifecycleState::Provisioning
        }
    }
}

impl Default for FakeCloud {
    fn default() -> Self {
        Self::new()
    }
}

fn poll<R: FakeResource>(
    items: &mut [R],
    polls: &mut HashMap<String, u32>,
    id: &str,
) -> Result<R> {
    let item = items
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or_else(|| CloudError::ResourceNotFound(id.to_string()))?;

    let count = polls.entry(id.to_string()).or_insert(0);
    *count += 1;

    match item.lifecycle_state() {
        LifecycleState::Provisioning if *count >= SETTLE_POLLS => {
            item.set_state(R::ready_state())
        }
        LifecycleState::Terminating | LifecycleState::Deleting => item.set_state(R::gone_state()),
        _ => {}
    }
    Ok(item.clone())
}

fn list<R: FakeResource>(items: &[R], pred: impl Fn(&R) -> bool) -> Vec<R> {
    items.iter().filter(|r| pred(r)).cloned().collect()
}

fn mark_deleting<R: FakeResource>(items: &mut [R], id: &str) -> Result<()> {
    let item = items
        .iter_mut()
        .find(|r| r.id() == id && !r.lifecycle_state().is_gone())
        .ok_or_else(|| CloudError::ResourceNotFound(id.to_string()))?;
    let deleting = if R::gone_state() == LifecycleState::Deleted {
        LifecycleState::Deleting
    } else {
        LifecycleState::Terminating
    };
    item.set_state(deleting);
    Ok(())
}

fn require_ready<R: Resource>(items: &[R], id: &str) -> Result<()> {
    match items.iter().find(|r| r.id() == id) {
        Some(r) if r.lifecycle_state().is_ready() => Ok(()),
        Some(r) => Err(CloudError::ApiError(format!(
            "{} {} is {}",
            R::KIND,
            id,
            r.lifecycle_state()
        ))),
        None => Err(CloudError::ResourceNotFound(id.to_string())),
    }
}

fn conflict_if<R: Resource>(items: &[R], parent: &str, pred: impl Fn(&R) -> bool) -> Result<()> {
    if items
        .iter()
        .any(|r| !r.lifecycle_state().is_gone() && pred(r))
    {
        return Err(CloudError::ApiError(format!(
            "Conflict: {} still has a live {}",
            parent,
            R::KIND
        )));
    }
    Ok(())
}

#[async_trait]
impl NetworkApi for FakeCloud {
    async fn create_vcn(&self, details: &CreateVcnDetails) -> Result<Vcn> {
        let mut state = self.enter("create_vcn")?;
        let vcn = Vcn {
            id: state.new_id("vcn"),
            compartment_id: details.compartment_id.clone(),
            display_name: details.display_name.clone(),
            cidr_block: Some(details.cidr_block.clone()),
            lifecycle_state: self.initial_state("create_vcn"),
            freeform_tags: details.freeform_tags.clone(),
        };
        state.vcns.push(vcn.clone());
        Ok(vcn)
    }

    async fn get_vcn(&self, vcn_id: &str) -> Result<Vcn> {
        let mut state = self.enter("get_vcn")?;
        let FakeState { vcns, polls, .. } = &mut *state;
        poll(vcns, polls, vcn_id)
    }

    async fn list_vcns(&self, compartment_id: &str, display_name: &str) -> Result<Vec<Vcn>> {
        let state = self.enter("list_vcns")?;
        Ok(list(&state.vcns, |v| {
            v.compartment_id == compartment_id && v.display_name == display_name
        }))
    }

    async fn delete_vcn(&self, vcn_id: &str) -> Result<()> {
        let mut state = self.enter("delete_vcn")?;
        conflict_if(&state.internet_gateways, vcn_id, |ig| ig.vcn_id == vcn_id)?;
        conflict_if(&state.route_tables, vcn_id, |rt| rt.vcn_id == vcn_id)?;
        conflict_if(&state.subnets, vcn_id, |sn| sn.vcn_id == vcn_id)?;
        mark_deleting(&mut state.vcns, vcn_id)
    }

    async fn create_internet_gateway(
        &self,
        details: &CreateInternetGatewayDetails,
    ) -> Result<InternetGateway> {
        let mut state = self.enter("create_internet_gateway")?;
        require_ready(&state.vcns, &details.vcn_id)?;
        let ig = InternetGateway {
            id: state.new_id("internetgateway"),
            compartment_id: details.compartment_id.clone(),
            vcn_id: details.vcn_id.clone(),
            display_name: details.display_name.clone(),
            is_enabled: Some(details.is_enabled),
            lifecycle_state: self.initial_state("create_internet_gateway"),
            freeform_tags: details.freeform_tags.clone(),
        };
        state.internet_gateways.push(ig.clone());
        Ok(ig)
    }

    async fn get_internet_gateway(&self, ig_id: &str) -> Result<InternetGateway> {
        let mut state = self.enter("get_internet_gateway")?;
        let FakeState {
            internet_gateways,
            polls,
            ..
        } = &mut *state;
        poll(internet_gateways, polls, ig_id)
    }

    async fn list_internet_gateways(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<InternetGateway>> {
        let state = self.enter("list_internet_gateways")?;
        Ok(list(&state.internet_gateways, |ig| {
            ig.compartment_id == compartment_id
                && ig.vcn_id == vcn_id
                && ig.display_name == display_name
        }))
    }

    async fn delete_internet_gateway(&self, ig_id: &str) -> Result<()> {
        let mut state = self.enter("delete_internet_gateway")?;
        conflict_if(&state.route_tables, ig_id, |rt| {
            rt.route_rules.iter().any(|r| r.network_entity_id == ig_id)
        })?;
        mark_deleting(&mut state.internet_gateways, ig_id)
    }

    async fn create_route_table(&self, details: &CreateRouteTableDetails) -> Result<RouteTable> {
        let mut state = self.enter("create_route_table")?;
        require_ready(&state.vcns, &details.vcn_id)?;
        for rule in &details.route_rules {
            require_ready(&state.internet_gateways, &rule.network_entity_id)?;
        }
        let rt = RouteTable {
            id: state.new_id("routetable"),
            compartment_id: details.compartment_id.clone(),
            vcn_id: details.vcn_id.clone(),
            display_name: details.display_name.clone(),
            route_rules: details.route_rules.clone(),
            lifecycle_state: self.initial_state("create_route_table"),
            freeform_tags: details.freeform_tags.clone(),
        };
        state.route_tables.push(rt.clone());
        Ok(rt)
    }

    async fn get_route_table(&self, rt_id: &str) -> Result<RouteTable> {
        let mut state = self.enter("get_route_table")?;
        let FakeState {
            route_tables,
            polls,
            ..
        } = &mut *state;
        poll(route_tables, polls, rt_id)
    }

    async fn list_route_tables(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<RouteTable>> {
        let state = self.enter("list_route_tables")?;
        Ok(list(&state.route_tables, |rt| {
            rt.compartment_id == compartment_id
                && rt.vcn_id == vcn_id
                && rt.display_name == display_name
        }))
    }

    async fn delete_route_table(&self, rt_id: &str) -> Result<()> {
        let mut state = self.enter("delete_route_table")?;
        conflict_if(&state.subnets, rt_id, |sn| {
            sn.route_table_id.as_deref() == Some(rt_id)
        })?;
        mark_deleting(&mut state.route_tables, rt_id)
    }

    async fn create_subnet(&self, details: &CreateSubnetDetails) -> Result<Subnet> {
        let mut state = self.enter("create_subnet")?;
        require_ready(&state.vcns, &details.vcn_id)?;
        require_ready(&state.route_tables, &details.route_table_id)?;
        let subnet = Subnet {
            id: state.new_id("subnet"),
            compartment_id: details.compartment_id.clone(),
            vcn_id: details.vcn_id.clone(),
            display_name: details.display_name.clone(),
            cidr_block: details.cidr_block.clone(),
            route_table_id: Some(details.route_table_id.clone()),
            availability_domain: details.availability_domain.clone(),
            lifecycle_state: self.initial_state("create_subnet"),
            freeform_tags: details.freeform_tags.clone(),
        };
        state.subnets.push(subnet.clone());
        Ok(subnet)
    }

    async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet> {
        let mut state = self.enter("get_subnet")?;
        let FakeState { subnets, polls, .. } = &mut *state;
        poll(subnets, polls, subnet_id)
    }

    async fn list_subnets(
        &self,
        compartment_id: &str,
        vcn_id: &str,
        display_name: &str,
    ) -> Result<Vec<Subnet>> {
        let state = self.enter("list_subnets")?;
        Ok(list(&state.subnets, |sn| {
            sn.compartment_id == compartment_id
                && sn.vcn_id == vcn_id
                && sn.display_name == display_name
        }))
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        let mut state = self.enter("delete_subnet")?;
        conflict_if(&state.applications, subnet_id, |app| {
            app.subnet_ids.iter().any(|id| id == subnet_id)
        })?;
        mark_deleting(&mut state.subnets, subnet_id)
    }
}

#[async_trait]
impl FunctionsApi for FakeCloud {
    async fn create_application(&self, details: &CreateApplicationDetails) -> Result<Application> {
        let mut state = self.enter("create_application")?;
        for subnet_id in &details.subnet_ids {
            require_ready(&state.subnets, subnet_id)?;
        }
        let app = Application {
            id: state.new_id("fnapp"),
            compartment_id: details.compartment_id.clone(),
            display_name: details.display_name.clone(),
            subnet_ids: details.subnet_ids.clone(),
            lifecycle_state: self.initial_state("create_application"),
            freeform_tags: details.freeform_tags.clone(),
        };
        state.applications.push(app.clone());
        Ok(app)
    }

    async fn get_application(&self, application_id: &str) -> Result<Application> {
        let mut state = self.enter("get_application")?;
        let FakeState {
            applications,
            polls,
            ..
        } = &mut *state;
        poll(applications, polls, application_id)
    }

    async fn list_applications(
        &self,
        compartment_id: &str,
        display_name: &str,
    ) -> Result<Vec<Application>> {
        let state = self.enter("list_applications")?;
        Ok(list(&state.applications, |app| {
            app.compartment_id == compartment_id && app.display_name == display_name
        }))
    }

    async fn delete_application(&self, application_id: &str) -> Result<()> {
        let mut state = self.enter("delete_application")?;
        conflict_if(&state.functions, application_id, |f| {
            f.application_id == application_id
        })?;
        mark_deleting(&mut state.applications, application_id)
    }

    async fn create_function(&self, details: &CreateFunctionDetails) -> Result<Function> {
        let mut state = self.enter("create_function")?;
        require_ready(&state.applications, &details.application_id)?;
        let id = state.new_id("fnfunc");
        let function = Function {
            invoke_endpoint: Some(format!("https://{}.functions.fake", id)),
            id,
            application_id: details.application_id.clone(),
            display_name: details.display_name.clone(),
            image: details.image.clone(),
            memory_in_mbs: Some(details.memory_in_mbs),
            timeout_in_seconds: Some(details.timeout_in_seconds),
            lifecycle_state: self.initial_state("create_function"),
            freeform_tags: details.freeform_tags.clone(),
        };
        state.functions.push(function.clone());
        Ok(function)
    }

    async fn get_function(&self, function_id: &str) -> Result<Function> {
        let mut state = self.enter("get_function")?;
        let FakeState {
            functions, polls, ..
        } = &mut *state;
        poll(functions, polls, function_id)
    }

    async fn list_functions(
        &self,
        application_id: &str,
        display_name: &str,
    ) -> Result<Vec<Function>> {
        let state = self.enter("list_functions")?;
        Ok(list(&state.functions, |f| {
            f.application_id == application_id && f.display_name == display_name
        }))
    }

    async fn delete_function(&self, function_id: &str) -> Result<()> {
        let mut state = self.enter("delete_function")?;
        mark_deleting(&mut state.functions, function_id)
    }

    async fn invoke_function(&self, function: &Function, payload: &str) -> Result<String> {
        let state = self.enter("invoke_function")?;
        require_ready(&state.functions, &function.id)?;
        let name = if payload.is_empty() { "World" } else { payload };
        Ok(format!("Hello {}!", name))
    }
}

#[async_trait]
impl IdentityApi for FakeCloud {
    async fn list_availability_domains(
        &self,
        _compartment_id: &str,
    ) -> Result<Vec<AvailabilityDomain>> {
        drop(self.enter("list_availability_domains")?);
        Ok(self.availability_domains.clone())
    }

    async fn list_compartments(&self, _tenancy_id: &str) -> Result<Vec<Compartment>> {
        drop(self.enter("list_compartments")?);
        Ok(self.compartments.clone())
    }
}
