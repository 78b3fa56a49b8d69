//! Setup / invoke / teardown orchestration
//!
//! Every step is one awaited call followed by a wait on the resource's
//! lifecycle state. Nothing runs concurrently and nothing is rolled back: a
//! failing step returns its error and leaves earlier resources in place for
//! `teardown` to remove.

mod invoke;
mod setup;
mod teardown;

pub use setup::{
    DEFAULT_MEMORY_MBS, DEFAULT_SUBNET_CIDR, DEFAULT_TIMEOUT_SECONDS, DEFAULT_VCN_CIDR,
    SetupRequest, SubnetPlacement,
};
pub use teardown::DiscoveredResources;

use crate::api::{FunctionsApi, IdentityApi, NetworkApi};
use crate::error::{CloudError, Result};
use crate::naming::ResourceNames;
use crate::resource::Resource;
use crate::waiter::WaitConfig;

/// Drives one run's resources through their lifecycle
pub struct FunctionLifecycle<'a> {
    network: &'a dyn NetworkApi,
    functions: &'a dyn FunctionsApi,
    identity: &'a dyn IdentityApi,
    names: ResourceNames,
    wait: WaitConfig,
}

impl<'a> FunctionLifecycle<'a> {
    pub fn new(
        network: &'a dyn NetworkApi,
        functions: &'a dyn FunctionsApi,
        identity: &'a dyn IdentityApi,
        names: ResourceNames,
    ) -> Self {
        Self {
            network,
            functions,
            identity,
            names,
            wait: WaitConfig::default(),
        }
    }

    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn names(&self) -> &ResourceNames {
        &self.names
    }

    /// Pick the single live resource with `display_name` owned by this run
    fn find_unique<R: Resource>(&self, candidates: Vec<R>, display_name: &str) -> Result<Option<R>> {
        let mut matches: Vec<R> = candidates
            .into_iter()
            .filter(|r| r.display_name() == display_name)
            .filter(|r| !r.lifecycle_state().is_gone())
            .filter(|r| self.names.owns(r.freeform_tags()))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(CloudError::AmbiguousResource {
                kind: R::KIND,
                name: display_name.to_string(),
                count,
            }),
        }
    }
}

/// Resolve a compartment name to its OCID under `tenancy_id`
pub async fn resolve_compartment(
    identity: &dyn IdentityApi,
    tenancy_id: &str,
    name: &str,
) -> Result<String> {
    let compartments = identity.list_compartments(tenancy_id).await?;
    compartments
        .into_iter()
        .find(|c| c.name == name && !c.lifecycle_state.is_gone())
        .map(|c| c.id)
        .ok_or_else(|| CloudError::CompartmentNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Compartment, LifecycleState, Vcn};
    use crate::testing::FakeCloud;

    fn vcn(id: &str, name: &str, run: Option<&str>, state: LifecycleState) -> Vcn {
        let mut tags = crate::resource::FreeformTags::new();
        if let Some(run) = run {
            tags.insert(crate::naming::RUN_TAG.to_string(), run.to_string());
        }
        Vcn {
            id: id.to_string(),
            compartment_id: "c".to_string(),
            display_name: name.to_string(),
            cidr_block: None,
            lifecycle_state: state,
            freeform_tags: tags,
        }
    }

    #[test]
    fn test_find_unique_filters_other_runs_and_terminated() {
        let cloud = FakeCloud::new();
        let lifecycle = FunctionLifecycle::new(&cloud, &cloud, &cloud, ResourceNames::new("demo"));

        let candidates = vec![
            vcn("old", "demo-vcn", Some("demo"), LifecycleState::Terminated),
            vcn("other", "demo-vcn", Some("someone-else"), LifecycleState::Available),
            vcn("mine", "demo-vcn", Some("demo"), LifecycleState::Available),
            vcn("renamed", "demo-vcn-2", Some("demo"), LifecycleState::Available),
        ];

        let found = lifecycle.find_unique(candidates, "demo-vcn").unwrap();
        assert_eq!(found.map(|v| v.id), Some("mine".to_string()));
    }

    #[test]
    fn test_find_unique_rejects_duplicates() {
        let cloud = FakeCloud::new();
        let lifecycle = FunctionLifecycle::new(&cloud, &cloud, &cloud, ResourceNames::new("demo"));

        let candidates = vec![
            vcn("a", "demo-vcn", Some("demo"), LifecycleState::Available),
            vcn("b", "demo-vcn", None, LifecycleState::Available),
        ];

        let result = lifecycle.find_unique(candidates, "demo-vcn");
        assert!(matches!(
            result,
            Err(CloudError::AmbiguousResource { count: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_compartment() {
        let cloud = FakeCloud::new().with_compartments(vec![
            Compartment {
                id: "ocid1.compartment.oc1..dev".to_string(),
                name: "dev".to_string(),
                lifecycle_state: LifecycleState::Active,
            },
            Compartment {
                id: "ocid1.compartment.oc1..sandbox".to_string(),
                name: "sandbox".to_string(),
                lifecycle_state: LifecycleState::Active,
            },
        ]);

        let id = resolve_compartment(&cloud, "ocid1.tenancy.oc1..t", "sandbox")
            .await
            .unwrap();
        assert_eq!(id, "ocid1.compartment.oc1..sandbox");

        let missing = resolve_compartment(&cloud, "ocid1.tenancy.oc1..t", "prod").await;
        assert!(matches!(missing, Err(CloudError::CompartmentNotFound(_))));
    }
}
