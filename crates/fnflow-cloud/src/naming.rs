//! Deterministic resource names
//!
//! Identifiers are never written to disk, so invoke and teardown find the
//! resources again through the display names and the run tag set here.

use crate::resource::{FreeformTags, ResourceKind};

/// Freeform tag key carrying the run name
pub const RUN_TAG: &str = "fnflow-run";

pub const DEFAULT_RUN_NAME: &str = "fnflow-function-example";

/// Display names for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    run: String,
}

impl ResourceNames {
    pub fn new(run: impl Into<String>) -> Self {
        Self { run: run.into() }
    }

    pub fn run(&self) -> &str {
        &self.run
    }

    pub fn vcn(&self) -> String {
        format!("{}-vcn", self.run)
    }

    pub fn internet_gateway(&self) -> String {
        format!("{}-ig", self.run)
    }

    pub fn route_table(&self) -> String {
        format!("{}-rt", self.run)
    }

    pub fn subnet(&self) -> String {
        format!("{}-subnet", self.run)
    }

    pub fn application(&self) -> String {
        format!("{}-app", self.run)
    }

    pub fn function(&self) -> String {
        format!("{}-fn", self.run)
    }

    pub fn for_kind(&self, kind: ResourceKind) -> String {
        match kind {
            ResourceKind::Vcn => self.vcn(),
            ResourceKind::InternetGateway => self.internet_gateway(),
            ResourceKind::RouteTable => self.route_table(),
            ResourceKind::Subnet => self.subnet(),
            ResourceKind::Application => self.application(),
            ResourceKind::Function => self.function(),
        }
    }

    /// Tags attached to every resource created by this run
    pub fn tags(&self) -> FreeformTags {
        [(RUN_TAG.to_string(), self.run.clone())]
            .into_iter()
            .collect()
    }

    /// A resource belongs to this run unless it carries a different run tag.
    /// Untagged resources are accepted so hand-made ones can still be found.
    pub fn owns(&self, tags: &FreeformTags) -> bool {
        tags.get(RUN_TAG).is_none_or(|run| run == &self.run)
    }
}

impl Default for ResourceNames {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_NAME)
    }
}
