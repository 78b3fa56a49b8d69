//! Outcome types for setup and teardown runs

use crate::resource::{
    Application, Function, InternetGateway, ResourceKind, RouteTable, Subnet, Vcn,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything created by a successful setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedResources {
    pub vcn: Vcn,
    pub internet_gateway: InternetGateway,
    pub route_table: RouteTable,
    pub subnet: Subnet,
    pub application: Application,
    pub function: Function,
}

impl ProvisionedResources {
    /// `(kind, display name, id)` in creation order
    pub fn entries(&self) -> Vec<(ResourceKind, &str, &str)> {
        vec![
            (ResourceKind::Vcn, &self.vcn.display_name, &self.vcn.id),
            (
                ResourceKind::InternetGateway,
                &self.internet_gateway.display_name,
                &self.internet_gateway.id,
            ),
            (
                ResourceKind::RouteTable,
                &self.route_table.display_name,
                &self.route_table.id,
            ),
            (ResourceKind::Subnet, &self.subnet.display_name, &self.subnet.id),
            (
                ResourceKind::Application,
                &self.application.display_name,
                &self.application.id,
            ),
            (
                ResourceKind::Function,
                &self.function.display_name,
                &self.function.id,
            ),
        ]
    }
}

/// What happened to one resource during teardown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum StepOutcome {
    /// Deleted and confirmed gone
    Deleted { id: String },
    /// Not found, nothing to delete
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeardownStep {
    pub kind: ResourceKind,
    pub name: String,
    pub outcome: StepOutcome,
}

/// Result of a teardown run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeardownReport {
    /// Steps in execution order
    pub steps: Vec<TeardownStep>,

    pub started_at: DateTime<Utc>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl TeardownReport {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    pub fn add_deleted(&mut self, kind: ResourceKind, name: String, id: String) {
        self.steps.push(TeardownStep {
            kind,
            name,
            outcome: StepOutcome::Deleted { id },
        });
    }

    pub fn add_skipped(&mut self, kind: ResourceKind, name: String) {
        self.steps.push(TeardownStep {
            kind,
            name,
            outcome: StepOutcome::Skipped,
        });
    }

    pub fn deleted(&self) -> Vec<&TeardownStep> {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Deleted { .. }))
            .collect()
    }

    pub fn skipped(&self) -> Vec<&TeardownStep> {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Skipped)
            .collect()
    }

    pub fn summary(&self) -> TeardownSummary {
        TeardownSummary {
            deleted: self.deleted().len(),
            skipped: self.skipped().len(),
        }
    }
}

impl Default for TeardownReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownSummary {
    pub deleted: usize,
    pub skipped: usize,
}

impl std::fmt::Display for TeardownSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} deleted, {} not found", self.deleted, self.skipped)
    }
}
