//! Remote resource model
//!
//! Field names follow the JSON documents the OCI services return
//! (`kebab-case` keys), so the provider can deserialize responses straight
//! into these types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kinds of resource the lifecycle manages, in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vcn,
    InternetGateway,
    RouteTable,
    Subnet,
    Application,
    Function,
}

impl ResourceKind {
    /// Creation order. Teardown walks this in reverse.
    pub const CREATION_ORDER: [ResourceKind; 6] = [
        ResourceKind::Vcn,
        ResourceKind::InternetGateway,
        ResourceKind::RouteTable,
        ResourceKind::Subnet,
        ResourceKind::Application,
        ResourceKind::Function,
    ];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Vcn => write!(f, "VCN"),
            ResourceKind::InternetGateway => write!(f, "Internet Gateway"),
            ResourceKind::RouteTable => write!(f, "Route Table"),
            ResourceKind::Subnet => write!(f, "Subnet"),
            ResourceKind::Application => write!(f, "Application"),
            ResourceKind::Function => write!(f, "Function"),
        }
    }
}

/// Lifecycle state reported by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Provisioning,
    Creating,
    Available,
    Active,
    Updating,
    Inactive,
    Terminating,
    Terminated,
    Deleting,
    Deleted,
    Failed,
    #[serde(other)]
    Unknown,
}

impl LifecycleState {
    /// Networking resources report AVAILABLE, functions resources ACTIVE
    pub fn is_ready(self) -> bool {
        matches!(self, LifecycleState::Available | LifecycleState::Active)
    }

    pub fn is_gone(self) -> bool {
        matches!(self, LifecycleState::Terminated | LifecycleState::Deleted)
    }

    pub fn is_failed(self) -> bool {
        self == LifecycleState::Failed
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LifecycleState::Provisioning => "PROVISIONING",
            LifecycleState::Creating => "CREATING",
            LifecycleState::Available => "AVAILABLE",
            LifecycleState::Active => "ACTIVE",
            LifecycleState::Updating => "UPDATING",
            LifecycleState::Inactive => "INACTIVE",
            LifecycleState::Terminating => "TERMINATING",
            LifecycleState::Terminated => "TERMINATED",
            LifecycleState::Deleting => "DELETING",
            LifecycleState::Deleted => "DELETED",
            LifecycleState::Failed => "FAILED",
            LifecycleState::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

pub type FreeformTags = HashMap<String, String>;

/// Common accessors used by discovery and the state waiter
pub trait Resource {
    const KIND: ResourceKind;

    fn id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn lifecycle_state(&self) -> LifecycleState;
    fn freeform_tags(&self) -> &FreeformTags;
}

macro_rules! impl_resource {
    ($ty:ty, $kind:expr) => {
        impl Resource for $ty {
            const KIND: ResourceKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn display_name(&self) -> &str {
                &self.display_name
            }

            fn lifecycle_state(&self) -> LifecycleState {
                self.lifecycle_state
            }

            fn freeform_tags(&self) -> &FreeformTags {
                &self.freeform_tags
            }
        }
    };
}

/// Virtual Cloud Network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Vcn {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    #[serde(default)]
    pub cidr_block: Option<String>,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InternetGateway {
    pub id: String,
    pub compartment_id: String,
    pub vcn_id: String,
    pub display_name: String,
    #[serde(default)]
    pub is_enabled: Option<bool>,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub freeform_tags: FreeformTags,
}

/// A single routing rule: traffic for `destination` goes to `network_entity_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RouteRule {
    pub destination: String,
    #[serde(default = "RouteRule::default_destination_type")]
    pub destination_type: String,
    pub network_entity_id: String,
}

impl RouteRule {
    pub const ANYWHERE: &'static str = "0.0.0.0/0";

    /// Route every IPv4 destination through `network_entity_id`
    pub fn default_route(network_entity_id: impl Into<String>) -> Self {
        Self {
            destination: Self::ANYWHERE.to_string(),
            destination_type: Self::default_destination_type(),
            network_entity_id: network_entity_id.into(),
        }
    }

    fn default_destination_type() -> String {
        "CIDR_BLOCK".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RouteTable {
    pub id: String,
    pub compartment_id: String,
    pub vcn_id: String,
    pub display_name: String,
    #[serde(default)]
    pub route_rules: Vec<RouteRule>,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Subnet {
    pub id: String,
    pub compartment_id: String,
    pub vcn_id: String,
    pub display_name: String,
    pub cidr_block: String,
    #[serde(default)]
    pub route_table_id: Option<String>,
    /// `None` for regional subnets
    #[serde(default)]
    pub availability_domain: Option<String>,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Application {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub freeform_tags: FreeformTags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Function {
    pub id: String,
    pub application_id: String,
    pub display_name: String,
    pub image: String,
    /// Only populated once the function is ACTIVE
    #[serde(default)]
    pub invoke_endpoint: Option<String>,
    #[serde(default)]
    pub memory_in_mbs: Option<u32>,
    #[serde(default)]
    pub timeout_in_seconds: Option<u32>,
    pub lifecycle_state: LifecycleState,
    #[serde(default)]
    pub freeform_tags: FreeformTags,
}

impl_resource!(Vcn, ResourceKind::Vcn);
impl_resource!(InternetGateway, ResourceKind::InternetGateway);
impl_resource!(RouteTable, ResourceKind::RouteTable);
impl_resource!(Subnet, ResourceKind::Subnet);
impl_resource!(Application, ResourceKind::Application);
impl_resource!(Function, ResourceKind::Function);

/// Availability domain within a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AvailabilityDomain {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Compartment {
    pub id: String,
    pub name: String,
    pub lifecycle_state: LifecycleState,
}
