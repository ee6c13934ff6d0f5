use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Paginated resource listing returned by `cf curl /v2/...` queries
/// (apps, routes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceList {
    pub resources: Vec<Resource>,
}

/// Single entry of a [`ResourceList`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub metadata: ResourceMetadata,
}

/// Identity of a platform resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceMetadata {
    pub guid: String,
    /// API path of the resource, e.g. `/v2/apps/<guid>`.
    pub url: String,
}

/// Per-instance stats keyed by instance index (`"0"`, `"1"`, ...).
pub type StatsResponse = BTreeMap<String, InstanceStats>;

/// Stats for one running instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceStats {
    pub stats: InstanceEndpoint,
}

/// Cell-private address of an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceEndpoint {
    pub host: String,
    pub port: u16,
}

/// Body of the sample app's `/curl/<host>/<port>` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurlResponse {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    pub return_code: i32,
}

impl CurlResponse {
    /// `true` when the in-container curl reached its target.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.return_code == 0
    }
}

/// The subset of `VCAP_APPLICATION` the suite relies on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VcapApplication {
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
}
