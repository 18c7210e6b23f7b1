//! Gateway interfaces to the external systems the operator drives
//!
//! Each gateway is a thin capability trait over one external collaborator:
//! the kind provisioning tool, the kubeconfig secret storage, and the
//! KindCluster resource substrate. Gateways translate not-found into
//! `Option`/silent success and never retry internally; retry policy lives
//! in the reconciler and controller layers.

mod provisioner;
mod resources;
mod secrets;

pub use provisioner::*;
pub use resources::*;
pub use secrets::*;

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::crd::KindCluster;
use crate::error::Result;

/// Capability to create, delete and enumerate external clusters.
///
/// `delete` is idempotent by contract: deleting an absent cluster succeeds.
#[async_trait]
pub trait ClusterProvisioner: Send + Sync {
    /// Names of all clusters currently known to the provisioning tool
    async fn list(&self) -> Result<BTreeSet<String>>;

    /// Create a cluster and return its kubeconfig bytes directly
    async fn create(&self, name: &str, node_image: Option<&str>) -> Result<Vec<u8>>;

    /// Delete a cluster, succeeding silently when it does not exist
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Capability to persist opaque credential blobs, scoped to a namespace
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch a stored credential, None when absent
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Vec<u8>>>;

    /// Store a credential; storing over an existing one is a no-op
    async fn put(&self, namespace: &str, name: &str, bytes: Vec<u8>) -> Result<()>;

    /// Delete a stored credential, succeeding silently when absent
    async fn delete(&self, namespace: &str, name: &str) -> Result<()>;
}

/// Capability to read and write KindCluster resources
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch a resource, None when absent
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<KindCluster>>;

    /// Persist metadata/spec changes (finalizer add/remove)
    async fn update(&self, cluster: &KindCluster) -> Result<()>;

    /// Persist the status subresource
    async fn update_status(&self, cluster: &KindCluster) -> Result<()>;
}
