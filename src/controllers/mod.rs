//! Kubernetes controllers for the KindCluster CRD
//!
//! This module contains the controller implementation that watches for
//! resource changes and triggers reconciliation.

mod kind_cluster_controller;

pub use kind_cluster_controller::run as run_kind_cluster_controller;

use std::sync::Arc;

use kube::Client;

use crate::gateways::{
    ClusterProvisioner, CredentialStore, KindProvisioner, KubeResourceStore, ResourceStore,
    SecretStore,
};

/// Shared context holding the gateway handles used by every reconcile
pub struct Context {
    /// KindCluster resource access
    pub resources: Arc<dyn ResourceStore>,
    /// External cluster provisioning
    pub provisioner: Arc<dyn ClusterProvisioner>,
    /// Kubeconfig secret storage
    pub credentials: Arc<dyn CredentialStore>,
}

impl Context {
    /// Create a context with the production gateways
    pub fn new(client: Client) -> Self {
        Self {
            resources: Arc::new(KubeResourceStore::new(client.clone())),
            provisioner: Arc::new(KindProvisioner::default()),
            credentials: Arc::new(SecretStore::new(client)),
        }
    }

    /// Create a context from explicit gateway handles
    pub fn with_gateways(
        resources: Arc<dyn ResourceStore>,
        provisioner: Arc<dyn ClusterProvisioner>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            resources,
            provisioner,
            credentials,
        }
    }
}
