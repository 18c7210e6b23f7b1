//! KindCluster Custom Resource Definition

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// KindCluster resource specification
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "infrastructure.cluster-k8s.io",
    version = "v1alpha1",
    kind = "KindCluster",
    plural = "kindclusters",
    singular = "kindcluster",
    shortname = "kc",
    namespaced,
    status = "KindClusterStatus",
    printcolumn = r#"{"name": "ClusterName", "type": "string", "jsonPath": ".spec.clusterName"}"#,
    printcolumn = r#"{"name": "KubernetesVersion", "type": "string", "jsonPath": ".spec.kubernetesVersion"}"#,
    printcolumn = r#"{"name": "Ready", "type": "string", "jsonPath": ".status.ready"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KindClusterSpec {
    /// Name of the external KIND cluster to provision, immutable after creation
    #[schemars(length(max = 64))]
    pub cluster_name: String,

    /// Kubernetes version for the provisioned cluster
    #[serde(default = "default_kubernetes_version")]
    pub kubernetes_version: String,
}

fn default_kubernetes_version() -> String {
    "1.21".to_string()
}

/// KindCluster status
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KindClusterStatus {
    /// Whether the external cluster was confirmed to exist at last reconcile.
    /// None until the first existence check completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,

    /// Last failure summary, cleared once the cluster converges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,

    /// Append-only audit trail of lifecycle events
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ClusterCondition>,
}

/// A single lifecycle audit entry
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCondition {
    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    /// What happened
    pub message: String,

    /// Detailed reason, typically the provisioner error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ClusterCondition {
    /// Condition recording a successful cluster creation
    pub fn created() -> Self {
        Self {
            timestamp: Utc::now(),
            message: "Cluster was successfully created".to_string(),
            reason: None,
        }
    }

    /// Condition recording a failed cluster creation
    pub fn create_failed(reason: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: "Cluster cannot be created".to_string(),
            reason: Some(reason.into()),
        }
    }
}

/// Name of the secret holding the kubeconfig for a cluster
pub fn config_secret_name(cluster_name: &str) -> String {
    format!("{}-config", cluster_name)
}
