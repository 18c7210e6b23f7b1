//! Custom Resource Definitions for the KIND Cluster Operator

mod kind_cluster;

pub use kind_cluster::*;

use kube::CustomResourceExt;

/// Generate all CRD YAML manifests
pub fn generate_crds() -> Vec<String> {
    vec![serde_yaml::to_string(&KindCluster::crd()).unwrap()]
}
