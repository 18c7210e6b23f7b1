//! KIND Cluster Kubernetes Operator
//!
//! This operator manages ephemeral, locally-provisioned KIND clusters in
//! Kubernetes using a Custom Resource Definition (CRD). Each KindCluster
//! resource declares a desired external cluster; the operator provisions
//! it, persists its kubeconfig as a secret, and tears both down when the
//! resource is deleted.

pub mod controllers;
pub mod crd;
pub mod error;
pub mod gateways;
pub mod metrics;
pub mod reconcilers;

pub use error::{Error, Result};
