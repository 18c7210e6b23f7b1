//! Reconcilers for the KindCluster CRD
//!
//! This module contains the business logic for converging each resource:
//! - Lifecycle phase derivation
//! - Cluster creation and teardown
//! - Kubeconfig secret persistence
//! - Status updates

pub mod kind_cluster;
