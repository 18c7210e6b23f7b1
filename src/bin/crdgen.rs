//! CRD YAML Generator
//!
//! This binary generates the Kubernetes CRD manifest for the KindCluster
//! custom resource.
//!
//! Usage: cargo run --bin crdgen > deploy/crds/all.yaml

use kind_cluster_operator::crd::generate_crds;

fn main() {
    for crd in generate_crds() {
        println!("---");
        print!("{}", crd);
    }
}
