//! Provisioner gateway wrapping the `kind` command-line tool

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::gateways::ClusterProvisioner;

/// Timeout for cluster enumeration
const LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for cluster creation (pulls a node image on first use)
const CREATE_TIMEOUT: Duration = Duration::from_secs(600);

/// Timeout for cluster deletion
const DELETE_TIMEOUT: Duration = Duration::from_secs(300);

/// Node images published by the kind project, keyed by minor version
const NODE_IMAGES: &[(&str, &str)] = &[
    ("1.22", "kindest/node:v1.22.17"),
    ("1.21", "kindest/node:v1.21.14"),
    ("1.20", "kindest/node:v1.20.15"),
    ("1.19", "kindest/node:v1.19.16"),
    ("1.18", "kindest/node:v1.18.20"),
    ("1.17", "kindest/node:v1.17.17"),
    ("1.16", "kindest/node:v1.16.15"),
    ("1.15", "kindest/node:v1.15.12"),
    ("1.14", "kindest/node:v1.14.10"),
];

/// Resolve a spec-level Kubernetes version to a kind node image
pub fn node_image_for_version(version: &str) -> Option<&'static str> {
    NODE_IMAGES
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, image)| *image)
}

/// ClusterProvisioner backed by the `kind` binary
pub struct KindProvisioner {
    binary: String,
}

impl KindProvisioner {
    /// Create a provisioner using the given kind binary path
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }

    /// Run a kind subcommand with a bounded timeout, returning stdout
    async fn run(&self, args: &[&str], timeout: Duration) -> Result<Vec<u8>> {
        debug!(binary = %self.binary, args = ?args, "Running kind");

        let output = tokio::time::timeout(
            timeout,
            Command::new(&self.binary).args(args).kill_on_drop(true).output(),
        )
        .await
        .map_err(|_| Error::timeout(format!("kind {} exceeded {:?}", args.join(" "), timeout)))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::provisioner(format!(
                "kind {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl Default for KindProvisioner {
    fn default() -> Self {
        Self::new("kind")
    }
}

#[async_trait]
impl ClusterProvisioner for KindProvisioner {
    async fn list(&self) -> Result<BTreeSet<String>> {
        // `kind get clusters` prints one name per line, nothing when empty
        let stdout = String::from_utf8(self.run(&["get", "clusters"], LIST_TIMEOUT).await?)?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn create(&self, name: &str, node_image: Option<&str>) -> Result<Vec<u8>> {
        info!(cluster = %name, image = node_image.unwrap_or("default"), "Creating kind cluster");

        let mut args = vec!["create", "cluster", "--name", name];
        if let Some(image) = node_image {
            args.extend(["--image", image]);
        }
        self.run(&args, CREATE_TIMEOUT).await?;

        // Kubeconfig is captured from stdout rather than a file handoff
        let kubeconfig = self
            .run(&["get", "kubeconfig", "--name", name], LIST_TIMEOUT)
            .await?;

        info!(cluster = %name, "Kind cluster created");
        Ok(kubeconfig)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        info!(cluster = %name, "Deleting kind cluster");

        // kind exits successfully when the cluster does not exist
        self.run(&["delete", "cluster", "--name", name], DELETE_TIMEOUT)
            .await?;

        info!(cluster = %name, "Kind cluster deleted");
        Ok(())
    }
}
