//! Resource store gateway over the KindCluster API

use async_trait::async_trait;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;

use crate::crd::KindCluster;
use crate::error::{Error, Result};
use crate::gateways::ResourceStore;

/// Field manager name used for status patches
const FIELD_MANAGER: &str = "kind-cluster-operator";

/// ResourceStore backed by the Kubernetes API
pub struct KubeResourceStore {
    client: Client,
}

impl KubeResourceStore {
    /// Create a store using the given Kubernetes client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<KindCluster> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ResourceStore for KubeResourceStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<KindCluster>> {
        Ok(self.api(namespace).get_opt(name).await?)
    }

    async fn update(&self, cluster: &KindCluster) -> Result<()> {
        let name = cluster.name_any();
        let namespace = cluster
            .namespace()
            .ok_or_else(|| Error::config("KindCluster has no namespace"))?;

        self.api(&namespace)
            .replace(&name, &PostParams::default(), cluster)
            .await?;

        Ok(())
    }

    async fn update_status(&self, cluster: &KindCluster) -> Result<()> {
        let name = cluster.name_any();
        let namespace = cluster
            .namespace()
            .ok_or_else(|| Error::config("KindCluster has no namespace"))?;

        let patch = json!({ "status": cluster.status });
        self.api(&namespace)
            .patch_status(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(patch))
            .await?;

        Ok(())
    }
}
