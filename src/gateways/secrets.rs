//! Credential store gateway backed by Kubernetes secrets

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use kube::api::{DeleteParams, PostParams};
use kube::{Api, Client};
use tracing::info;

use crate::error::{Error, Result};
use crate::gateways::CredentialStore;

/// Data key under which the kubeconfig blob is stored
const SECRET_DATA_KEY: &str = "config";

/// CredentialStore backed by namespaced Kubernetes secrets
pub struct SecretStore {
    client: Client,
}

impl SecretStore {
    /// Create a store using the given Kubernetes client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl CredentialStore for SecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<Vec<u8>>> {
        let secret = self.api(namespace).get_opt(name).await?;

        Ok(secret.map(|s| {
            s.data
                .and_then(|data| data.get(SECRET_DATA_KEY).map(|b| b.0.clone()))
                .unwrap_or_default()
        }))
    }

    async fn put(&self, namespace: &str, name: &str, bytes: Vec<u8>) -> Result<()> {
        let mut data = BTreeMap::new();
        data.insert(SECRET_DATA_KEY.to_string(), ByteString(bytes));

        let secret = Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            data: Some(data),
            ..Default::default()
        };

        match self.api(namespace).create(&PostParams::default(), &secret).await {
            Ok(_) => {
                info!(secret = %name, namespace = %namespace, "Config secret created");
                Ok(())
            }
            // Already stored by an earlier pass
            Err(kube::Error::Api(api_err)) if api_err.code == 409 => Ok(()),
            Err(e) => Err(Error::Kube(e)),
        }
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        match self.api(namespace).delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                info!(secret = %name, namespace = %namespace, "Config secret deleted");
                Ok(())
            }
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Ok(()),
            Err(e) => Err(Error::Kube(e)),
        }
    }
}
