//! KindCluster reconciler
//!
//! Business logic for converging a KindCluster resource: finalizer
//! lifecycle, cluster creation and teardown, kubeconfig persistence,
//! and status updates.

use std::time::Duration;

use kube::runtime::controller::Action;
use kube::ResourceExt;
use tracing::{debug, info, warn};

use crate::controllers::Context;
use crate::crd::{config_secret_name, ClusterCondition, KindCluster, KindClusterStatus};
use crate::error::{Error, Result};
use crate::gateways::node_image_for_version;
use crate::metrics;

/// Finalizer name for KindCluster resources
pub const FINALIZER_NAME: &str = "kindclusters.infrastructure.cluster-k8s.io/cluster-finalizer";

/// How soon to retry when the cluster is ready but its kubeconfig secret
/// could not be persisted yet
const CREDENTIAL_RETRY: Duration = Duration::from_secs(30);

/// Lifecycle phase, derived from resource fields on every reconcile.
///
/// The absent resource is represented by `ResourceStore::get` returning
/// `None` rather than a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Finalizer not yet attached, deletion not requested
    New,
    /// Deletion requested with the finalizer still present: teardown runs
    Deleting,
    /// Deletion requested and finalizer already removed: waiting for the
    /// API server to drop the object
    Deleted,
    /// Finalizer present, deletion not requested: converge toward ready
    Converging,
}

/// Derive the lifecycle phase from the resource fields
pub fn classify(cluster: &KindCluster) -> Phase {
    let has_finalizer = cluster.finalizers().iter().any(|f| f == FINALIZER_NAME);
    let deleting = cluster.metadata.deletion_timestamp.is_some();

    match (deleting, has_finalizer) {
        (false, false) => Phase::New,
        (false, true) => Phase::Converging,
        (true, true) => Phase::Deleting,
        (true, false) => Phase::Deleted,
    }
}

/// Reconcile one KindCluster key.
///
/// Executes at most one lifecycle transition per invocation; the returned
/// Action tells the dispatcher when to come back.
pub async fn reconcile(ctx: &Context, namespace: &str, name: &str) -> Result<Action> {
    let Some(mut cluster) = ctx.resources.get(namespace, name).await? else {
        debug!(name = %name, namespace = %namespace, "KindCluster not found, nothing to do");
        return Ok(Action::await_change());
    };

    match classify(&cluster) {
        Phase::New => {
            cluster.finalizers_mut().push(FINALIZER_NAME.to_string());
            ctx.resources.update(&cluster).await?;

            info!(name = %name, namespace = %namespace, "Finalizer added");
            Ok(Action::await_change())
        }
        Phase::Deleting => teardown(ctx, namespace, cluster).await,
        Phase::Deleted => Ok(Action::await_change()),
        Phase::Converging => converge(ctx, namespace, cluster).await,
    }
}

/// Tear down the external cluster and its kubeconfig secret, then release
/// the finalizer. Both deletes are idempotent, so no existence check is
/// made beforehand.
async fn teardown(ctx: &Context, namespace: &str, mut cluster: KindCluster) -> Result<Action> {
    let cluster_name = cluster.spec.cluster_name.clone();
    info!(cluster = %cluster_name, "Tearing down KindCluster");

    ctx.provisioner.delete(&cluster_name).await?;
    metrics::CLUSTER_DELETES_TOTAL
        .with_label_values(&["success", namespace])
        .inc();

    ctx.credentials
        .delete(namespace, &config_secret_name(&cluster_name))
        .await?;

    cluster.finalizers_mut().retain(|f| f != FINALIZER_NAME);
    match ctx.resources.update(&cluster).await {
        Ok(()) => {}
        // Resource removed from under us: teardown already completed
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }

    info!(cluster = %cluster_name, "Teardown complete, finalizer removed");
    Ok(Action::await_change())
}

/// Converge toward a ready cluster with a persisted kubeconfig secret
async fn converge(ctx: &Context, namespace: &str, mut cluster: KindCluster) -> Result<Action> {
    let cluster_name = cluster.spec.cluster_name.clone();

    // An enumeration failure leaves status untouched: the world state is
    // unknown and writing status based on it would be a guess.
    let existing = ctx.provisioner.list().await?;

    if existing.contains(&cluster_name) {
        debug!(cluster = %cluster_name, "Cluster exists");
        return confirm_ready(ctx, namespace, &mut cluster).await;
    }

    info!(cluster = %cluster_name, "Cluster does not exist, creating");

    let node_image = node_image_for_version(&cluster.spec.kubernetes_version);

    match ctx.provisioner.create(&cluster_name, node_image).await {
        Ok(kubeconfig) => {
            metrics::CLUSTER_CREATES_TOTAL
                .with_label_values(&["success", namespace])
                .inc();

            let status = cluster.status.get_or_insert_with(KindClusterStatus::default);
            status.conditions.push(ClusterCondition::created());
            status.ready = Some(true);
            status.failure_message = None;
            ctx.resources.update_status(&cluster).await?;

            store_credential(ctx, namespace, &cluster, kubeconfig).await?;
            Ok(Action::await_change())
        }
        Err(e) => {
            warn!(cluster = %cluster_name, error = %e, "Cluster creation failed");
            metrics::CLUSTER_CREATES_TOTAL
                .with_label_values(&["failure", namespace])
                .inc();

            let status = cluster.status.get_or_insert_with(KindClusterStatus::default);
            status.conditions.push(ClusterCondition::create_failed(e.to_string()));
            status.ready = Some(false);
            status.failure_message = Some(format!("Cluster cannot be created: {}", e));
            ctx.resources.update_status(&cluster).await?;

            // Transient infra failures (port conflicts, resource exhaustion)
            // are retried with backoff by the error policy.
            Err(e)
        }
    }
}

/// Confirm an already-existing cluster as ready.
///
/// The credential state is checked first so ready and failure message land
/// in a single status commit per pass; a ready cluster whose kubeconfig was
/// never held by this operator (it pre-existed) keeps a stable pending
/// message until a later pass finds the secret.
async fn confirm_ready(ctx: &Context, namespace: &str, cluster: &mut KindCluster) -> Result<Action> {
    let secret_name = config_secret_name(&cluster.spec.cluster_name);
    let credential_present = ctx.credentials.get(namespace, &secret_name).await?.is_some();

    let failure_message = if credential_present {
        None
    } else {
        Some(
            Error::credential_source(format!(
                "no kubeconfig material held for cluster '{}'; secret '{}' pending",
                cluster.spec.cluster_name, secret_name
            ))
            .to_string(),
        )
    };

    let up_to_date = cluster
        .status
        .as_ref()
        .map(|s| s.ready == Some(true) && s.failure_message == failure_message)
        .unwrap_or(false);

    if !up_to_date {
        let status = cluster.status.get_or_insert_with(KindClusterStatus::default);
        status.ready = Some(true);
        status.failure_message = failure_message.clone();
        ctx.resources.update_status(cluster).await?;
    }

    if credential_present {
        Ok(Action::await_change())
    } else {
        warn!(secret = %secret_name, "Cluster ready but kubeconfig secret is pending");
        Ok(Action::requeue(CREDENTIAL_RETRY))
    }
}

/// Get-or-create the kubeconfig secret from the bytes a create returned
async fn store_credential(
    ctx: &Context,
    namespace: &str,
    cluster: &KindCluster,
    bytes: Vec<u8>,
) -> Result<()> {
    let secret_name = config_secret_name(&cluster.spec.cluster_name);

    if ctx.credentials.get(namespace, &secret_name).await?.is_some() {
        return Ok(());
    }

    ctx.credentials.put(namespace, &secret_name, bytes).await
}
