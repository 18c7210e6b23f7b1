//! KindCluster controller
//!
//! Watches KindCluster resources and triggers reconciliation. The
//! kube-runtime controller serializes reconciles per key while running
//! different keys in parallel.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use kube::{
    api::ListParams,
    runtime::{
        controller::{Action, Controller},
        watcher::Config as WatcherConfig,
    },
    Api, Client, ResourceExt,
};
use tracing::{error, info, instrument};

use crate::controllers::Context;
use crate::crd::KindCluster;
use crate::error::{Error, Result};
use crate::metrics;
use crate::reconcilers::kind_cluster as kind_cluster_reconciler;

/// Run the KindCluster controller
pub async fn run(client: Client, context: Arc<Context>) {
    let api: Api<KindCluster> = Api::all(client);

    // Verify CRD is installed
    if let Err(e) = api.list(&ListParams::default().limit(1)).await {
        error!("KindCluster CRD not installed: {}", e);
        return;
    }

    info!("Starting KindCluster controller");

    Controller::new(api, WatcherConfig::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, context)
        .for_each(|result| async move {
            match result {
                Ok((obj, _action)) => {
                    info!(
                        name = %obj.name,
                        namespace = obj.namespace.as_deref().unwrap_or("default"),
                        "Reconciled KindCluster"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Reconciliation error");
                    metrics::RECONCILIATION_ERRORS
                        .with_label_values(&["KindCluster"])
                        .inc();
                }
            }
        })
        .await;
}

/// Main reconciliation function
#[instrument(skip(ctx), fields(name = %obj.name_any(), namespace = obj.namespace()))]
async fn reconcile(obj: Arc<KindCluster>, ctx: Arc<Context>) -> Result<Action> {
    let _timer = metrics::RECONCILE_DURATION
        .with_label_values(&["KindCluster"])
        .start_timer();
    metrics::RECONCILIATIONS
        .with_label_values(&["KindCluster"])
        .inc();

    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());

    kind_cluster_reconciler::reconcile(&ctx, &namespace, &name).await
}

/// Error policy for the controller
fn error_policy(obj: Arc<KindCluster>, error: &Error, _ctx: Arc<Context>) -> Action {
    let name = obj.name_any();
    error!(
        name = %name,
        error = %error,
        "Reconciliation failed, scheduling retry"
    );

    // Backoff by error class: transient infra failures retry sooner
    let requeue_duration = match error {
        Error::Kube(_) | Error::Timeout(_) => Duration::from_secs(30),
        Error::Provisioner(_) => Duration::from_secs(60),
        Error::CredentialSource(_) => Duration::from_secs(60),
        _ => Duration::from_secs(300),
    };

    Action::requeue(requeue_duration)
}
