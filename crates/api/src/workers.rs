//! Background maintenance tasks owned by the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use tollgate_auth::RevocationStore;

/// Handle to a running background worker.
pub struct WorkerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Ask the worker to stop and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.join.await;
    }
}

/// Periodically prune expired revocation entries.
///
/// Complements the lazy sweep performed inside `revoke`, so the map also
/// shrinks while no one is logging out.
pub fn spawn_revocation_sweeper(store: Arc<RevocationStore>, tick: Duration) -> WorkerHandle {
    let (tx, mut rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut rx => break,
                _ = interval.tick() => {
                    let removed = store.prune();
                    if removed > 0 {
                        tracing::debug!(worker = "revocation_sweeper", removed, remaining = store.len(), "pruned revocations");
                    }
                }
            }
        }

        tracing::debug!(worker = "revocation_sweeper", "stopped");
    });

    WorkerHandle {
        shutdown: Some(tx),
        join,
    }
}
