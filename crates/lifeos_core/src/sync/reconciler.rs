//! Per-module reconcile and push driver.
//!
//! # Responsibility
//! - On identity arrival, reconcile the local slice payload against the
//!   remote document: remote wins, absence seeds from local.
//! - Push full local payloads best-effort after every change.
//!
//! # Invariants
//! - Remote failure never mutates local state; the outcome is reported and
//!   logged, not retried.
//! - A reconcile begun before the latest `stop`/`start` is discarded.
//! - Concurrent last-write-wins races are accepted by design of the data
//!   ownership model (one writer per user).
//!
//! # See also
//! - docs/architecture/sync.md

use crate::model::modules::ModuleKind;
use crate::sync::remote::RemoteStore;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Result of one reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A remote document existed; the caller must replace local state with
    /// the carried value.
    RemoteApplied(Value),
    /// No remote document existed; local state was written up as the seed.
    Seeded,
    /// Remote was unreachable, the seed write failed, or the session was
    /// superseded mid-flight. Local state stays untouched.
    Unavailable,
}

#[derive(Default)]
struct SessionState {
    user_id: Option<String>,
    generation: u64,
    seeded: bool,
}

/// Reconcile/push driver for one module.
pub struct ModuleSync {
    module: ModuleKind,
    remote: Arc<dyn RemoteStore>,
    state: Mutex<SessionState>,
}

impl ModuleSync {
    pub fn new(module: ModuleKind, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            module,
            remote,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn module(&self) -> ModuleKind {
        self.module
    }

    pub fn bound_user(&self) -> Option<String> {
        self.state
            .lock()
            .expect("sync state lock poisoned")
            .user_id
            .clone()
    }

    /// Binds `user_id` and reconciles the module once.
    ///
    /// The remote call runs outside the session lock; when the session was
    /// stopped or rebound while it was in flight, the result is discarded
    /// and `Unavailable` returned.
    pub fn start(&self, user_id: &str, local_payload: &Value) -> SyncOutcome {
        let module = self.module;
        let generation = {
            let mut state = self.state.lock().expect("sync state lock poisoned");
            if state.user_id.as_deref() != Some(user_id) {
                state.user_id = Some(user_id.to_string());
                state.seeded = false;
            }
            state.generation += 1;
            state.generation
        };

        let loaded = self.remote.load(module.remote_name(), user_id);

        let mut state = self.state.lock().expect("sync state lock poisoned");
        if state.generation != generation || state.user_id.as_deref() != Some(user_id) {
            info!("event=sync_start module=sync status=superseded target={module}");
            return SyncOutcome::Unavailable;
        }

        match loaded {
            Ok(Some(remote_value)) => {
                info!("event=sync_start module=sync status=ok target={module} outcome=remote");
                SyncOutcome::RemoteApplied(remote_value)
            }
            Ok(None) => {
                if state.seeded {
                    debug!(
                        "event=sync_start module=sync status=ok target={module} outcome=already_seeded"
                    );
                    return SyncOutcome::Seeded;
                }
                match self.remote.save(module.remote_name(), user_id, local_payload) {
                    Ok(()) => {
                        state.seeded = true;
                        info!(
                            "event=sync_start module=sync status=ok target={module} outcome=seeded"
                        );
                        SyncOutcome::Seeded
                    }
                    Err(err) => {
                        warn!(
                            "event=sync_start module=sync status=error target={module} stage=seed error={err}"
                        );
                        SyncOutcome::Unavailable
                    }
                }
            }
            Err(err) => {
                warn!(
                    "event=sync_start module=sync status=error target={module} stage=load error={err}"
                );
                SyncOutcome::Unavailable
            }
        }
    }

    /// Best-effort full-payload save. Failures are logged and swallowed;
    /// without a bound user this is a debug-logged no-op.
    pub fn push(&self, payload: &Value) {
        let module = self.module;
        let Some(user_id) = self.bound_user() else {
            debug!("event=sync_push module=sync status=skipped target={module} reason=no_user");
            return;
        };
        match self.remote.save(module.remote_name(), &user_id, payload) {
            Ok(()) => debug!("event=sync_push module=sync status=ok target={module}"),
            Err(err) => {
                warn!("event=sync_push module=sync status=error target={module} error={err}");
            }
        }
    }

    /// Unbinds the session. In-flight reconciles become stale and their
    /// results are discarded; local persistence continues unaffected.
    pub fn stop(&self) {
        let mut state = self.state.lock().expect("sync state lock poisoned");
        state.user_id = None;
        state.seeded = false;
        state.generation += 1;
        info!("event=sync_stop module=sync status=ok target={}", self.module);
    }
}
