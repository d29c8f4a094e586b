//! Identity arrival/departure tracking.
//!
//! # Responsibility
//! - Hold the currently bound user id and notify observers when it changes.
//!
//! # Invariants
//! - No credential material passes through here; only the opaque user id.
//! - Observer callbacks run outside the hub's internal lock.
//!
//! # See also
//! - docs/architecture/sync.md

use log::info;
use std::sync::{Arc, Mutex};

/// Receives the new identity (or `None` on sign-out) after every change.
pub trait AuthObserver: Send + Sync {
    fn on_auth_changed(&self, user_id: Option<&str>);
}

/// Shared identity state with typed change observers.
#[derive(Default)]
pub struct IdentityHub {
    inner: Mutex<HubState>,
}

#[derive(Default)]
struct HubState {
    user_id: Option<String>,
    observers: Vec<Arc<dyn AuthObserver>>,
}

impl IdentityHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<String> {
        self.inner
            .lock()
            .expect("identity lock poisoned")
            .user_id
            .clone()
    }

    pub fn subscribe(&self, observer: Arc<dyn AuthObserver>) {
        self.inner
            .lock()
            .expect("identity lock poisoned")
            .observers
            .push(observer);
    }

    /// Binds an identity; re-signing the same id is a no-op.
    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        let observers = {
            let mut state = self.inner.lock().expect("identity lock poisoned");
            if state.user_id.as_deref() == Some(user_id.as_str()) {
                return;
            }
            state.user_id = Some(user_id.clone());
            state.observers.clone()
        };
        info!("event=sign_in module=sync status=ok");
        for observer in observers {
            observer.on_auth_changed(Some(user_id.as_str()));
        }
    }

    /// Clears the bound identity; a no-op when already signed out.
    pub fn sign_out(&self) {
        let observers = {
            let mut state = self.inner.lock().expect("identity lock poisoned");
            if state.user_id.is_none() {
                return;
            }
            state.user_id = None;
            state.observers.clone()
        };
        info!("event=sign_out module=sync status=ok");
        for observer in observers {
            observer.on_auth_changed(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthObserver, IdentityHub};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<Option<String>>>,
    }

    impl AuthObserver for RecordingObserver {
        fn on_auth_changed(&self, user_id: Option<&str>) {
            self.seen
                .lock()
                .expect("test lock")
                .push(user_id.map(str::to_string));
        }
    }

    #[test]
    fn observers_see_sign_in_and_sign_out() {
        let hub = IdentityHub::new();
        let observer = Arc::new(RecordingObserver::default());
        hub.subscribe(observer.clone());

        hub.sign_in("user-1");
        hub.sign_in("user-1");
        hub.sign_out();
        hub.sign_out();

        let seen = observer.seen.lock().expect("test lock");
        assert_eq!(*seen, vec![Some("user-1".to_string()), None]);
    }
}
