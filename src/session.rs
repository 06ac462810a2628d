// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed-in user state and listener subscriptions.
//!
//! The session is passed to screens explicitly. Listeners receive the
//! current state immediately and then every change, until their
//! [`Subscription`] is dropped or unsubscribed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The authenticated user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    /// Identity Toolkit ID token, needed for account updates
    #[serde(skip)]
    pub id_token: String,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>, email: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            email,
            id_token: String::new(),
        }
    }
}

impl fmt::Debug for AuthUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthUser")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Handle to an active listener.
///
/// Dropping the handle tears the listener down.
#[must_use = "dropping a Subscription immediately cancels it"]
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Cancel the listener now.
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Deliver the current value and then every change of `rx` to `callback`.
///
/// Changes that happen faster than the listener runs are coalesced; the
/// listener always sees the latest value. Must be called inside a Tokio
/// runtime.
pub(crate) fn watch_with<T, F>(mut rx: watch::Receiver<T>, callback: F) -> Subscription
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T) + Send + 'static,
{
    callback(rx.borrow_and_update().clone());

    let handle = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let value = rx.borrow_and_update().clone();
            callback(value);
        }
    });

    Subscription {
        handle: Some(handle),
    }
}

/// Auth session shared by all screens.
#[derive(Clone)]
pub struct Session {
    state: Arc<watch::Sender<Option<AuthUser>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A signed-out session.
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state: Arc::new(state),
        }
    }

    /// A session already signed in as `user`.
    pub fn signed_in(user: AuthUser) -> Self {
        let session = Self::new();
        session.set_user(Some(user));
        session
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    pub fn uid(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|u| u.uid.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn set_user(&self, user: Option<AuthUser>) {
        if let Some(user) = &user {
            tracing::info!(uid = %user.uid, "Signed in");
        }
        self.state.send_replace(user);
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.state.send_replace(None) {
            tracing::info!(uid = %previous.uid, "Signed out");
        }
    }

    /// Listen for sign-in and sign-out.
    pub fn on_auth_state_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<AuthUser>) + Send + 'static,
    {
        watch_with(self.state.subscribe(), callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_listener_gets_current_then_changes() {
        let session = Session::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _sub = session.on_auth_state_changed(move |user| {
            let _ = tx.send(user.map(|u| u.uid));
        });
        assert_eq!(rx.recv().await, Some(None));

        session.set_user(Some(AuthUser::new("u1", None)));
        assert_eq!(rx.recv().await, Some(Some("u1".to_string())));

        session.sign_out();
        assert_eq!(rx.recv().await, Some(None));
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_delivery() {
        let session = Session::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let sub = session.on_auth_state_changed(move |user| {
            let _ = tx.send(user.map(|u| u.uid));
        });
        assert_eq!(rx.recv().await, Some(None));

        sub.unsubscribe();
        session.set_user(Some(AuthUser::new("u1", None)));
        tokio::task::yield_now().await;

        // The sender lived in the aborted task, so the channel closes
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_debug_hides_token() {
        let mut user = AuthUser::new("u1", Some("a@b.co".to_string()));
        user.id_token = "secret-token".to_string();
        assert!(!format!("{:?}", user).contains("secret-token"));
    }
}
