//! Admin sessions.
//!
//! Credentials are checked by the identity service; a successful sign-in
//! opens a session here. The client receives an opaque random token and
//! only its SHA-256 hash is kept, so a dump of the session table cannot be
//! replayed.
//!
//! Every session carries a `watch` channel that flips to `false` when the
//! session ends (sign-out or expiry). Open pages subscribe to it to learn
//! that they must go back to the entry page.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use qtrace_cloud::SignedInUser;
use qtrace_core::types::Timestamp;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Cookie carrying the session token for browser page loads.
pub const SESSION_COOKIE: &str = "qtrace_session";

/// The signed-in admin behind a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub expires_at: Timestamp,
}

struct Entry {
    session: Session,
    active: watch::Sender<bool>,
}

/// In-memory session table keyed by token hash.
pub struct SessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Open a session for a signed-in user. Returns the plaintext token,
    /// which is never stored.
    pub async fn open(&self, user: SignedInUser) -> (String, Session) {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            uid: user.uid,
            email: user.email,
            display_name: user.display_name.filter(|n| !n.is_empty()),
            expires_at: Utc::now() + self.ttl,
        };
        let (active, _) = watch::channel(true);

        self.entries.write().await.insert(
            hash_token(&token),
            Entry {
                session: session.clone(),
                active,
            },
        );
        (token, session)
    }

    /// The live session behind `token`. An expired session is ended on the
    /// spot and reads as absent.
    pub async fn validate(&self, token: &str) -> Option<Session> {
        let key = hash_token(token);
        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => return None,
                Some(entry) if entry.session.expires_at > Utc::now() => {
                    return Some(entry.session.clone())
                }
                Some(_) => {}
            }
        }
        self.end(&key).await;
        None
    }

    /// End the session behind `token`. Returns `false` if there was none.
    pub async fn close(&self, token: &str) -> bool {
        self.end(&hash_token(token)).await
    }

    /// Follow the session's state: `true` while it is live, `false` once it
    /// has ended. `None` if the token has no session.
    pub async fn subscribe(&self, token: &str) -> Option<watch::Receiver<bool>> {
        self.entries
            .read()
            .await
            .get(&hash_token(token))
            .map(|entry| entry.active.subscribe())
    }

    /// End every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.session.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            if let Some(entry) = entries.remove(key) {
                entry.active.send_replace(false);
            }
        }
        expired.len()
    }

    /// Sessions held, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn end(&self, key: &str) -> bool {
        match self.entries.write().await.remove(key) {
            Some(entry) => {
                entry.active.send_replace(false);
                true
            }
            None => false,
        }
    }
}

/// Periodically end expired sessions so their watchers are told promptly.
pub fn spawn_sweeper(sessions: Arc<SessionStore>, every: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let expired = sessions.purge_expired().await;
            if expired > 0 {
                tracing::info!(expired, "Expired sessions ended");
            }
        }
    })
}

/// Compute a SHA-256 hex digest of a session token for storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> SignedInUser {
        SignedInUser {
            uid: "u1".into(),
            email: "admin@qc.gov.ph".into(),
            display_name: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn open_then_validate() {
        let store = SessionStore::new(Duration::hours(1));
        let (token, session) = store.open(admin()).await;

        assert_eq!(session.uid, "u1");
        assert_eq!(session.display_name, None);
        assert_eq!(store.validate(&token).await, Some(session));
        assert_eq!(store.validate("not-a-token").await, None);
    }

    #[tokio::test]
    async fn only_the_hash_is_kept() {
        let store = SessionStore::new(Duration::hours(1));
        let (token, _) = store.open(admin()).await;

        let entries = store.entries.read().await;
        assert!(!entries.contains_key(&token));
        assert!(entries.contains_key(&hash_token(&token)));
    }

    #[tokio::test]
    async fn close_notifies_watchers() {
        let store = SessionStore::new(Duration::hours(1));
        let (token, _) = store.open(admin()).await;
        let rx = store.subscribe(&token).await.unwrap();
        assert!(*rx.borrow());

        assert!(store.close(&token).await);
        assert!(!*rx.borrow());

        assert!(!store.close(&token).await);
        assert_eq!(store.validate(&token).await, None);
    }

    #[tokio::test]
    async fn expired_session_is_ended_on_validate() {
        let store = SessionStore::new(Duration::seconds(-1));
        let (token, _) = store.open(admin()).await;
        let rx = store.subscribe(&token).await.unwrap();

        assert_eq!(store.validate(&token).await, None);
        assert!(!*rx.borrow());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let live = SessionStore::new(Duration::hours(1));
        live.open(admin()).await;
        assert_eq!(live.purge_expired().await, 0);
        assert_eq!(live.len().await, 1);

        let stale = SessionStore::new(Duration::seconds(-1));
        stale.open(admin()).await;
        stale.open(admin()).await;
        assert_eq!(stale.purge_expired().await, 2);
        assert!(stale.is_empty().await);
    }

    #[test]
    fn token_hash_is_hex_sha256() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
