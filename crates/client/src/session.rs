//! Local session storage: the auth token and the signed-in user's profile.
//!
//! The session file is read once when the store is loaded. From then on every
//! read is served from memory, and every write updates the file first and the
//! in-memory copy second, so the two never disagree after a failed write.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bloom_core::models::{AuthResponse, User};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Errors from reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct SessionData {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_token",
        deserialize_with = "deserialize_token"
    )]
    token: Option<SecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

#[allow(clippy::ref_option)]
fn serialize_token<S: Serializer>(token: &Option<SecretString>, s: S) -> Result<S::Ok, S::Error> {
    token.as_ref().map(|t| t.expose_secret()).serialize(s)
}

fn deserialize_token<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.map(SecretString::from))
}

/// File-backed session with an eagerly loaded in-memory copy.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    path: PathBuf,
    state: RwLock<SessionData>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("path", &self.inner.path)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Load the session stored at `path`.
    ///
    /// A missing file is an empty (logged-out) session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the file exists but cannot be read or parsed.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<SessionData>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionData::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), logged_in = data.token.is_some(), "Session loaded");

        Ok(Self {
            inner: Arc::new(SessionInner {
                path,
                state: RwLock::new(data),
            }),
        })
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// The stored auth token, if any.
    pub async fn token(&self) -> Option<SecretString> {
        self.inner.state.read().await.token.clone()
    }

    /// The stored user profile, if any.
    pub async fn user(&self) -> Option<User> {
        self.inner.state.read().await.user.clone()
    }

    /// True when a non-empty token is stored.
    pub async fn is_logged_in(&self) -> bool {
        self.inner
            .state
            .read()
            .await
            .token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// Store a new auth token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written.
    pub async fn save_token(&self, token: &str) -> Result<(), SessionError> {
        self.update(|data| data.token = Some(SecretString::from(token))).await
    }

    /// Store the user profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written.
    pub async fn save_user(&self, user: User) -> Result<(), SessionError> {
        self.update(|data| data.user = Some(user)).await
    }

    /// Store the token and profile from a login or registration in one write.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written.
    pub async fn save_auth(&self, auth: &AuthResponse) -> Result<(), SessionError> {
        self.update(|data| {
            data.token = Some(SecretString::from(auth.token.as_str()));
            data.user = Some(auth.user.clone());
        })
        .await?;
        info!(user_id = %auth.user.id, "Session saved");
        Ok(())
    }

    /// Forget the token and profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session file cannot be written.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.update(|data| *data = SessionData::default()).await?;
        info!("Session cleared");
        Ok(())
    }

    /// Apply `f` to a copy of the session, persist it, then publish it.
    ///
    /// The write lock is held across the file write so concurrent updates
    /// are persisted in the order they are applied.
    async fn update(&self, f: impl FnOnce(&mut SessionData)) -> Result<(), SessionError> {
        let mut state = self.inner.state.write().await;
        let mut next = state.clone();
        f(&mut next);
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn persist(&self, data: &SessionData) -> Result<(), SessionError> {
        let path = &self.inner.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so a crash never leaves a truncated session file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(data)?).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bloom_core::Email;

    fn user() -> User {
        User {
            id: "u1".into(),
            name: "Asha".to_string(),
            email: Email::parse("asha@bloom.in").unwrap(),
            phone: None,
            avatar: None,
            role: bloom_core::UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("session.json")).await.unwrap();

        assert!(!store.is_logged_in().await);
        assert!(store.token().await.is_none());
        assert!(store.user().await.is_none());
    }

    #[tokio::test]
    async fn test_saved_session_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::load(&path).await.unwrap();
        store.save_token("tok-123").await.unwrap();
        store.save_user(user()).await.unwrap();

        let reloaded = SessionStore::load(&path).await.unwrap();
        assert!(reloaded.is_logged_in().await);
        assert_eq!(reloaded.token().await.unwrap().expose_secret(), "tok-123");
        assert_eq!(reloaded.user().await.unwrap(), user());
    }

    #[tokio::test]
    async fn test_empty_token_is_not_logged_in() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("s.json")).await.unwrap();
        store.save_token("").await.unwrap();
        assert!(!store.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let store = SessionStore::load(&path).await.unwrap();
        store.save_token("tok").await.unwrap();
        store.clear().await.unwrap();

        assert!(!store.is_logged_in().await);
        let reloaded = SessionStore::load(&path).await.unwrap();
        assert!(reloaded.token().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let err = SessionStore::load(&path).await.unwrap_err();
        assert!(matches!(err, SessionError::Parse(_)));
    }

    #[tokio::test]
    async fn test_debug_does_not_leak_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("s.json")).await.unwrap();
        store.save_token("very-secret-token").await.unwrap();
        assert!(!format!("{store:?}").contains("very-secret-token"));
    }

    #[tokio::test]
    async fn test_token_is_redacted_in_memory_and_plain_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let store = SessionStore::load(&path).await.unwrap();
        store.save_token("very-secret-token").await.unwrap();

        let token = store.token().await.unwrap();
        assert!(!format!("{token:?}").contains("very-secret-token"));
        assert_eq!(token.expose_secret(), "very-secret-token");

        let on_disk: serde_json::Value =
            serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(on_disk["token"], "very-secret-token");
    }
}
