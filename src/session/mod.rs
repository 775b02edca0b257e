//! Session State
//!
//! The logged-in user and bearer token live in an explicit [`Session`]
//! object: `login` populates it, `logout` clears it, and `restore` rehydrates
//! it from the session file written by a previous run. Nothing else in the
//! crate reads the token from storage.

mod jwt;

pub use jwt::{decode_claims, is_token_expired, JwtClaims};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::models::User;

/// What is persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user: User,
    pub logged_in_at: DateTime<Utc>,
}

/// Errors from session handling
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Login failed: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Session file {path:?} is corrupt: {error}")]
    Corrupt { path: PathBuf, error: String },

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is already expired")]
    Expired,
}

/// Where the session is persisted; `None` keeps it in memory only
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load(&self) -> Result<Option<SessionData>, SessionError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| SessionError::Io {
            path: path.clone(),
            error: e.to_string(),
        })?;
        let data = serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
            path: path.clone(),
            error: e.to_string(),
        })?;
        Ok(Some(data))
    }

    fn save(&self, data: &SessionData) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |e: std::io::Error| SessionError::Io {
            path: path.clone(),
            error: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(data).map_err(|e| SessionError::Corrupt {
            path: path.clone(),
            error: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(io_err)
    }

    fn clear(&self) -> Result<(), SessionError> {
        match &self.path {
            Some(path) if path.exists() => std::fs::remove_file(path).map_err(|e| SessionError::Io {
                path: path.clone(),
                error: e.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// The current login, if any
#[derive(Debug, Default)]
pub struct Session {
    store: SessionStore,
    data: Option<SessionData>,
}

impl Session {
    /// An empty (logged-out) session backed by `store`
    pub fn new(store: SessionStore) -> Self {
        Self { store, data: None }
    }

    /// Load a previously saved session.
    ///
    /// An expired or undecodable token is discarded (and its file removed)
    /// rather than reported as an error. A corrupt file is an error.
    pub fn restore(store: SessionStore, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let data = match store.load()? {
            Some(data) if is_token_expired(&data.token, now) => {
                tracing::info!(user = %data.user.username, "Saved session expired, discarding");
                store.clear()?;
                None
            }
            other => other,
        };

        Ok(Self { store, data })
    }

    /// Log in against the backend and persist the session.
    ///
    /// The token is attached to `client` for subsequent requests.
    pub async fn login(
        &mut self,
        client: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<&User, SessionError> {
        let response = client.login(username, password).await?;

        decode_claims(&response.token)?;
        if is_token_expired(&response.token, Utc::now()) {
            return Err(SessionError::Expired);
        }

        let data = SessionData {
            token: response.token,
            user: response.user,
            logged_in_at: Utc::now(),
        };
        self.store.save(&data)?;
        client.set_token(Some(data.token.clone())).await;

        tracing::info!(user = %data.user.username, "Logged in");
        Ok(&self.data.insert(data).user)
    }

    /// Clear the session in memory, on disk and on the client
    pub async fn logout(&mut self, client: &ApiClient) -> Result<(), SessionError> {
        if let Some(data) = self.data.take() {
            tracing::info!(user = %data.user.username, "Logged out");
        }
        client.set_token(None).await;
        self.store.clear()
    }

    /// Log out when `err` is a backend 401. Returns whether the session ended.
    pub async fn end_if_unauthorized(
        &mut self,
        client: &ApiClient,
        err: &ApiError,
    ) -> Result<bool, SessionError> {
        if !err.is_unauthorized() {
            return Ok(false);
        }
        tracing::warn!("Backend rejected the session token");
        self.logout(client).await?;
        Ok(true)
    }

    /// Attach the restored token (if any) to `client`
    pub async fn attach(&self, client: &ApiClient) {
        client.set_token(self.token().map(str::to_string)).await;
    }

    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.data
            .as_ref()
            .is_some_and(|d| !is_token_expired(&d.token, now))
    }

    pub fn current_user(&self) -> Option<&User> {
        self.data.as_ref().map(|d| &d.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn data(&self) -> Option<&SessionData> {
        self.data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn user() -> User {
        serde_json::from_value(json!({"id": 1, "username": "dispatch"})).unwrap()
    }

    fn data_with_exp(exp: i64) -> SessionData {
        SessionData {
            token: jwt::make_token(&json!({ "exp": exp })),
            user: user(),
            logged_in_at: Utc::now(),
        }
    }

    #[test]
    fn test_restore_missing_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let store = SessionStore::file(dir.path().join("session.json"));
        let session = Session::restore(store, Utc::now()).unwrap();
        assert!(session.current_user().is_none());
        assert!(!session.is_authenticated(Utc::now()));
    }

    #[test]
    fn test_restore_valid_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::file(dir.path().join("nested").join("session.json"));
        let future = Utc::now().timestamp() + 3600;
        store.save(&data_with_exp(future)).unwrap();

        let session = Session::restore(store, Utc::now()).unwrap();
        assert!(session.is_authenticated(Utc::now()));
        assert_eq!(session.current_user().unwrap().username, "dispatch");
    }

    #[test]
    fn test_restore_discards_expired_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::file(&path);
        store.save(&data_with_exp(1_000)).unwrap();
        assert!(path.exists());

        let session = Session::restore(store, Utc::now()).unwrap();
        assert!(session.data().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_restore_corrupt_file_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = Session::restore(SessionStore::file(&path), Utc::now());
        assert!(matches!(result, Err(SessionError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::file(&path);
        store.save(&data_with_exp(Utc::now().timestamp() + 60)).unwrap();

        let client = ApiClient::new(Default::default()).unwrap();
        let mut session = Session::restore(store, Utc::now()).unwrap();
        session.attach(&client).await;
        assert!(client.has_token().await);

        session.logout(&client).await.unwrap();
        assert!(session.token().is_none());
        assert!(!client.has_token().await);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_only_unauthorized_ends_the_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::file(&path);
        store.save(&data_with_exp(Utc::now().timestamp() + 60)).unwrap();

        let client = ApiClient::new(Default::default()).unwrap();
        let mut session = Session::restore(store, Utc::now()).unwrap();
        session.attach(&client).await;

        let conflict = ApiError::Status { status: 409, message: None };
        assert!(!session.end_if_unauthorized(&client, &conflict).await.unwrap());
        assert!(path.exists());

        let expired = ApiError::Unauthorized { message: None };
        assert!(session.end_if_unauthorized(&client, &expired).await.unwrap());
        assert!(session.data().is_none());
        assert!(!client.has_token().await);
        assert!(!path.exists());
    }

    #[test]
    fn test_memory_store_never_touches_disk() {
        let store = SessionStore::memory();
        assert!(store.path().is_none());
        store.save(&data_with_exp(0)).unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }
}
