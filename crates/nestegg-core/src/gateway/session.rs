//! Authentication session
//!
//! The session is a plain value owned by the application and passed to
//! every gateway call. [`SessionStore`] keeps it between CLI invocations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{AuthResponse, User};

use super::local::write_json_atomic;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// A logged-out session
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The bearer token, or an auth error when logged out
    pub fn bearer(&self) -> Result<&str> {
        self.token()
            .ok_or_else(|| Error::Auth("Not logged in".to_string()))
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Take the names from an updated profile, keeping the known id and
    /// email when the response omits them.
    pub fn apply_profile(&mut self, updated: User) {
        let merged = match self.user.take() {
            Some(current) => User {
                id: updated.id.or(current.id),
                email: updated.email.or(current.email),
                first_name: updated.first_name,
                last_name: updated.last_name,
            },
            None => updated,
        };
        self.user = Some(merged);
    }

    /// Drop the token and the profile
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// Clear the session if `err` means the token is no longer valid
    pub fn clear_on_auth_error(&mut self, err: &Error) {
        if err.is_auth() && self.is_authenticated() {
            tracing::info!("Session rejected by server, logging out");
            self.clear();
        }
    }
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self::authenticated(auth.token, auth.user)
    }
}

/// File-backed session persistence (`<data_dir>/session.json`)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session; a missing file is a logged-out session
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::anonymous());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the session, removing the file when it is logged out
    pub fn save(&self, session: &Session) -> Result<()> {
        if !session.is_authenticated() {
            return self.clear();
        }
        write_json_atomic(&self.path, session)
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;
    use tempfile::TempDir;

    fn user() -> User {
        User {
            id: Some(RecordId::new("u1")),
            email: Some("dana@example.com".into()),
            first_name: Some("Dana".into()),
            last_name: None,
        }
    }

    #[test]
    fn test_bearer_requires_login() {
        let session = Session::anonymous();
        assert!(session.bearer().unwrap_err().is_auth());

        let session = Session::authenticated("tok", user());
        assert_eq!(session.bearer().unwrap(), "tok");
    }

    #[test]
    fn test_clear_on_auth_error_only() {
        let mut session = Session::authenticated("tok", user());
        session.clear_on_auth_error(&Error::NotFound("x".into()));
        assert!(session.is_authenticated());

        session.clear_on_auth_error(&Error::Auth("expired".into()));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_store_roundtrip_and_logout() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(!store.load().unwrap().is_authenticated());

        let session = Session::authenticated("tok", user());
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), session);

        store.save(&Session::anonymous()).unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }
}
