//! # Session Store
//!
//! The persisted client state: an opaque bearer credential and a minimal
//! identity record, kept under fixed named slots the way the storefront
//! keeps them in browser local storage. The checkout core only reads it;
//! login/logout flows write it.

use crate::error::{PaymentError, PaymentResult};
use crate::serde_ext::string_or_number;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Slot holding the bearer token
pub const AUTH_TOKEN_KEY: &str = "afriart_auth_token";

/// Slot holding the JSON-encoded [`Identity`]
pub const USER_DATA_KEY: &str = "afriart_user_data";

/// Opaque bearer credential.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// # Errors
    /// `Unauthenticated` for an empty token.
    pub fn new(token: impl Into<String>) -> PaymentResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(PaymentError::Unauthenticated(
                "Empty authentication token".to_string(),
            ));
        }
        Ok(Self(token))
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Minimal identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// A loaded session: credential plus identity
#[derive(Debug, Clone)]
pub struct Session {
    pub credential: Credential,
    pub identity: Identity,
}

/// Key/value store with local-storage semantics
pub trait SessionStore: Send + Sync {
    fn get_item(&self, key: &str) -> PaymentResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> PaymentResult<()>;

    fn remove_item(&self, key: &str) -> PaymentResult<()>;
}

/// Load the credential and identity.
///
/// # Errors
/// `Unauthenticated` if either slot is empty; `Serialization` if the
/// identity record is corrupt.
pub fn load_session(store: &dyn SessionStore) -> PaymentResult<Session> {
    let token = store.get_item(AUTH_TOKEN_KEY)?.ok_or_else(|| {
        PaymentError::Unauthenticated("Please login to complete your purchase".to_string())
    })?;
    let user_data = store.get_item(USER_DATA_KEY)?.ok_or_else(|| {
        PaymentError::Unauthenticated("No user data in session".to_string())
    })?;

    let identity: Identity = serde_json::from_str(&user_data)?;
    Ok(Session {
        credential: Credential::new(token)?,
        identity,
    })
}

/// Persist a freshly issued credential and identity
pub fn store_session(
    store: &dyn SessionStore,
    credential: &Credential,
    identity: &Identity,
) -> PaymentResult<()> {
    store.set_item(AUTH_TOKEN_KEY, credential.token())?;
    store.set_item(USER_DATA_KEY, &serde_json::to_string(identity)?)?;
    debug!(user_id = %identity.user_id, is_admin = identity.is_admin, "Session stored");
    Ok(())
}

/// Forget the session (logout)
pub fn clear_session(store: &dyn SessionStore) -> PaymentResult<()> {
    store.remove_item(AUTH_TOKEN_KEY)?;
    store.remove_item(USER_DATA_KEY)
}

pub fn is_authenticated(store: &dyn SessionStore) -> bool {
    matches!(store.get_item(AUTH_TOKEN_KEY), Ok(Some(_)))
}

/// In-memory store (tests, embedding)
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PaymentResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| PaymentError::Storage("session store lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> PaymentResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> PaymentResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> PaymentResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// Every call re-reads the file, so several processes see each other's
/// logins and logouts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> PaymentResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(PaymentError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write_all(&self, items: &HashMap<String, String>) -> PaymentResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PaymentError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let content = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, content).map_err(|e| {
            PaymentError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get_item(&self, key: &str) -> PaymentResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> PaymentResult<()> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }

    fn remove_item(&self, key: &str) -> PaymentResult<()> {
        let mut items = self.read_all()?;
        if items.remove(key).is_some() {
            self.write_all(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("eyJhbGciOi.secret").unwrap();
        assert_eq!(format!("{:?}", credential), "Credential(***)");
        assert_eq!(credential.bearer(), "Bearer eyJhbGciOi.secret");
        assert!(Credential::new("  ").is_err());
    }

    #[test]
    fn test_load_session_requires_both_slots() {
        let store = MemorySessionStore::new();
        assert!(matches!(
            load_session(&store),
            Err(PaymentError::Unauthenticated(_))
        ));

        store.set_item(AUTH_TOKEN_KEY, "tok").unwrap();
        assert!(is_authenticated(&store));
        assert!(matches!(
            load_session(&store),
            Err(PaymentError::Unauthenticated(_))
        ));

        store
            .set_item(USER_DATA_KEY, r#"{"user_id": 7, "name": "Wanjiru"}"#)
            .unwrap();
        let session = load_session(&store).unwrap();
        assert_eq!(session.credential.token(), "tok");
        assert_eq!(session.identity.user_id, "7");
        assert!(!session.identity.is_admin);
    }

    #[test]
    fn test_store_and_clear_session() {
        let store = MemorySessionStore::new();
        let credential = Credential::new("tok").unwrap();
        let identity = Identity::new("3", "Otieno").admin();

        store_session(&store, &credential, &identity).unwrap();
        let session = load_session(&store).unwrap();
        assert_eq!(session.identity, identity);

        clear_session(&store).unwrap();
        assert!(!is_authenticated(&store));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.get_item(AUTH_TOKEN_KEY).unwrap(), None);

        store.set_item(AUTH_TOKEN_KEY, "tok").unwrap();
        let reopened = FileSessionStore::new(store.path().to_path_buf());
        assert_eq!(reopened.get_item(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok"));

        reopened.remove_item(AUTH_TOKEN_KEY).unwrap();
        assert_eq!(store.get_item(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_user_data() {
        let store = MemorySessionStore::new();
        store.set_item(AUTH_TOKEN_KEY, "tok").unwrap();
        store.set_item(USER_DATA_KEY, "not json").unwrap();

        assert!(matches!(
            load_session(&store),
            Err(PaymentError::Serialization(_))
        ));
    }
}
