use tracing::{debug, warn};

use super::TokenStorage;

/// Storage key holding the admin token.
pub const TOKEN_KEY: &str = "aToken";

/// The admin session: a single opaque token, empty when logged out.
pub struct SessionStore<S: TokenStorage> {
    storage: S,
    token: String,
}

impl<S: TokenStorage> SessionStore<S> {
    /// Load the token from storage.
    ///
    /// A missing key and an unreadable store both start an empty session.
    pub fn initialize(storage: S) -> Self {
        let token = match storage.get(TOKEN_KEY) {
            Ok(Some(token)) => token,
            Ok(None) => String::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read stored token, starting logged out");
                String::new()
            }
        };
        debug!(authenticated = !token.is_empty(), "Session initialized");

        Self { storage, token }
    }

    pub fn get(&self) -> &str {
        &self.token
    }

    /// Replace the token and persist it. The in-memory value changes even if
    /// persisting fails.
    pub fn set(&mut self, token: impl Into<String>) {
        self.token = token.into();
        if let Err(e) = self.storage.set(TOKEN_KEY, &self.token) {
            warn!(error = %e, "Failed to persist token");
        }
    }

    /// Log out: forget the token here and in storage.
    pub fn clear(&mut self) {
        self.token.clear();
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "Failed to remove stored token");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{FileStorage, MemoryStorage};
    use anyhow::{anyhow, Result};

    struct BrokenStorage;

    impl TokenStorage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn test_initialize_without_stored_token() {
        let session = SessionStore::initialize(MemoryStorage::new());
        assert_eq!(session.get(), "");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_initialize_with_stored_token() {
        let session = SessionStore::initialize(MemoryStorage::with_entry(TOKEN_KEY, "abc"));
        assert_eq!(session.get(), "abc");
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_initialize_with_unreadable_storage() {
        let session = SessionStore::initialize(BrokenStorage);
        assert_eq!(session.get(), "");
    }

    #[test]
    fn test_set_persists() {
        let storage = MemoryStorage::new();
        let mut session = SessionStore::initialize(storage.clone());
        session.set("tok1");

        assert_eq!(session.get(), "tok1");
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok1"));
    }

    #[test]
    fn test_set_keeps_memory_value_when_persist_fails() {
        let mut session = SessionStore::initialize(BrokenStorage);
        session.set("tok1");
        assert_eq!(session.get(), "tok1");
    }

    #[test]
    fn test_clear_removes_stored_token() {
        let storage = MemoryStorage::with_entry(TOKEN_KEY, "abc");
        let mut session = SessionStore::initialize(storage.clone());
        session.clear();

        assert_eq!(session.get(), "");
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_and_clear_survive_reopen_with_file_storage() {
        let dir = std::env::temp_dir()
            .join(format!("clinicdesk-session-{:016x}", rand::random::<u64>()));

        let mut session = SessionStore::initialize(FileStorage::new(&dir));
        session.set("tok1");

        let reopened = SessionStore::initialize(FileStorage::new(&dir));
        assert_eq!(reopened.get(), "tok1");

        session.clear();
        let reopened = SessionStore::initialize(FileStorage::new(&dir));
        assert_eq!(reopened.get(), "");
        assert!(!reopened.is_authenticated());

        std::fs::remove_dir_all(dir).ok();
    }
}
