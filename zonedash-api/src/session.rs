//! Process-wide session: the bearer token and where it is persisted.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::utils::log_sanitizer::mask_token;

/// Persisted token storage.
///
/// Platform implementations:
/// - CLI: `FileTokenStore` (token file under the user data directory)
/// - Tests / ephemeral use: [`MemoryTokenStore`]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any.
    async fn load(&self) -> Result<Option<String>>;

    /// Persist a token, replacing any previous one.
    async fn save(&self, token: &str) -> Result<()>;

    /// Delete the persisted token. Removing a missing token is not an error.
    async fn remove(&self) -> Result<()>;
}

/// Token store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Shared session handle.
///
/// Every request reads the token through this handle; only login/logout/signup
/// flows write it, and the unauthorized hook clears it. Clones share state.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Empty session backed by `store`. Call [`restore`](Self::restore) to pick up
    /// a previously persisted token.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Ephemeral session with an in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Load the persisted token into memory. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool> {
        let token = self.store.load().await?;
        let found = token.is_some();
        *self.token.write().await = token;
        Ok(found)
    }

    /// Current token, if signed in.
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Whether a token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Store a freshly issued token in memory and in the persisted store.
    pub async fn set(&self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        log::debug!("Session token set ({})", mask_token(&token));
        *self.token.write().await = Some(token.clone());
        self.store.save(&token).await
    }

    /// Discard the token from memory and the persisted store.
    ///
    /// The in-memory token is dropped even if the store fails.
    pub async fn clear(&self) -> Result<()> {
        self.token.write().await.take();
        log::debug!("Session token cleared");
        self.store.remove().await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
