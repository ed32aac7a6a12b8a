//! Session token handling.
//!
//! A [`Session`] owns the bearer token for one gateway. It can optionally
//! mirror the token into a durable [`TokenStore`]; without one the token
//! lives only as long as the process.

use anyhow::Result;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Key the token is stored under in a durable store
pub const TOKEN_KEY: &str = "vidmuse_token";

const SESSION_FILE: &str = "session.toml";

/// Durable backing for the session token
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Key/value TOML file holding the token under [`TOKEN_KEY`]
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store in the platform data directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "vidmuse", "vidmuse")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(proj_dirs.data_dir().join(SESSION_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(TOKEN_KEY))
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)?;
        tracing::debug!("Saved session token to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// In-memory copy of the token
#[derive(Debug, Default)]
struct TokenSlot {
    value: Option<String>,
    /// Set when the durable store no longer mirrors `value`: a write to it
    /// failed, or the token was seeded for this process only. While set,
    /// reads skip the store.
    pinned: bool,
}

/// Authentication state shared by every call a gateway makes
pub struct Session {
    token: RwLock<TokenSlot>,
    store: Option<Arc<dyn TokenStore>>,
}

impl Session {
    /// Token kept in memory only
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(TokenSlot::default()),
            store: None,
        }
    }

    /// Token mirrored into `store`
    pub fn persistent(store: Arc<dyn TokenStore>) -> Self {
        Self {
            token: RwLock::new(TokenSlot::default()),
            store: Some(store),
        }
    }

    /// Seed a token for this process without touching the durable store.
    /// The seed wins over whatever the store holds until the next
    /// successful write.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = TokenSlot {
            value: Some(token.into()),
            pinned: true,
        };
        self
    }

    /// Current token: durable store first, then memory, unless memory is
    /// pinned. Never fails.
    pub fn token(&self) -> Option<String> {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        if slot.pinned {
            return slot.value.clone();
        }

        if let Some(store) = &self.store {
            match store.get() {
                Ok(Some(token)) => {
                    slot.value = Some(token.clone());
                    return Some(token);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Token store unavailable, using in-memory token: {}", e),
            }
        }
        slot.value.clone()
    }

    /// Replace the token. `None` signs the session out.
    ///
    /// A failing durable store is logged and skipped; the in-memory value
    /// then stays authoritative for the lifetime of the process.
    pub fn set_token(&self, token: Option<&str>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        slot.value = token.map(str::to_string);
        slot.pinned = false;

        if let Some(store) = &self.store {
            let result = match token {
                Some(token) => store.set(token),
                None => store.clear(),
            };
            if let Err(e) = result {
                tracing::warn!("Token not persisted, keeping it in memory only: {}", e);
                slot.pinned = true;
            }
        }
    }

    pub fn clear(&self) {
        self.set_token(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field(
                "authenticated",
                &self.token.read().map(|t| t.value.is_some()).unwrap_or(false),
            )
            .field("persistent", &self.store.is_some())
            .finish()
    }
}
