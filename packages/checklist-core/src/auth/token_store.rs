//! Session storage with platform keyring and file-based fallback.
//!
//! Storage priority:
//! 1. Platform keyring (if `keyring-storage` feature enabled and available)
//! 2. File-based storage (`~/.config/checklist/.session`, owner-only)
//!
//! Every store treats absent or unreadable data as "no session".

use crate::api::ApiError;
use crate::models::User;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[cfg(feature = "keyring-storage")]
use keyring::Entry;

/// Service name used for keyring storage
#[cfg(feature = "keyring-storage")]
const KEYRING_SERVICE: &str = "checklist";
/// Username used for keyring entry
#[cfg(feature = "keyring-storage")]
const KEYRING_USER: &str = "session";

const SESSION_FILE: &str = ".session";

/// The signed-in state: tokens plus the user snapshot captured at login.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user.as_ref().map(|u| &u.email))
            .finish()
    }
}

/// Durable home of the single active [`Session`].
///
/// Saves replace the whole record; concurrent writers resolve as last
/// writer wins.
pub trait TokenStore: Send + Sync {
    fn save(&self, session: &Session) -> Result<(), ApiError>;

    /// Returns `None` when nothing is stored or the stored data is unusable.
    fn load(&self) -> Option<Session>;

    fn clear(&self) -> Result<(), ApiError>;
}

/// Get the checklist config directory
pub(crate) fn get_config_dir() -> Result<PathBuf, ApiError> {
    let config_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .ok_or_else(|| ApiError::Storage("Failed to find config directory".to_string()))?;
    Ok(config_dir.join("checklist"))
}

fn storage_error(context: &str, err: impl std::fmt::Display) -> ApiError {
    ApiError::Storage(format!("{}: {}", context, err))
}

// ============================================================================
// File-based session storage (always available)
// ============================================================================

/// JSON file store. Writes go to a sibling temp file that is then renamed
/// over the target, so readers never see a half-written session.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.config/checklist/.session`.
    pub fn default_location() -> Result<Self, ApiError> {
        Ok(Self::new(get_config_dir()?.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600) // Owner read/write only
                .open(path)?;
            let mut file = std::io::BufWriter::new(file);
            file.write_all(contents)?;
            file.flush()
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, session: &Session) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| storage_error("Failed to create session directory", e))?;
            }
        }

        let json =
            serde_json::to_vec(session).map_err(|e| storage_error("Failed to serialize session", e))?;

        let tmp = self.path.with_extension("tmp");
        Self::write_private(&tmp, &json).map_err(|e| storage_error("Failed to write session", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error("Failed to replace session file", e))?;

        tracing::debug!("Session saved to file: {:?}", self.path);
        Ok(())
    }

    fn load(&self) -> Option<Session> {
        if !self.path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read session file {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => {
                tracing::debug!("Session loaded from file");
                Some(session)
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Session file removed: {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("Failed to delete session file", e)),
        }
    }
}

// ============================================================================
// Keyring-based session storage (optional, platform-specific)
// ============================================================================

/// Platform keyring store that keeps a file copy as backup and falls back to
/// it whenever the keyring is unavailable.
#[cfg(feature = "keyring-storage")]
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    user: String,
    fallback: FileTokenStore,
}

#[cfg(feature = "keyring-storage")]
impl KeyringTokenStore {
    pub fn new(fallback: FileTokenStore) -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
            fallback,
        }
    }

    fn entry(&self) -> Result<Entry, ApiError> {
        tracing::trace!(
            "Creating keyring entry for service='{}', user='{}'",
            self.service,
            self.user
        );
        Entry::new(&self.service, &self.user)
            .map_err(|e| storage_error("Failed to create keyring entry", e))
    }
}

#[cfg(feature = "keyring-storage")]
impl TokenStore for KeyringTokenStore {
    fn save(&self, session: &Session) -> Result<(), ApiError> {
        let entry = match self.entry() {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("{}, using file storage", e);
                return self.fallback.save(session);
            }
        };

        let json = serde_json::to_string(session)
            .map_err(|e| storage_error("Failed to serialize session", e))?;

        if let Err(e) = entry.set_password(&json) {
            tracing::warn!("Failed to save session to keyring: {}, using file storage", e);
            // A stale keyring entry would shadow the file on the next load
            let _ = entry.delete_credential();
            return self.fallback.save(session);
        }

        // Also save to file as backup
        if let Err(e) = self.fallback.save(session) {
            tracing::debug!("Failed to save backup session to file: {}", e);
        }

        Ok(())
    }

    fn load(&self) -> Option<Session> {
        let entry = match self.entry() {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("{}, trying file fallback", e);
                return self.fallback.load();
            }
        };

        match entry.get_password() {
            Ok(json) => match serde_json::from_str::<Session>(&json) {
                Ok(session) => {
                    tracing::debug!("Session loaded from keyring");
                    Some(session)
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable session in keyring: {}", e);
                    None
                }
            },
            Err(keyring::Error::NoEntry) => {
                tracing::debug!("No session in keyring, trying file fallback");
                self.fallback.load()
            }
            Err(e) => {
                tracing::warn!("Failed to load session from keyring: {}, trying file fallback", e);
                self.fallback.load()
            }
        }
    }

    fn clear(&self) -> Result<(), ApiError> {
        // Always delete from file as well
        self.fallback.clear()?;

        // File is gone; a keyring that cannot be reached here is not read on load either
        let entry = match self.entry() {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("{}, session cleared from file only", e);
                return Ok(());
            }
        };
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => {
                tracing::warn!("Failed to delete session from keyring: {}", e);
                Ok(())
            }
        }
    }
}

// ============================================================================
// In-process storage
// ============================================================================

/// Non-persistent store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, session: &Session) -> Result<(), ApiError> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Option<Session> {
        self.slot().clone()
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.slot() = None;
        Ok(())
    }
}

// ============================================================================
// Public API
// ============================================================================

/// The store selected by the enabled cargo features.
pub fn default_token_store() -> Result<Arc<dyn TokenStore>, ApiError> {
    let file = FileTokenStore::default_location()?;

    #[cfg(feature = "keyring-storage")]
    let store: Arc<dyn TokenStore> = Arc::new(KeyringTokenStore::new(file));

    #[cfg(not(feature = "keyring-storage"))]
    let store: Arc<dyn TokenStore> = Arc::new(file);

    Ok(store)
}

/// Get information about session storage location (for documentation/debugging)
pub fn get_storage_info() -> String {
    #[cfg(all(feature = "keyring-storage", target_os = "windows"))]
    {
        "Windows Credential Manager (with file fallback)".to_string()
    }
    #[cfg(all(feature = "keyring-storage", target_os = "macos"))]
    {
        "macOS Keychain (with file fallback)".to_string()
    }
    #[cfg(all(
        feature = "keyring-storage",
        not(any(target_os = "windows", target_os = "macos"))
    ))]
    {
        "Secret Service (GNOME Keyring/KWallet, with file fallback)".to_string()
    }
    #[cfg(not(feature = "keyring-storage"))]
    {
        let path = FileTokenStore::default_location()
            .map(|s| s.path().display().to_string())
            .unwrap_or_else(|_| "~/.config/checklist/.session".to_string());
        format!("File-based storage: {}", path)
    }
}
