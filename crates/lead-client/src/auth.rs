//! Authentication context and credential persistence.
//!
//! The credential lives in exactly one slot, under the key `authToken`.
//! It is written at login, read before every authenticated call and removed
//! at logout or when the server rejects it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lead_model::Credential;

use crate::error::ApiError;

/// Key of the credential slot.
pub const CREDENTIAL_KEY: &str = "authToken";

/// Errors reading or writing the credential slot.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CredentialError {
    /// I/O failure on the credential file.
    #[error("failed to {operation} credential file {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential file is not valid TOML.
    #[error("invalid credential file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize credential: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl CredentialError {
    /// Returns a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Io { .. } => "Não foi possível acessar o arquivo de sessão.",
            Self::Parse { .. } => "O arquivo de sessão está corrompido.",
            Self::Serialize(_) => "Não foi possível salvar a sessão.",
        }
    }
}

/// Durable storage for the single credential slot.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, CredentialError>;

    fn save(&self, credential: &Credential) -> Result<(), CredentialError>;

    /// Remove the credential. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Process-local credential slot.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// On-disk layout of the credential file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<Credential>,
}

/// Credential slot stored as a small TOML file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory.
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    /// Get the default credential file path.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "LeadDesk", "lead-desk")
            .map(|dirs| dirs.config_dir().join("credentials.toml"))
            .unwrap_or_else(|| PathBuf::from("credentials.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, operation: &'static str, source: std::io::Error) -> CredentialError {
        CredentialError::Io {
            operation,
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, CredentialError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error("read", e)),
        };
        let file: CredentialFile =
            toml::from_str(&content).map_err(|source| CredentialError::Parse {
                path: self.path.clone(),
                source,
            })?;
        // A blank token in the file counts as signed out.
        Ok(file
            .auth_token
            .filter(|credential| !credential.as_str().trim().is_empty()))
    }

    fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }

        let content = toml::to_string(&CredentialFile {
            auth_token: Some(credential.clone()),
        })?;

        // Write to a sibling file and rename so a crash never leaves half a token.
        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, content).map_err(|e| self.io_error("write", e))?;
        restrict_permissions(&temp_path).map_err(|e| self.io_error("protect", e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error("replace", e))?;

        tracing::debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "credential removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Shared handle on the credential store.
///
/// Store failures on read are logged and treated as "signed out" so a
/// corrupt file never blocks the login page.
#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn CredentialStore>,
}

impl AuthContext {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Context backed by a fresh in-memory slot.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    /// Current credential, if signed in.
    pub fn credential(&self) -> Option<Credential> {
        match self.store.load() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read credential; treating as signed out");
                None
            }
        }
    }

    /// Current credential, or [`ApiError::Unauthorized`] when signed out.
    pub fn require(&self) -> Result<Credential, ApiError> {
        self.credential().ok_or(ApiError::Unauthorized)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    pub fn sign_in(&self, credential: &Credential) -> Result<(), CredentialError> {
        self.store.save(credential)
    }

    pub fn sign_out(&self) -> Result<(), CredentialError> {
        self.store.clear()
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
