use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::constants::{ENV_TOKEN, KEYRING_SERVICE};

/// Stores the service auth token, one per backend URL.
///
/// Lookup order: `MAILCHAT_TOKEN`, OS keyring, then a private file in the
/// config directory.
pub struct TokenStore {
    key: String,
    token_file: PathBuf,
}

impl TokenStore {
    pub fn new(backend_url: &str) -> Self {
        let dir = crate::config::Config::config_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(backend_url, &dir)
    }

    /// Store whose token file lives in `dir`
    fn in_dir(backend_url: &str, dir: &Path) -> Self {
        let safe_url = backend_url.replace(['@', '.', '/', '\\', ':', '?', '&', '='], "_");
        let token_file = dir.join(format!(".token_{}", safe_url));

        Self {
            key: format!("token:{}", backend_url),
            token_file,
        }
    }

    fn env_token() -> Option<String> {
        env::var(ENV_TOKEN).ok().filter(|t| !t.trim().is_empty())
    }

    fn keyring_entry(&self) -> Option<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &self.key).ok()
    }

    fn keyring_get(&self) -> Option<String> {
        self.keyring_entry()?.get_password().ok()
    }

    fn keyring_set(&self, token: &str) -> bool {
        self.keyring_entry()
            .is_some_and(|entry| entry.set_password(token).is_ok())
    }

    fn file_get(&self) -> Option<String> {
        fs::read_to_string(&self.token_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Write the token file with owner-only permissions
    fn file_set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.token_file.parent() {
            fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.token_file)?;
            file.write_all(token.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.token_file, token)?;
        }

        Ok(())
    }

    pub fn get_token(&self) -> Result<String> {
        if let Some(token) = Self::env_token() {
            return Ok(token);
        }
        if let Some(token) = self.keyring_get() {
            return Ok(token);
        }
        if let Some(token) = self.file_get() {
            return Ok(token);
        }

        anyhow::bail!(
            "No auth token found. Set {} or run 'mailchat setup'.",
            ENV_TOKEN
        )
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("Refusing to store an empty token");
        }

        if self.keyring_set(token) && self.keyring_get().as_deref() == Some(token) {
            tracing::debug!("Stored token in keyring");
            return Ok(());
        }

        tracing::info!("Keyring unavailable, storing token in {}", self.token_file.display());
        self.file_set(token)
    }

    /// Forget the stored token in every backend (the env var is left alone)
    pub fn delete_token(&self) -> Result<()> {
        if let Some(entry) = self.keyring_entry() {
            let _ = entry.delete_credential();
        }
        match fs::remove_file(&self.token_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
