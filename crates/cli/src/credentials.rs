//! Access-token storage in the OS keyring.

use anyhow::{Context, Result};
use keyring::Entry;
use kyb_review::{Credentials, KybError};
use tracing::{debug, info};

const KEYRING_USER: &str = "user";

pub struct TokenStore {
    service: String,
}

impl TokenStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, KEYRING_USER)
            .with_context(|| format!("Failed to open keyring entry for '{}'", self.service))
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        self.entry()?
            .set_password(credentials.token())
            .context("Failed to store access token in the keyring")?;
        info!("Access token stored under keyring service '{}'.", self.service);
        Ok(())
    }

    /// Removes the stored token. Returns `false` if there was none.
    pub fn clear(&self) -> Result<bool> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e).context("Failed to remove access token from the keyring"),
        }
    }

    /// Resolves the credentials for an authenticated command.
    ///
    /// An explicit token (from `--token` or `KYB_TOKEN`) takes precedence over
    /// the keyring.
    pub fn load(&self, explicit_token: Option<&str>) -> Result<Credentials> {
        if let Some(token) = explicit_token.filter(|t| !t.is_empty()) {
            debug!("Using access token supplied on the command line.");
            return Ok(Credentials::new(token));
        }
        let token = self
            .entry()?
            .get_password()
            .map_err(|_| KybError::NotAuthenticated)?;
        Ok(Credentials::new(token))
    }
}
