//! Admin mode gate.
//!
//! NOT A SECURITY BOUNDARY. The password is compared in the client against a
//! value the client itself stores, so anyone controlling the client can flip
//! admin mode on. It only hides editing controls. Catalog writes are
//! authorized by the server (`menu.write_token`), never by this flag.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{LocalStorage, StorageError, ADMIN_FLAG_KEY, ADMIN_PASSWORD_KEY, API_URL_KEY};

/// Password used until one is set in the settings panel.
pub const DEFAULT_ADMIN_PASSWORD: &str = "ementa123";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("password confirmation does not match")]
    Mismatch,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct AdminSession {
    is_admin: bool,
    /// Text currently in the login form's password field.
    pub password_input: String,
    /// Set after a failed login; cleared on the next attempt.
    pub error: Option<String>,
    storage: Arc<dyn LocalStorage>,
}

impl AdminSession {
    /// Restore the admin flag persisted by a previous session.
    pub fn restore(storage: Arc<dyn LocalStorage>) -> Self {
        let is_admin = storage.get_item(ADMIN_FLAG_KEY).as_deref() == Some("true");
        Self {
            is_admin,
            password_input: String::new(),
            error: None,
            storage,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    fn expected_password(&self) -> String {
        self.storage
            .get_item(ADMIN_PASSWORD_KEY)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string())
    }

    /// Submit the login form. Plain equality against the stored password.
    ///
    /// On mismatch the error is set and the typed password cleared.
    pub fn login(&mut self) -> bool {
        let entered = std::mem::take(&mut self.password_input);
        if entered == self.expected_password() {
            self.is_admin = true;
            self.error = None;
            self.persist_flag();
            info!("admin mode enabled");
            true
        } else {
            self.error = Some("wrong password".to_string());
            false
        }
    }

    pub fn logout(&mut self) {
        self.is_admin = false;
        self.error = None;
        self.persist_flag();
    }

    /// Catalog source override, if one is stored.
    pub fn api_url(&self) -> Option<String> {
        self.storage.get_item(API_URL_KEY).filter(|u| !u.trim().is_empty())
    }

    /// Apply the settings panel.
    ///
    /// The catalog URL is always stored (empty clears it). A non-empty new
    /// password must equal its confirmation; on mismatch the stored password
    /// is left as it was.
    pub fn update_settings(
        &mut self,
        new_password: &str,
        confirm_password: &str,
        api_url: &str,
    ) -> Result<(), SettingsError> {
        let api_url = api_url.trim();
        if api_url.is_empty() {
            self.storage.remove_item(API_URL_KEY)?;
        } else {
            self.storage.set_item(API_URL_KEY, api_url)?;
        }

        if new_password.is_empty() {
            return Ok(());
        }
        if new_password != confirm_password {
            return Err(SettingsError::Mismatch);
        }
        self.storage.set_item(ADMIN_PASSWORD_KEY, new_password)?;
        info!("admin password changed");
        Ok(())
    }

    fn persist_flag(&self) {
        let value = if self.is_admin { "true" } else { "false" };
        if let Err(e) = self.storage.set_item(ADMIN_FLAG_KEY, value) {
            warn!(error = %e, "admin flag not saved");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session() -> (Arc<MemoryStorage>, AdminSession) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), AdminSession::restore(storage))
    }

    #[test]
    fn correct_password_enables_admin_across_reload() {
        let (storage, mut s) = session();
        assert!(!s.is_admin());
        s.password_input = DEFAULT_ADMIN_PASSWORD.into();
        assert!(s.login());
        assert!(s.is_admin());
        assert_eq!(storage.get_item(ADMIN_FLAG_KEY).as_deref(), Some("true"));

        let reloaded = AdminSession::restore(storage);
        assert!(reloaded.is_admin());
    }

    #[test]
    fn wrong_password_sets_error_and_clears_input() {
        let (storage, mut s) = session();
        s.password_input = "guess".into();
        assert!(!s.login());
        assert!(!s.is_admin());
        assert!(s.error.is_some());
        assert!(s.password_input.is_empty());
        assert!(storage.get_item(ADMIN_FLAG_KEY).is_none());
    }

    #[test]
    fn logout_persists_false() {
        let (storage, mut s) = session();
        s.password_input = DEFAULT_ADMIN_PASSWORD.into();
        s.login();
        s.logout();
        assert!(!s.is_admin());
        assert_eq!(storage.get_item(ADMIN_FLAG_KEY).as_deref(), Some("false"));
        assert!(!AdminSession::restore(storage).is_admin());
    }

    #[test]
    fn changed_password_replaces_default() {
        let (_, mut s) = session();
        s.update_settings("n3w", "n3w", "").unwrap();

        s.password_input = DEFAULT_ADMIN_PASSWORD.into();
        assert!(!s.login());
        s.password_input = "n3w".into();
        assert!(s.login());
    }

    #[test]
    fn mismatch_leaves_password_unchanged_but_saves_url() {
        let (storage, mut s) = session();
        let err = s.update_settings("a", "b", "https://menu.example.com").unwrap_err();
        assert!(matches!(err, SettingsError::Mismatch));
        assert!(storage.get_item(ADMIN_PASSWORD_KEY).is_none());
        assert_eq!(s.api_url().as_deref(), Some("https://menu.example.com"));
    }

    #[test]
    fn empty_url_clears_override() {
        let (_, mut s) = session();
        s.update_settings("", "", "https://a").unwrap();
        s.update_settings("", "", "  ").unwrap();
        assert!(s.api_url().is_none());
    }
}
