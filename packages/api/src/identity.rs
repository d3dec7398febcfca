//! # Identity store — persisted session and active role
//!
//! [`IdentityStore`] owns the two pieces of client state that decide what a
//! visitor may see:
//!
//! | State | Storage | Lifetime |
//! |-------|---------|----------|
//! | [`SessionIdentity`] | JSON under `session.identity_key` | login → logout |
//! | Active role | plain string under `session.active_role_key` | role picker → logout |
//! | Active role mirror | cookie named `session.active_role_key` | `active_role_cookie_days` |
//!
//! The store is constructed with its backends injected; there is no global
//! instance. The UI builds one at its composition root and hands it down.
//!
//! ## Active role invariants
//!
//! - The active role is always one of the current identity's roles. A stored
//!   value that no longer qualifies is removed the first time it is read
//!   ([`IdentityStore::get_active_role`] heals as a side effect).
//! - [`IdentityStore::set_active_role`] refuses roles the identity does not
//!   hold and leaves the previous value untouched.
//!
//! ## Key/value store vs. cookie
//!
//! The key/value entry is the source of truth. The cookie is a derived,
//! expiring cache that exists only so requests carry the role. Every successful
//! read re-derives the cookie, so a cookie that expired or was edited by hand
//! comes back in line on the next read; the cookie is never read back into
//! the key/value store.

use std::time::Duration;

use store::{CookieOptions, CookieStore, KeyValueStore, KeyValueStoreExt};

use crate::config::SessionConfig;
use crate::models::{Profile, Role, SessionIdentity};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Persisted identity and role selection.
#[derive(Clone, Debug)]
pub struct IdentityStore<S: KeyValueStore, C: CookieStore> {
    storage: S,
    cookies: C,
    config: SessionConfig,
}

impl<S: KeyValueStore, C: CookieStore> IdentityStore<S, C> {
    pub fn new(storage: S, cookies: C, config: SessionConfig) -> Self {
        Self {
            storage,
            cookies,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The stored identity, if any.
    ///
    /// A value that no longer decodes (older client version, manual edit) is
    /// removed and treated as logged out.
    pub fn current(&self) -> Option<SessionIdentity> {
        match self.storage.get_json::<SessionIdentity>(&self.config.identity_key) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("Discarding unreadable session identity: {}", e);
                self.storage.remove(&self.config.identity_key);
                None
            }
        }
    }

    /// Persist a freshly logged-in identity.
    ///
    /// Any active role the new identity does not hold is cleared.
    pub fn login(&self, identity: &SessionIdentity) {
        if let Err(e) = self.storage.set_json(&self.config.identity_key, identity) {
            tracing::error!("Failed to persist session identity: {}", e);
            return;
        }
        tracing::info!("Signed in as {}", identity.display_name());
        self.heal_active_role();
    }

    /// Overwrite the profile fields of the current identity.
    ///
    /// Roles and token are kept. Returns `false` when nobody is logged in.
    pub fn refresh_profile(&self, profile: Profile) -> bool {
        let Some(mut identity) = self.current() else {
            return false;
        };
        identity.apply_profile(profile);
        match self.storage.set_json(&self.config.identity_key, &identity) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to persist refreshed profile: {}", e);
                false
            }
        }
    }

    /// Forget the identity, the active role and its cookie.
    pub fn logout(&self) {
        self.storage.remove(&self.config.identity_key);
        self.clear_active_role();
        tracing::info!("Signed out");
    }

    /// True iff a Session Identity is present in storage.
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// True iff `role` is one of the stored identity's roles.
    pub fn has_role(&self, role: &Role) -> bool {
        self.current().is_some_and(|identity| identity.has_role(role))
    }

    /// The persisted active role, if it is still valid for the current identity.
    ///
    /// A stale value is removed (together with its cookie) and `None` is
    /// returned. Calling this again after healing also returns `None`.
    pub fn get_active_role(&self) -> Option<Role> {
        self.heal_active_role()
    }

    /// Select the dashboard role. Returns `false` (and changes nothing) when
    /// the current identity does not hold `role`.
    pub fn set_active_role(&self, role: &Role) -> bool {
        if !self.has_role(role) {
            tracing::warn!("Refusing to activate role {} not granted to this session", role);
            return false;
        }
        self.storage.set(&self.config.active_role_key, role.as_str());
        self.write_cookie(role);
        true
    }

    /// The role the visitor is acting as: the active role, or the only role of
    /// a single-role identity.
    pub fn effective_role(&self) -> Option<Role> {
        if let Some(role) = self.get_active_role() {
            return Some(role);
        }
        let identity = self.current()?;
        match identity.roles.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        }
    }

    /// True when the identity holds several roles and none is selected yet.
    pub fn needs_role_selection(&self) -> bool {
        self.current().is_some_and(|identity| identity.roles.len() > 1)
            && self.get_active_role().is_none()
    }

    /// Drop a stored active role the identity no longer holds, and re-write the
    /// cookie when it has drifted from the stored value. Returns the surviving
    /// role.
    fn heal_active_role(&self) -> Option<Role> {
        let stored = self.storage.get(&self.config.active_role_key)?;
        let role = Role::new(stored);
        if !self.has_role(&role) {
            tracing::debug!("Clearing stale active role {}", role);
            self.clear_active_role();
            return None;
        }
        if self.cookies.get_cookie(&self.config.active_role_key).as_deref() != Some(role.as_str()) {
            self.write_cookie(&role);
        }
        Some(role)
    }

    fn clear_active_role(&self) {
        self.storage.remove(&self.config.active_role_key);
        self.cookies.remove_cookie(&self.config.active_role_key);
    }

    fn write_cookie(&self, role: &Role) {
        let mut options = CookieOptions::default().with_secure(self.config.secure_cookies);
        if self.config.active_role_cookie_days > 0 {
            options = options.with_max_age(Duration::from_secs(
                u64::from(self.config.active_role_cookie_days) * SECS_PER_DAY,
            ));
        }
        self.cookies
            .set_cookie(&self.config.active_role_key, role.as_str(), &options);
    }
}
