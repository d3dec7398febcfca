//! # Client configuration — `tourbook.toml`
//!
//! Everything the client needs to know about its environment: where the REST
//! API lives, which storage keys hold the session, and which route prefixes
//! require which roles.
//!
//! ## Structure
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api"
//!
//! [session]
//! identity_key = "tourbook.session"
//! active_role_key = "tourbook.active_role"
//! active_role_cookie_days = 7
//!
//! [routes]
//! login = "/login"
//! role_selection = "/select-role"
//!
//! [[routes.rules]]
//! prefix = "/admin"
//! roles = ["Admin"]
//! ```
//!
//! Every section has production defaults, so an empty file is a valid
//! configuration. When `[[routes.rules]]` is omitted the default dashboard rules
//! apply; when present it replaces them entirely.
//!
//! ## Environment overrides
//!
//! [`AppConfig::load`] applies `API_BASE_URL` on top of the defaults. Native
//! builds read it from the process environment (with `.env` support through
//! `dotenvy`); wasm builds have no environment, so the value is baked in at
//! compile time with `option_env!`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gate::prefix_matches;

use crate::models::Role;

/// Environment variable overriding [`ApiSection::base_url`].
pub const BASE_URL_ENV: &str = "API_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid API base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("invalid route rule {prefix:?}: {reason}")]
    Rule { prefix: String, reason: String },
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Remote API settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    /// Absolute base URL every relative call path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Where the session identity and active role are persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_identity_key")]
    pub identity_key: String,
    /// Used both as the storage key and as the mirror cookie name.
    #[serde(default = "default_active_role_key")]
    pub active_role_key: String,
    /// Lifetime of the active-role cookie mirror. 0 makes it a session cookie.
    #[serde(default = "default_cookie_days")]
    pub active_role_cookie_days: u32,
    /// Mark the mirror cookie `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_identity_key() -> String {
    "tourbook.session".to_string()
}

fn default_active_role_key() -> String {
    "tourbook.active_role".to_string()
}

fn default_cookie_days() -> u32 {
    7
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            identity_key: default_identity_key(),
            active_role_key: default_active_role_key(),
            active_role_cookie_days: default_cookie_days(),
            secure_cookies: false,
        }
    }
}

/// Route protection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_login_route")]
    pub login: String,
    #[serde(default = "default_role_selection_route")]
    pub role_selection: String,
    #[serde(default = "default_rules")]
    pub rules: Vec<RouteRule>,
}

/// A protected path prefix and the roles allowed to enter it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRule {
    pub prefix: String,
    pub roles: Vec<Role>,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            prefix: prefix.into(),
            roles: roles.into_iter().collect(),
        }
    }
}

fn default_login_route() -> String {
    "/login".to_string()
}

fn default_role_selection_route() -> String {
    "/select-role".to_string()
}

fn default_rules() -> Vec<RouteRule> {
    vec![
        RouteRule::new("/admin", [Role::admin()]),
        RouteRule::new("/moderator", [Role::moderator(), Role::admin()]),
        RouteRule::new("/tour-guide", [Role::tour_guide()]),
        RouteRule::new("/craft-village", [Role::craft_village_owner()]),
    ]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: default_login_route(),
            role_selection: default_role_selection_route(),
            rules: default_rules(),
        }
    }
}

impl AppConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "tourbook.toml"
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Defaults plus environment overrides, validated.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `API_BASE_URL` when it is set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = base_url_from_env() {
            tracing::debug!("Using {} from environment: {}", BASE_URL_ENV, url);
            self.api.base_url = url;
        }
        self
    }

    /// Builder method to set the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.base_url;
        let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::BaseUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::BaseUrl {
                url: url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        for rule in &self.routes.rules {
            if !rule.prefix.starts_with('/') {
                return Err(ConfigError::Rule {
                    prefix: rule.prefix.clone(),
                    reason: "prefix must start with '/'".to_string(),
                });
            }
            if rule.roles.is_empty() {
                return Err(ConfigError::Rule {
                    prefix: rule.prefix.clone(),
                    reason: "rule must allow at least one role".to_string(),
                });
            }
            // A guarded login page would redirect to itself forever
            let open_routes = [&self.routes.login, &self.routes.role_selection];
            if open_routes
                .iter()
                .any(|route| prefix_matches(&rule.prefix, route))
            {
                return Err(ConfigError::Rule {
                    prefix: rule.prefix.clone(),
                    reason: "rule must not cover the login or role selection route".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn base_url_from_env() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(BASE_URL_ENV).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn base_url_from_env() -> Option<String> {
    option_env!("API_BASE_URL")
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.session.identity_key, "tourbook.session");
        assert_eq!(config.session.active_role_key, "tourbook.active_role");
        assert_eq!(config.session.active_role_cookie_days, 7);
        assert_eq!(config.routes.login, "/login");
        assert_eq!(config.routes.rules.len(), 4);
    }

    #[test]
    fn test_parse_full_file() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            base_url = "https://api.tourbook.example/v1"

            [session]
            active_role_cookie_days = 1
            secure_cookies = true

            [routes]
            role_selection = "/choose"

            [[routes.rules]]
            prefix = "/admin"
            roles = ["Admin", "Moderator"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.tourbook.example/v1");
        assert_eq!(config.session.active_role_cookie_days, 1);
        assert!(config.session.secure_cookies);
        assert_eq!(config.session.identity_key, "tourbook.session");
        assert_eq!(config.routes.role_selection, "/choose");
        assert_eq!(config.routes.login, "/login");
        assert_eq!(
            config.routes.rules,
            vec![RouteRule::new("/admin", [Role::admin(), Role::moderator()])]
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let err = AppConfig::from_toml("[api]\nbase_url = \"api/v1\"").unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));

        let err = AppConfig::from_toml("[api]\nbase_url = \"ftp://files.example\"").unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));
    }

    #[test]
    fn test_rejects_bad_rules() {
        let err = AppConfig::from_toml(
            "[[routes.rules]]\nprefix = \"admin\"\nroles = [\"Admin\"]",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Rule { .. }));

        let err =
            AppConfig::from_toml("[[routes.rules]]\nprefix = \"/admin\"\nroles = []").unwrap_err();
        assert!(matches!(err, ConfigError::Rule { .. }));
    }

    #[test]
    fn test_rejects_rules_over_open_routes() {
        for prefix in ["/", "/login", "/select-role/"] {
            let text = format!("[[routes.rules]]\nprefix = \"{prefix}\"\nroles = [\"Admin\"]");
            let err = AppConfig::from_toml(&text).unwrap_err();
            assert!(
                matches!(&err, ConfigError::Rule { prefix: p, .. } if p == prefix),
                "{prefix} should be rejected, got {err:?}"
            );
        }

        // Custom open routes are checked, not the defaults
        let config = AppConfig::from_toml(
            "[routes]\nlogin = \"/auth/sign-in\"\n\n[[routes.rules]]\nprefix = \"/login-history\"\nroles = [\"Admin\"]",
        )
        .unwrap();
        assert_eq!(config.routes.rules[0].prefix, "/login-history");

        let err = AppConfig::from_toml(
            "[routes]\nlogin = \"/auth/sign-in\"\n\n[[routes.rules]]\nprefix = \"/auth\"\nroles = [\"Admin\"]",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Rule { .. }));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default().with_base_url("https://example.org/api");
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), config);
    }
}
