//! # Session identity — who is using this client
//!
//! [`SessionIdentity`] is the record persisted in client storage after a
//! successful login. It is the client-side mirror of the account the API
//! authenticated: profile fields for display, the bearer token attached to
//! every call, and the list of roles that decides which dashboards are
//! reachable.
//!
//! [`Profile`] is the subset the API returns from a profile refresh. Applying
//! a profile never touches `roles` or `token`; those change only on a fresh
//! login.

use serde::{Deserialize, Serialize};

use super::Role;

/// Persisted record of the authenticated visitor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Auth provider tag, e.g. `"local"` or `"google"`.
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Profile fields returned by the API's "current user" endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

impl SessionIdentity {
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Get display name, falling back to email, then to "Guest".
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Guest")
    }

    /// Overwrite the profile fields, keeping roles and token.
    pub fn apply_profile(&mut self, profile: Profile) {
        self.id = profile.id;
        self.email = profile.email;
        self.name = profile.name;
        self.avatar_url = profile.avatar_url;
        self.provider = profile.provider;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let mut identity = SessionIdentity {
            email: Some("lan@example.com".to_string()),
            name: Some("Lan".to_string()),
            ..Default::default()
        };
        assert_eq!(identity.display_name(), "Lan");

        identity.name = Some("  ".to_string());
        assert_eq!(identity.display_name(), "lan@example.com");

        identity.email = None;
        assert_eq!(identity.display_name(), "Guest");
    }

    #[test]
    fn test_apply_profile_keeps_roles_and_token() {
        let mut identity = SessionIdentity {
            id: Some("u-1".to_string()),
            token: Some("secret".to_string()),
            roles: vec![Role::tour_guide()],
            ..Default::default()
        };
        identity.apply_profile(Profile {
            id: Some("u-1".to_string()),
            name: Some("Minh".to_string()),
            avatar_url: Some("https://cdn.example/minh.png".to_string()),
            ..Default::default()
        });

        assert_eq!(identity.name.as_deref(), Some("Minh"));
        assert_eq!(identity.token.as_deref(), Some("secret"));
        assert_eq!(identity.roles, vec![Role::tour_guide()]);
    }

    #[test]
    fn test_decodes_api_shape() {
        let identity: SessionIdentity = serde_json::from_str(
            r#"{"id":"42","email":"a@b.c","avatarUrl":null,"roles":["Admin","TourGuide"],"token":"t"}"#,
        )
        .unwrap();
        assert!(identity.has_role(&Role::admin()));
        assert!(identity.has_role(&Role::tour_guide()));
        assert!(!identity.has_role(&Role::user()));
        assert_eq!(identity.name, None);
    }
}
