//! # Role gate — may this visitor open this route?
//!
//! [`RouteGuard`] maps path prefixes to the roles allowed behind them and turns
//! a navigation attempt into an [`Access`] decision. Authorization failures are
//! values, not errors: the caller receives `Redirect(target)` or
//! `Unauthorized` and decides how to act on it.
//!
//! ## Decision table
//!
//! | Situation | Decision |
//! |-----------|----------|
//! | No rule matches the path | `Authorized` (public page) |
//! | Nobody is logged in | `Redirect(login)` |
//! | Effective role is allowed | `Authorized` |
//! | Identity holds an allowed role, but is acting as another (or none) | `Redirect(role_selection)` |
//! | Identity holds no allowed role | `Unauthorized` |
//!
//! Prefixes match whole path segments (`/admin` covers `/admin/tours`, not
//! `/administrator`); the longest matching prefix wins.
//!
//! ## Guard state machine
//!
//! A UI guard walks [`GuardState`]: `Unknown → Checking → Authorized |
//! Redirecting | Denied`. Only `Authorized` may render protected children, so
//! nothing protected is ever shown while the decision is pending.

use store::{parse_cookie_header, CookieStore, KeyValueStore};

use crate::config::{RouteRule, RoutesConfig};
use crate::identity::IdentityStore;
use crate::models::Role;

/// Outcome of a navigation check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Authorized,
    /// Logged in, but no role grants this route.
    Unauthorized,
    Redirect(String),
}

/// Route protection rules.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteGuard {
    rules: Vec<RouteRule>,
    login: String,
    role_selection: String,
}

impl RouteGuard {
    pub fn new(config: &RoutesConfig) -> Self {
        let mut rules = config.rules.clone();
        // Longest prefix first so the first match is the most specific one.
        rules.sort_by(|a, b| normalize(&b.prefix).len().cmp(&normalize(&a.prefix).len()));
        Self {
            rules,
            login: config.login.clone(),
            role_selection: config.role_selection.clone(),
        }
    }

    pub fn login_route(&self) -> &str {
        &self.login
    }

    pub fn role_selection_route(&self) -> &str {
        &self.role_selection
    }

    /// The rule protecting `path`, if any.
    pub fn rule_for(&self, path: &str) -> Option<&RouteRule> {
        let path = strip_query(path);
        self.rules
            .iter()
            .find(|rule| prefix_matches(&rule.prefix, path))
    }

    /// Roles allowed on `path`; `None` for public paths.
    pub fn required_roles(&self, path: &str) -> Option<&[Role]> {
        self.rule_for(path).map(|rule| rule.roles.as_slice())
    }

    /// Decide whether the visitor described by `identity` may open `path`.
    pub fn decide<S, C>(&self, path: &str, identity: &IdentityStore<S, C>) -> Access
    where
        S: KeyValueStore,
        C: CookieStore,
    {
        let Some(rule) = self.rule_for(path) else {
            return Access::Authorized;
        };
        let Some(session) = identity.current() else {
            return Access::Redirect(self.login.clone());
        };

        if let Some(role) = identity.effective_role() {
            if rule.roles.contains(&role) {
                return Access::Authorized;
            }
        }
        if rule.roles.iter().any(|role| session.has_role(role)) {
            Access::Redirect(self.role_selection.clone())
        } else {
            Access::Unauthorized
        }
    }

    /// Where a visitor acting as `role` lands after picking it.
    pub fn home_for(&self, role: &Role) -> Option<&str> {
        self.rules
            .iter()
            .filter(|rule| rule.roles.first() == Some(role))
            .map(|rule| rule.prefix.as_str())
            .min_by_key(|prefix| prefix.len())
    }
}

/// Progress of a UI guard protecting some content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    #[default]
    Unknown,
    Checking,
    Authorized,
    Redirecting(String),
    Denied,
}

impl GuardState {
    /// Start checking. Only `Unknown` moves; a settled guard stays settled.
    pub fn begin(&mut self) {
        if *self == GuardState::Unknown {
            *self = GuardState::Checking;
        }
    }

    /// Settle a pending check with a decision.
    pub fn resolve(&mut self, access: Access) {
        if *self != GuardState::Checking {
            return;
        }
        *self = match access {
            Access::Authorized => GuardState::Authorized,
            Access::Redirect(target) => GuardState::Redirecting(target),
            Access::Unauthorized => GuardState::Denied,
        };
    }

    /// Return to `Unknown`, e.g. when the route or session changes.
    pub fn reset(&mut self) {
        *self = GuardState::Unknown;
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, GuardState::Unknown | GuardState::Checking)
    }

    /// Children may render only in this state.
    pub fn may_render(&self) -> bool {
        *self == GuardState::Authorized
    }
}

/// Read the mirrored active role from a `Cookie:` request header.
pub fn active_role_from_cookie_header(header: &str, cookie_name: &str) -> Option<Role> {
    parse_cookie_header(header)
        .remove(cookie_name)
        .filter(|value| !value.is_empty())
        .map(Role::new)
}

fn normalize(prefix: &str) -> &str {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Whether `prefix` covers `path` on a segment boundary.
pub(crate) fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = normalize(prefix);
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use store::{MemoryCookies, MemoryStore};

    use super::*;
    use crate::config::SessionConfig;
    use crate::models::SessionIdentity;

    fn guard() -> RouteGuard {
        RouteGuard::new(&RoutesConfig::default())
    }

    fn identity(roles: &[&str]) -> IdentityStore<MemoryStore, MemoryCookies> {
        let ids = IdentityStore::new(
            MemoryStore::new(),
            MemoryCookies::new(),
            SessionConfig::default(),
        );
        if !roles.is_empty() {
            ids.login(&SessionIdentity {
                email: Some("visitor@example.com".to_string()),
                roles: roles.iter().map(|r| Role::from(*r)).collect(),
                ..Default::default()
            });
        }
        ids
    }

    #[test]
    fn test_prefix_matching() {
        assert!(prefix_matches("/admin", "/admin"));
        assert!(prefix_matches("/admin", "/admin/tours/3"));
        assert!(prefix_matches("/admin/", "/admin/tours"));
        assert!(!prefix_matches("/admin", "/administrator"));
        assert!(!prefix_matches("/admin", "/"));
        assert!(prefix_matches("/", "/anything"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let config = RoutesConfig {
            rules: vec![
                RouteRule::new("/admin", [Role::admin()]),
                RouteRule::new("/admin/news", [Role::moderator()]),
            ],
            ..RoutesConfig::default()
        };
        let guard = RouteGuard::new(&config);
        assert_eq!(
            guard.required_roles("/admin/news/4"),
            Some(&[Role::moderator()][..])
        );
        assert_eq!(guard.required_roles("/admin/users"), Some(&[Role::admin()][..]));
        assert_eq!(guard.required_roles("/tours?city=hue"), None);
        assert_eq!(
            guard.required_roles("/admin?tab=stats"),
            Some(&[Role::admin()][..])
        );
    }

    #[test]
    fn test_public_route_is_authorized_for_everyone() {
        assert_eq!(guard().decide("/tours/12", &identity(&[])), Access::Authorized);
        assert_eq!(guard().decide("/", &identity(&["User"])), Access::Authorized);
    }

    #[test]
    fn test_anonymous_visitor_is_sent_to_login() {
        assert_eq!(
            guard().decide("/admin", &identity(&[])),
            Access::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_single_role_user_needs_no_selection() {
        assert_eq!(
            guard().decide("/tour-guide/schedule", &identity(&["TourGuide"])),
            Access::Authorized
        );
    }

    #[test]
    fn test_wrong_role_is_unauthorized() {
        assert_eq!(
            guard().decide("/admin/users", &identity(&["User"])),
            Access::Unauthorized
        );
    }

    #[test]
    fn test_multi_role_user_must_pick_matching_role() {
        let ids = identity(&["Admin", "TourGuide"]);
        let guard = guard();

        // Nothing picked yet
        assert_eq!(
            guard.decide("/admin", &ids),
            Access::Redirect("/select-role".to_string())
        );

        assert!(ids.set_active_role(&Role::tour_guide()));
        assert_eq!(guard.decide("/tour-guide", &ids), Access::Authorized);
        // Acting as a tour guide, the admin area asks to switch
        assert_eq!(
            guard.decide("/admin", &ids),
            Access::Redirect("/select-role".to_string())
        );

        assert!(ids.set_active_role(&Role::admin()));
        assert_eq!(guard.decide("/admin", &ids), Access::Authorized);
        // Moderator area also admits admins
        assert_eq!(guard.decide("/moderator/reviews", &ids), Access::Authorized);
        assert_eq!(guard.decide("/craft-village", &ids), Access::Unauthorized);
    }

    #[test]
    fn test_home_for_role() {
        let guard = guard();
        assert_eq!(guard.home_for(&Role::admin()), Some("/admin"));
        assert_eq!(guard.home_for(&Role::tour_guide()), Some("/tour-guide"));
        assert_eq!(guard.home_for(&Role::user()), None);
    }

    #[test]
    fn test_guard_state_machine() {
        let mut state = GuardState::default();
        assert!(!state.may_render());

        // Resolving before checking is ignored
        state.resolve(Access::Authorized);
        assert_eq!(state, GuardState::Unknown);

        state.begin();
        assert_eq!(state, GuardState::Checking);
        assert!(!state.is_settled());
        assert!(!state.may_render());

        state.resolve(Access::Redirect("/login".to_string()));
        assert_eq!(state, GuardState::Redirecting("/login".to_string()));
        assert!(state.is_settled());
        assert!(!state.may_render());

        // Settled states do not move without a reset
        state.begin();
        state.resolve(Access::Authorized);
        assert_eq!(state, GuardState::Redirecting("/login".to_string()));

        state.reset();
        state.begin();
        state.resolve(Access::Authorized);
        assert!(state.may_render());

        state.reset();
        state.begin();
        state.resolve(Access::Unauthorized);
        assert_eq!(state, GuardState::Denied);
    }

    #[test]
    fn test_active_role_from_cookie_header() {
        assert_eq!(
            active_role_from_cookie_header(
                "theme=dark; tourbook.active_role=TourGuide",
                "tourbook.active_role"
            ),
            Some(Role::tour_guide())
        );
        assert_eq!(
            active_role_from_cookie_header("tourbook.active_role=", "tourbook.active_role"),
            None
        );
        assert_eq!(active_role_from_cookie_header("", "tourbook.active_role"), None);
    }
}
