//! Session context and hooks for the UI.
//!
//! [`SessionProvider`] is the composition root: it builds the identity store,
//! route guard and HTTP transport once and hands them down through context.
//! Components read the reactive [`SessionState`] through [`use_session`] and
//! call [`refresh_session_state`] after anything that changes the stored
//! identity.

use std::rc::Rc;

use api::{AppConfig, HttpTransport, Role, RouteGuard, SessionIdentity};
use dioxus::prelude::*;

use crate::call::use_api;
use crate::notifications::Toasts;
use crate::platform::{make_identity_store, PlatformIdentity};

/// Long-lived services shared by every component.
#[derive(Clone)]
pub struct AppServices {
    pub config: Rc<AppConfig>,
    pub identity: Rc<PlatformIdentity>,
    pub guard: Rc<RouteGuard>,
    pub transport: HttpTransport,
}

impl AppServices {
    pub fn new(config: AppConfig) -> Self {
        Self {
            identity: Rc::new(make_identity_store(&config.session)),
            guard: Rc::new(RouteGuard::new(&config.routes)),
            transport: HttpTransport::new(),
            config: Rc::new(config),
        }
    }
}

/// What the UI currently knows about the visitor.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub identity: Option<SessionIdentity>,
    pub active_role: Option<Role>,
    /// True until the first profile refresh settles.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            active_role: None,
            loading: true,
        }
    }
}

impl SessionState {
    /// Snapshot the identity store.
    pub fn load<S, C>(store: &api::IdentityStore<S, C>) -> Self
    where
        S: store::KeyValueStore,
        C: store::CookieStore,
    {
        Self {
            identity: store.current(),
            active_role: store.effective_role(),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Several roles held and none acting yet. Only then is the role picker
    /// worth offering.
    pub fn needs_role_selection(&self) -> bool {
        self.active_role.is_none()
            && self
                .identity
                .as_ref()
                .is_some_and(|identity| identity.roles.len() > 1)
    }
}

pub fn use_services() -> AppServices {
    use_context::<AppServices>()
}

/// Get the current session state.
/// Returns a signal that updates when the visitor logs in, out, or switches role.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Re-read the identity store into the session signal.
pub fn refresh_session_state(services: &AppServices, session: &mut Signal<SessionState>) {
    session.set(SessionState::load(services.identity.as_ref()));
}

/// Provider component that wires up services, session state and toasts.
/// Wrap your app with this component.
#[component]
pub fn SessionProvider(config: AppConfig, children: Element) -> Element {
    let services = use_context_provider(|| AppServices::new(config.clone()));
    let mut session = use_signal(SessionState::default);
    let toasts = use_signal(Toasts::default);
    use_context_provider(|| session);
    use_context_provider(|| toasts);

    let caller = use_api();

    // Pick up the stored session, then confirm it with the API.
    let _ = use_resource(move || {
        let services = services.clone();
        let caller = caller.clone();
        async move {
            refresh_session_state(&services, &mut session);
            if !services.identity.is_authenticated() {
                return;
            }
            let client = caller.client();
            let busy = caller.busy_flag();
            let result =
                api::endpoints::restore_session(&client, &busy, services.identity.as_ref()).await;
            if let Err(e) = result {
                if !e.is_unauthorized() {
                    tracing::warn!("Profile refresh failed: {}", e);
                }
            }
            refresh_session_state(&services, &mut session);
        }
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current visitor.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let services = use_services();
    let mut session = use_session();
    let caller = use_api();
    let nav = use_navigator();
    let busy = caller.is_busy();

    let onclick = move |_| {
        let services = services.clone();
        let caller = caller.clone();
        async move {
            let client = caller.client();
            // Local state is cleared whatever the API answers.
            let _ = api::endpoints::sign_out(&client, &caller.busy_flag(), services.identity.as_ref())
                .await;
            refresh_session_state(&services, &mut session);
            nav.replace(services.guard.login_route().to_string());
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: busy,
            onclick: onclick,
            "{label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use api::{IdentityStore, SessionConfig};
    use store::{MemoryCookies, MemoryStore};

    use super::*;

    #[test]
    fn test_load_snapshots_identity_and_role() {
        let ids = IdentityStore::new(MemoryStore::new(), MemoryCookies::new(), SessionConfig::default());
        assert_eq!(
            SessionState::load(&ids),
            SessionState {
                identity: None,
                active_role: None,
                loading: false,
            }
        );

        let identity = SessionIdentity {
            name: Some("Mai".to_string()),
            roles: vec![Role::craft_village_owner()],
            ..Default::default()
        };
        ids.login(&identity);

        let state = SessionState::load(&ids);
        assert!(state.is_authenticated());
        // A single role is effective without picking it
        assert_eq!(state.active_role, Some(Role::craft_village_owner()));
        assert!(!state.needs_role_selection());
    }

    #[test]
    fn test_needs_role_selection_only_for_several_roles() {
        let ids = IdentityStore::new(MemoryStore::new(), MemoryCookies::new(), SessionConfig::default());
        assert!(!SessionState::load(&ids).needs_role_selection());

        ids.login(&SessionIdentity {
            roles: vec![Role::user()],
            ..Default::default()
        });
        assert!(!SessionState::load(&ids).needs_role_selection());

        ids.login(&SessionIdentity {
            roles: vec![Role::tour_guide(), Role::user()],
            ..Default::default()
        });
        assert!(SessionState::load(&ids).needs_role_selection());

        assert!(ids.set_active_role(&Role::user()));
        assert!(!SessionState::load(&ids).needs_role_selection());
    }
}
