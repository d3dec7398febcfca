//! Role selection for visitors holding more than one role.

use api::Role;
use dioxus::prelude::*;

use crate::session::{refresh_session_state, use_services, use_session};

/// Lists the visitor's roles; picking one makes it active and opens its
/// dashboard.
#[component]
pub fn RolePicker() -> Element {
    let services = use_services();
    let mut session = use_session();
    let nav = use_navigator();

    let state = session();
    let Some(identity) = state.identity.clone() else {
        return rsx! {
            p { class: "role-picker-empty", "Sign in to choose a role." }
        };
    };

    let pick = move |role: Role| {
        if !services.identity.set_active_role(&role) {
            tracing::warn!("Refusing role {} the session does not hold", role);
            return;
        }
        refresh_session_state(&services, &mut session);
        let target = services.guard.home_for(&role).unwrap_or("/").to_string();
        tracing::info!("Acting as {}, opening {}", role, target);
        nav.replace(target);
    };

    rsx! {
        div {
            class: "role-picker",
            h2 { "Continue as" }
            p { class: "role-picker-who", "{identity.display_name()}" }
            ul {
                for role in identity.roles.clone() {
                    li {
                        key: "{role}",
                        button {
                            class: if state.active_role.as_ref() == Some(&role) { "role-option active" } else { "role-option" },
                            onclick: {
                                let mut pick = pick.clone();
                                let role = role.clone();
                                move |_| pick(role.clone())
                            },
                            "{role.label()}"
                        }
                    }
                }
            }
        }
    }
}
