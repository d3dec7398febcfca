use dioxus::prelude::*;

use crate::session::{use_services, use_session, LogoutButton};

#[component]
pub fn Navbar(children: Element) -> Element {
    let services = use_services();
    let session = use_session();
    let state = session();

    let role_selection = services.guard.role_selection_route().to_string();
    let login = services.guard.login_route().to_string();

    let session_area = match &state.identity {
        Some(identity) => {
            let name = identity.display_name().to_string();
            let role_label = state
                .active_role
                .as_ref()
                .map(|role| role.label().to_string());
            let can_switch = identity.roles.len() > 1;
            rsx! {
                span { class: "navbar-user", "{name}" }
                if can_switch {
                    Link {
                        class: "navbar-role",
                        to: role_selection,
                        {role_label.clone().unwrap_or_else(|| "Choose role".to_string())}
                    }
                } else {
                    span { class: "navbar-role", {role_label.clone().unwrap_or_default()} }
                }
                LogoutButton { class: "navbar-logout" }
            }
        }
        None if !state.loading => rsx! {
            Link { class: "navbar-login", to: login, "Sign in" }
        },
        None => rsx! {},
    };

    rsx! {
        div {
            class: "navbar",
            {children}
            div { class: "navbar-session", {session_area} }
        }
    }
}
