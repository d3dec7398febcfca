//! Public start page.

use dioxus::prelude::*;
use ui::{use_services, use_session};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let services = use_services();
    let session = use_session();
    let state = session();

    let dashboard = state
        .active_role
        .as_ref()
        .and_then(|role| services.guard.home_for(role))
        .map(str::to_string);

    let needs_role = state.needs_role_selection();
    let signed_in = state.is_authenticated();

    rsx! {
        h1 { "Tourbook" }
        p { "Tours, guides and craft villages in one place." }
        {match dashboard {
            Some(target) => rsx! {
                Link { to: target, "Open your dashboard" }
            },
            None if needs_role => rsx! {
                Link { to: Route::SelectRole {}, "Choose how to continue" }
            },
            // Roles without a dashboard stay on the public pages
            None if signed_in => rsx! {},
            None => rsx! {
                Link { to: Route::Login {}, "Sign in" }
            },
        }}
    }
}
