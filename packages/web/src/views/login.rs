//! Login page view with an email/password form.

use dioxus::prelude::*;
use ui::{refresh_session_state, use_api, use_services, use_session};

/// Login page component.
#[component]
pub fn Login() -> Element {
    let services = use_services();
    let mut session = use_session();
    let caller = use_api();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let busy = caller.is_busy();

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let services = services.clone();
        let caller = caller.clone();
        async move {
            let client = caller.client();
            let result = api::endpoints::sign_in(
                &client,
                &caller.busy_flag(),
                services.identity.as_ref(),
                &email(),
                &password(),
            )
            .await;
            // Failures are already toasted
            let Ok(identity) = result else {
                return;
            };
            tracing::info!("Signed in as {}", identity.display_name());
            password.set(String::new());
            refresh_session_state(&services, &mut session);

            let target = if services.identity.needs_role_selection() {
                services.guard.role_selection_route().to_string()
            } else {
                services
                    .identity
                    .effective_role()
                    .and_then(|role| services.guard.home_for(&role).map(str::to_string))
                    .unwrap_or_else(|| "/".to_string())
            };
            nav.replace(target);
        }
    };

    rsx! {
        div {
            class: "login-container",
            h1 { "Tourbook" }
            p { class: "login-hint", "Sign in to manage your tours." }

            form {
                class: "login-form",
                onsubmit: onsubmit,
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button {
                    class: "login-btn",
                    r#type: "submit",
                    disabled: busy,
                    if busy {
                        "Signing in..."
                    } else {
                        "Sign in"
                    }
                }
            }
        }
    }
}
