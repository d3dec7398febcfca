//! Route protection component.

use api::GuardState;
use dioxus::prelude::*;

use crate::session::{use_services, use_session, SessionState};

/// Renders `children` only once the visitor is allowed on `path`.
///
/// The decision is re-made whenever `path` or the session changes. While it
/// is pending nothing protected is shown; a redirect decision navigates away
/// and a denial shows a short explanation instead of the page.
#[component]
pub fn RoleGuard(path: String, children: Element) -> Element {
    let services = use_services();
    let session = use_session();
    // The decision and the (path, session) it was made for
    let mut decided = use_signal(|| None::<(String, SessionState, GuardState)>);
    let nav = use_navigator();

    use_effect(use_reactive((&path,), move |(path,)| {
        let current = session();
        if current.loading {
            return;
        }
        let mut next = GuardState::default();
        next.begin();
        let access = services.guard.decide(&path, services.identity.as_ref());
        tracing::debug!("Access to {}: {:?}", path, access);
        next.resolve(access);
        if let GuardState::Redirecting(target) = &next {
            nav.replace(target.clone());
        }
        decided.set(Some((path, current, next)));
    }));

    // A decision made for another path or session is stale
    let state = match decided() {
        Some((for_path, for_session, state)) if for_path == path && for_session == session() => state,
        _ => GuardState::Checking,
    };

    match state {
        GuardState::Authorized => rsx! {
            {children}
        },
        GuardState::Denied => rsx! {
            div {
                class: "guard-denied",
                h2 { "Access denied" }
                p { "Your account has no role that opens this page." }
            }
        },
        GuardState::Unknown | GuardState::Checking | GuardState::Redirecting(_) => rsx! {
            div { class: "guard-pending", "Checking access..." }
        },
    }
}
