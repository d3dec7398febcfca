use dioxus::prelude::*;

use ui::{Navbar, RoleGuard, SessionProvider, ToastPanel};
use views::{
    AdminDashboard, CraftVillageDashboard, Home, Login, ModeratorDashboard, NotFound, SelectRole,
    TourGuideDashboard,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/select-role")]
        SelectRole {},
        #[route("/admin")]
        AdminDashboard {},
        #[route("/moderator")]
        ModeratorDashboard {},
        #[route("/tour-guide")]
        TourGuideDashboard {},
        #[route("/craft-village")]
        CraftVillageDashboard {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

fn main() {
    if let Err(e) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("Failed to initialise logging: {e}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(ui::load_config);
    tracing::debug!("API base URL: {}", config.api.base_url);

    rsx! {
        style { {views::APP_CSS} }

        SessionProvider {
            config,
            Router::<Route> {}
        }
    }
}

/// Shared chrome: navigation, route guard, toasts.
#[component]
fn Shell() -> Element {
    let route = use_route::<Route>();

    rsx! {
        Navbar {
            Link { class: "navbar-brand", to: Route::Home {}, "Tourbook" }
        }
        main {
            class: "page",
            RoleGuard {
                path: route.to_string(),
                Outlet::<Route> {}
            }
        }
        ToastPanel {}
    }
}
