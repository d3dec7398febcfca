//! Role dashboards. Access is enforced by the route guard in the shell; these
//! views assume the visitor is allowed to be here.

use api::FilePart;
use dioxus::prelude::*;
use ui::{refresh_session_state, use_api, use_services, use_session};

#[component]
pub fn AdminDashboard() -> Element {
    rsx! {
        Dashboard { title: "Administration", blurb: "Manage accounts, roles and published content." }
    }
}

#[component]
pub fn ModeratorDashboard() -> Element {
    rsx! {
        Dashboard { title: "Moderation", blurb: "Review reported posts and pending tour listings." }
    }
}

#[component]
pub fn TourGuideDashboard() -> Element {
    rsx! {
        Dashboard { title: "Tour guide", blurb: "Your schedule, bookings and tour pages." }
    }
}

#[component]
pub fn CraftVillageDashboard() -> Element {
    rsx! {
        Dashboard { title: "Craft village", blurb: "Workshops, products and visitor photos." }
        ImageUpload { path: "/craft-villages/me/images" }
    }
}

#[component]
fn Dashboard(title: String, blurb: String) -> Element {
    let services = use_services();
    let mut session = use_session();
    let caller = use_api();
    let busy = caller.is_busy();

    let state = session();
    let name = state
        .identity
        .as_ref()
        .map(|identity| identity.display_name().to_string())
        .unwrap_or_default();

    let refresh = move |_| {
        let services = services.clone();
        let caller = caller.clone();
        async move {
            let client = caller.client();
            let result =
                api::endpoints::refresh_session(&client, &caller.busy_flag(), services.identity.as_ref())
                    .await;
            if result.is_ok() {
                refresh_session_state(&services, &mut session);
            }
        }
    };

    rsx! {
        section {
            class: "dashboard",
            h1 { "{title}" }
            p { "{blurb}" }
            p { class: "dashboard-who", "Signed in as {name}" }
            button {
                disabled: busy,
                onclick: refresh,
                if busy { "Refreshing..." } else { "Refresh profile" }
            }
        }
    }
}

#[component]
fn ImageUpload(path: String) -> Element {
    let caller = use_api();
    let mut uploaded = use_signal(|| Option::<String>::None);
    let busy = caller.is_busy();

    let onchange = move |evt: FormEvent| {
        let caller = caller.clone();
        let path = path.clone();
        async move {
            let Some(files) = evt.files() else {
                return;
            };
            for file_name in files.files() {
                let Some(bytes) = files.read_file(&file_name).await else {
                    tracing::warn!("Could not read {}", file_name);
                    continue;
                };
                let part = FilePart {
                    content_type: content_type_for(&file_name).to_string(),
                    file_name,
                    bytes,
                };
                let client = caller.client();
                if let Ok(image) =
                    api::endpoints::upload_image(&client, &caller.busy_flag(), &path, part).await
                {
                    uploaded.set(Some(image.url));
                }
            }
        }
    };

    rsx! {
        section {
            class: "image-upload",
            h2 { "Add a photo" }
            input {
                r#type: "file",
                accept: "image/*",
                disabled: busy,
                onchange: onchange,
            }
            if busy {
                p { "Uploading..." }
            }
            {uploaded().map(|url| rsx! {
                img { class: "image-upload-preview", src: "{url}" }
            })}
        }
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
