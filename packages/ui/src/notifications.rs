//! Toast notifications: the UI side of [`api::Notifier`].

use api::{NoticeLevel, Notifier};
use dioxus::prelude::*;

/// Toasts kept on screen at once; older ones are dropped first.
const MAX_TOASTS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub timestamp: String,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Toasts {
    pub entries: Vec<Toast>,
    next_id: u64,
}

impl Toasts {
    pub fn push(&mut self, level: NoticeLevel, message: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Toast {
            id,
            timestamp: current_time(),
            level,
            message: message.to_string(),
        });
        if self.entries.len() > MAX_TOASTS {
            let excess = self.entries.len() - MAX_TOASTS;
            self.entries.drain(..excess);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|toast| toast.id != id);
    }
}

pub fn use_toasts() -> Signal<Toasts> {
    use_context::<Signal<Toasts>>()
}

/// Routes call-wrapper notices into the toast list.
#[derive(Clone, Copy)]
pub struct ToastNotifier(pub Signal<Toasts>);

impl Notifier for ToastNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        let mut toasts = self.0;
        let id = toasts.write().push(level, message);
        auto_dismiss(toasts, id);
    }
}

#[cfg(target_arch = "wasm32")]
fn auto_dismiss(mut toasts: Signal<Toasts>, id: u64) {
    spawn(async move {
        gloo_timers::future::sleep(std::time::Duration::from_secs(6)).await;
        toasts.write().dismiss(id);
    });
}

// Native toasts stay until dismissed.
#[cfg(not(target_arch = "wasm32"))]
fn auto_dismiss(_toasts: Signal<Toasts>, _id: u64) {}

#[component]
pub fn ToastPanel() -> Element {
    let mut toasts = use_toasts();
    let entries = toasts().entries.clone();

    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "toast-panel",
            for toast in entries {
                div {
                    key: "{toast.id}",
                    class: match toast.level {
                        NoticeLevel::Error => "toast error",
                        NoticeLevel::Warning => "toast warning",
                        NoticeLevel::Success => "toast success",
                        NoticeLevel::Info => "toast info",
                    },
                    span { class: "toast-time", "{toast.timestamp}" }
                    span { class: "toast-message", " {toast.message}" }
                    button {
                        class: "toast-close",
                        onclick: move |_| toasts.write().dismiss(toast.id),
                        "×"
                    }
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    "00:00:00".to_string()
}
