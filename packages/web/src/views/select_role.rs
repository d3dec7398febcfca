use dioxus::prelude::*;
use ui::RolePicker;

#[component]
pub fn SelectRole() -> Element {
    rsx! {
        RolePicker {}
    }
}
