//! Sidebar: connection form, model picker, status banner

pub mod connection;
pub mod model_picker;

use crate::app::AppState;
use crate::ui::components::status::StatusBanner;
use crate::ui::sidebar::connection::ConnectionForm;
use crate::ui::sidebar::model_picker::ModelPicker;
use dioxus::prelude::*;

#[component]
pub fn Sidebar() -> Element {
    let app_state = use_context::<AppState>();
    let status = app_state.status.read().clone();

    rsx! {
        aside {
            class: "sidebar",
            ConnectionForm {}
            ModelPicker {}
            if let Some(message) = status {
                StatusBanner { message }
            }
        }
    }
}
