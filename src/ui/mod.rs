//! UI components for TabbyDeck
//!
//! This module contains all user interface components built with Dioxus.

pub mod components;
pub mod panels;
pub mod sidebar;

use crate::ui::panels::Panels;
use crate::ui::sidebar::Sidebar;
use dioxus::prelude::*;

#[component]
pub fn Layout() -> Element {
    rsx! {
        div {
            class: "app-shell",
            Sidebar {}
            main {
                class: "main-panel",
                Panels {}
            }
        }
    }
}
