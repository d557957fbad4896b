//! Main-panel tabs: Completions and Parameters

#![allow(non_snake_case)]

pub mod completion;
pub mod parameters;

use crate::ui::panels::completion::CompletionPanel;
use crate::ui::panels::parameters::ParametersPanel;
use dioxus::prelude::*;

#[derive(PartialEq, Clone, Copy)]
enum PanelTab {
    Completions,
    Parameters,
}

pub fn Panels() -> Element {
    let mut active_tab = use_signal(|| PanelTab::Completions);

    rsx! {
        div {
            class: "panels",

            div {
                class: "tab-bar",
                TabButton {
                    active: active_tab() == PanelTab::Completions,
                    onclick: move |_| active_tab.set(PanelTab::Completions),
                    label: "Completions",
                }
                TabButton {
                    active: active_tab() == PanelTab::Parameters,
                    onclick: move |_| active_tab.set(PanelTab::Parameters),
                    label: "Parameters",
                }
            }

            div {
                class: "tab-content",
                match active_tab() {
                    PanelTab::Completions => rsx! { CompletionPanel {} },
                    PanelTab::Parameters => rsx! { ParametersPanel {} },
                }
            }
        }
    }
}

#[component]
fn TabButton(active: bool, onclick: EventHandler<MouseEvent>, label: String) -> Element {
    let classes = if active { "tab tab-active" } else { "tab" };

    rsx! {
        button {
            class: "{classes}",
            onclick: onclick,
            "{label}"
        }
    }
}
