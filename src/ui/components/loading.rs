//! Spinner and progress indicators

use dioxus::prelude::*;

#[component]
pub fn Spinner(size: u32) -> Element {
    rsx! {
        svg {
            class: "spinner",
            width: "{size}",
            height: "{size}",
            view_box: "0 0 24 24",
            fill: "none",
            stroke: "currentColor",
            stroke_width: "2",
            stroke_linecap: "round",
            circle { cx: "12", cy: "12", r: "10", opacity: "0.25" }
            path { d: "M12 2a10 10 0 0 1 10 10" }
        }
    }
}

/// Horizontal progress bar for the 0-100 load percentage
#[component]
pub fn ProgressBar(percent: u8) -> Element {
    rsx! {
        div {
            class: "progress-track",
            div {
                class: "progress-fill",
                style: "width: {percent}%;",
            }
            span {
                class: "progress-label",
                "{percent}%"
            }
        }
    }
}
