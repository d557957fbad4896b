//! Status banner shown after sidebar actions

use crate::app::StatusMessage;
use dioxus::prelude::*;

#[component]
pub fn StatusBanner(message: StatusMessage) -> Element {
    match message {
        StatusMessage::Success(text) => rsx! {
            div {
                class: "banner banner-success",
                "{text}"
            }
        },
        StatusMessage::Error(text) => rsx! {
            div {
                class: "banner banner-error",
                "{text}"
            }
        },
    }
}
