//! Connection form
//!
//! URL and API-key inputs plus "Save & Connect": persists the connection,
//! then fetches the model lists and the currently loaded model.

use crate::api::ApiClient;
use crate::app::{AppState, ModelState, StatusMessage};
use crate::storage::settings::save_connection;
use crate::types::config::ConnectionConfig;
use dioxus::prelude::*;

#[component]
pub fn ConnectionForm() -> Element {
    let app_state = use_context::<AppState>();
    let mut url_input = use_signal(|| app_state.connection.read().url.clone());
    let mut api_key_input = use_signal(|| app_state.connection.read().api_key.clone());

    let app_state_for_save = app_state.clone();
    let handle_save = move |_| {
        let mut app_state = app_state_for_save.clone();
        let config = ConnectionConfig {
            url: url_input.read().trim().to_string(),
            api_key: api_key_input.read().trim().to_string(),
        };
        if let Err(e) = save_connection(&config) {
            tracing::error!("Failed to save connection: {}", e);
            app_state
                .status
                .set(Some(StatusMessage::Error(e.to_string())));
            return;
        }
        app_state.connection.set(config.clone());

        spawn(async move {
            let client = match ApiClient::new(&config) {
                Ok(client) => client,
                Err(e) => {
                    app_state
                        .status
                        .set(Some(StatusMessage::Error(e.to_string())));
                    return;
                }
            };

            match client.list_models().await {
                Ok(models) => app_state.models.set(models),
                Err(e) => {
                    app_state
                        .status
                        .set(Some(StatusMessage::Error(e.to_string())));
                    return;
                }
            }

            // Draft list is optional server support; an error just leaves it empty
            match client.list_draft_models().await {
                Ok(drafts) => app_state.draft_models.set(drafts),
                Err(e) => tracing::warn!("Failed to list draft models: {}", e),
            }

            match client.current_model().await {
                Ok(Some(id)) => {
                    app_state.model_state.set(ModelState::Loaded(id.clone()));
                    app_state.status.set(Some(StatusMessage::Success(format!(
                        "Saved & Connected! Model: {}",
                        id
                    ))));
                }
                Ok(None) => {
                    app_state.model_state.set(ModelState::NotLoaded);
                    app_state.status.set(Some(StatusMessage::Success(
                        "Saved & Connected! Model: None".to_string(),
                    )));
                }
                Err(e) => {
                    app_state
                        .status
                        .set(Some(StatusMessage::Error(e.to_string())));
                }
            }
        });
    };

    rsx! {
        div {
            class: "sidebar-section",
            label {
                class: "field-label",
                "API URL"
            }
            input {
                r#type: "text",
                class: "field-input",
                placeholder: "e.g. http://127.0.0.1:5000",
                value: "{url_input}",
                oninput: move |e| url_input.set(e.value()),
            }
            label {
                class: "field-label",
                "API Key"
            }
            input {
                r#type: "password",
                class: "field-input",
                value: "{api_key_input}",
                oninput: move |e| api_key_input.set(e.value()),
            }
            button {
                class: "button button-primary",
                onclick: handle_save,
                "Save & Connect"
            }
        }
    }
}
