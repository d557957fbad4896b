//! Completion panel
//!
//! Prompt input on the left, the streamed completion on the right. The
//! output block starts as the prompt itself and grows token by token, so
//! prompt and completion read as one text.

use crate::api::stream::{CompletionStream, StreamEvent};
use crate::api::{ApiClient, ApiError};
use crate::app::AppState;
use crate::types::config::ConnectionConfig;
use crate::types::params::SamplingParameters;
use dioxus::prelude::*;

async fn start_completion(
    connection: &ConnectionConfig,
    prompt: &str,
    params: &SamplingParameters,
) -> Result<CompletionStream, ApiError> {
    let client = ApiClient::new(connection)?;
    let lines = client.submit_completion(prompt, params).await?;
    Ok(CompletionStream::new(lines))
}

#[component]
pub fn CompletionPanel() -> Element {
    let app_state = use_context::<AppState>();
    let mut prompt = use_signal(String::new);
    let output = use_signal(String::new);
    let stream_error = use_signal(|| None::<String>);

    let app_state_for_start = app_state.clone();
    let handle_start = move |_| {
        let mut app_state = app_state_for_start.clone();
        if *app_state.is_generating.read() {
            return;
        }
        let prompt_text = prompt.read().clone();
        let connection = app_state.connection.read().clone();
        let params = app_state.parameters.read().clone();

        let mut output = output.clone();
        let mut stream_error = stream_error.clone();
        output.set(prompt_text.clone());
        stream_error.set(None);
        app_state.is_generating.set(true);

        spawn(async move {
            match start_completion(&connection, &prompt_text, &params).await {
                Ok(mut stream) => {
                    while let Some(event) = stream.next().await {
                        match event {
                            StreamEvent::Text(fragment) => {
                                output.write().push_str(&fragment);
                            }
                            StreamEvent::Done => break,
                            StreamEvent::Failed(msg) => {
                                stream_error.set(Some(msg));
                                break;
                            }
                        }
                    }
                }
                Err(e) => stream_error.set(Some(e.to_string())),
            }
            app_state.is_generating.set(false);
        });
    };

    let is_generating = *app_state.is_generating.read();

    rsx! {
        div {
            class: "completion-panel",

            div {
                class: "completion-columns",
                textarea {
                    class: "prompt-input",
                    placeholder: "Prompt...",
                    value: "{prompt}",
                    oninput: move |e| prompt.set(e.value()),
                }
                div {
                    class: "completion-output",
                    if let Some(error) = stream_error.read().as_ref() {
                        div {
                            class: "banner banner-error",
                            "Stream failed: {error}"
                        }
                    }
                    pre { "{output}" }
                }
            }

            button {
                class: "button button-primary",
                disabled: is_generating,
                onclick: handle_start,
                if is_generating {
                    "Generating..."
                } else {
                    "Start Completion"
                }
            }
        }
    }
}
