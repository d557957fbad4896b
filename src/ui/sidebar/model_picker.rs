//! Model picker
//!
//! Model selection, the load-configuration section, and the Load / Unload
//! actions. A load streams progress from the server into the progress bar.

use crate::api::client::NO_DRAFT_MODEL;
use crate::api::stream::track_load;
use crate::api::ApiClient;
use crate::app::{AppState, ModelState, StatusMessage};
use crate::storage::settings::save_load_config;
use crate::types::config::CacheMode;
use crate::ui::components::loading::{ProgressBar, Spinner};
use dioxus::prelude::*;

#[component]
pub fn ModelPicker() -> Element {
    let app_state = use_context::<AppState>();
    let saved_config = app_state.load_config.read().clone();

    let mut selected_model = use_signal(|| None::<String>);
    let mut show_config = use_signal(|| false);

    // Edit buffers; nothing is persisted until "Save Configuration"
    let mut max_seq_len = use_signal(|| saved_config.max_seq_len);
    let mut gpu_split_text = use_signal(|| saved_config.gpu_split_text());
    let mut cache_mode = use_signal(|| saved_config.cache_mode);
    let mut max_cache_size_text = use_signal(|| {
        saved_config
            .max_cache_size
            .map(|v| v.to_string())
            .unwrap_or_default()
    });
    let mut rope_scale_text = use_signal(|| {
        saved_config
            .rope_scale
            .map(|v| v.to_string())
            .unwrap_or_default()
    });
    let mut rope_alpha_text = use_signal(|| {
        saved_config
            .rope_alpha
            .map(|v| v.to_string())
            .unwrap_or_default()
    });
    let mut draft_choice = use_signal(|| {
        saved_config
            .draft_model
            .clone()
            .unwrap_or_else(|| NO_DRAFT_MODEL.to_string())
    });
    let mut draft_rope_scale_text = use_signal(|| {
        saved_config
            .draft_rope_scale
            .map(|v| v.to_string())
            .unwrap_or_default()
    });
    let mut draft_rope_alpha_text = use_signal(|| {
        saved_config
            .draft_rope_alpha
            .map(|v| v.to_string())
            .unwrap_or_default()
    });

    // Pre-select the first model once the list arrives
    {
        let models = app_state.models.clone();
        use_effect(move || {
            let models = models.read();
            if selected_model.read().is_none() {
                if let Some(first) = models.first() {
                    selected_model.set(Some(first.clone()));
                }
            }
        });
    }

    let app_state_for_config = app_state.clone();
    let handle_save_config = move |_| {
        let mut app_state = app_state_for_config.clone();
        let mut config = app_state.load_config.read().clone();

        // Invalid split input leaves the saved config untouched
        if let Err(msg) = config.apply_gpu_split(&gpu_split_text.read()) {
            app_state.status.set(Some(StatusMessage::Error(msg)));
            return;
        }

        config.max_seq_len = *max_seq_len.read();
        config.cache_mode = *cache_mode.read();
        config.max_cache_size = max_cache_size_text.read().trim().parse().ok();
        config.rope_scale = rope_scale_text.read().trim().parse().ok();
        config.rope_alpha = rope_alpha_text.read().trim().parse().ok();
        config.draft_rope_scale = draft_rope_scale_text.read().trim().parse().ok();
        config.draft_rope_alpha = draft_rope_alpha_text.read().trim().parse().ok();
        let choice = draft_choice.read().clone();
        config.draft_model = if choice.is_empty() || choice == NO_DRAFT_MODEL {
            None
        } else {
            Some(choice)
        };

        match save_load_config(&config) {
            Ok(()) => {
                app_state.load_config.set(config);
                app_state.status.set(Some(StatusMessage::Success(
                    "Configuration saved successfully!".to_string(),
                )));
            }
            Err(e) => {
                tracing::error!("Failed to save load config: {}", e);
                app_state
                    .status
                    .set(Some(StatusMessage::Error(e.to_string())));
            }
        }
    };

    let app_state_for_load = app_state.clone();
    let handle_load = move |_| {
        let mut app_state = app_state_for_load.clone();
        if matches!(*app_state.model_state.read(), ModelState::Loading(_)) {
            return;
        }
        let Some(name) = selected_model.read().clone() else {
            app_state
                .status
                .set(Some(StatusMessage::Error("No model selected".to_string())));
            return;
        };
        app_state.status.set(None);
        app_state.model_state.set(ModelState::Loading(0));
        let connection = app_state.connection.read().clone();
        let config = app_state.load_config.read().clone();

        spawn(async move {
            let client = match ApiClient::new(&connection) {
                Ok(client) => client,
                Err(e) => {
                    app_state.model_state.set(ModelState::Error(e.to_string()));
                    return;
                }
            };
            let lines = match client.load_model(&name, &config).await {
                Ok(lines) => lines,
                Err(e) => {
                    app_state.model_state.set(ModelState::Error(e.to_string()));
                    return;
                }
            };

            let mut progress_state = app_state.model_state.clone();
            match track_load(lines, move |percent| {
                progress_state.set(ModelState::Loading(percent));
            })
            .await
            {
                Ok(()) => {
                    app_state.model_state.set(ModelState::Loaded(name));
                    app_state.status.set(Some(StatusMessage::Success(
                        "Model loaded successfully!".to_string(),
                    )));
                }
                Err(e) => {
                    app_state.model_state.set(ModelState::Error(e.to_string()));
                }
            }
        });
    };

    let app_state_for_unload = app_state.clone();
    let handle_unload = move |_| {
        let mut app_state = app_state_for_unload.clone();
        let connection = app_state.connection.read().clone();
        spawn(async move {
            let result = match ApiClient::new(&connection) {
                Ok(client) => client.unload_model().await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    app_state.model_state.set(ModelState::NotLoaded);
                    app_state.status.set(Some(StatusMessage::Success(
                        "Model unloaded successfully!".to_string(),
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

    let models = app_state.models.read().clone();
    let draft_models = app_state.draft_models.read().clone();
    let model_state = app_state.model_state.read().clone();
    let config_toggle_label = if *show_config.read() {
        "Configuration \u{25be}"
    } else {
        "Configuration \u{25b8}"
    };

    rsx! {
        div {
            class: "sidebar-section",

            label {
                class: "field-label",
                "Select Model"
            }
            select {
                class: "field-input",
                disabled: matches!(model_state, ModelState::Loading(_)),
                onchange: move |e| selected_model.set(Some(e.value())),
                value: selected_model.read().clone().unwrap_or_default(),
                for model in models.iter() {
                    option {
                        value: "{model}",
                        "{model}"
                    }
                }
            }

            button {
                class: "button button-ghost",
                onclick: move |_| {
                    let open = *show_config.read();
                    show_config.set(!open);
                },
                "{config_toggle_label}"
            }

            if *show_config.read() {
                div {
                    class: "config-section",

                    label { class: "field-label", "Max Seq Len" }
                    input {
                        r#type: "number",
                        class: "field-input",
                        min: "1",
                        value: "{max_seq_len}",
                        oninput: move |e| {
                            let prior = *max_seq_len.read();
                            max_seq_len.set(e.value().parse().unwrap_or(prior));
                        },
                    }

                    label { class: "field-label", "GPU Split (comma-separated, leave blank for Auto-Split)" }
                    input {
                        r#type: "text",
                        class: "field-input",
                        placeholder: "e.g. 20, 24",
                        value: "{gpu_split_text}",
                        oninput: move |e| gpu_split_text.set(e.value()),
                    }

                    label { class: "field-label", "Cache Mode" }
                    select {
                        class: "field-input",
                        value: "{cache_mode.read().label()}",
                        onchange: move |e| {
                            if let Some(mode) = CacheMode::from_label(&e.value()) {
                                cache_mode.set(mode);
                            }
                        },
                        for mode in CacheMode::ALL {
                            option {
                                value: "{mode.label()}",
                                "{mode.label()}"
                            }
                        }
                    }

                    label { class: "field-label", "Max Cache Size (blank for model default)" }
                    input {
                        r#type: "number",
                        class: "field-input",
                        value: "{max_cache_size_text}",
                        oninput: move |e| max_cache_size_text.set(e.value()),
                    }

                    div {
                        class: "field-row",
                        div {
                            label { class: "field-label", "Rope Scale" }
                            input {
                                r#type: "text",
                                class: "field-input",
                                value: "{rope_scale_text}",
                                oninput: move |e| rope_scale_text.set(e.value()),
                            }
                        }
                        div {
                            label { class: "field-label", "Rope Alpha" }
                            input {
                                r#type: "text",
                                class: "field-input",
                                value: "{rope_alpha_text}",
                                oninput: move |e| rope_alpha_text.set(e.value()),
                            }
                        }
                    }

                    label { class: "field-label", "Draft Model" }
                    select {
                        class: "field-input",
                        value: "{draft_choice}",
                        onchange: move |e| draft_choice.set(e.value()),
                        if draft_models.is_empty() {
                            option {
                                value: NO_DRAFT_MODEL,
                                "{NO_DRAFT_MODEL}"
                            }
                        }
                        for draft in draft_models.iter() {
                            option {
                                value: "{draft}",
                                "{draft}"
                            }
                        }
                    }

                    div {
                        class: "field-row",
                        div {
                            label { class: "field-label", "Draft Rope Scale" }
                            input {
                                r#type: "text",
                                class: "field-input",
                                value: "{draft_rope_scale_text}",
                                oninput: move |e| draft_rope_scale_text.set(e.value()),
                            }
                        }
                        div {
                            label { class: "field-label", "Draft Rope Alpha" }
                            input {
                                r#type: "text",
                                class: "field-input",
                                value: "{draft_rope_alpha_text}",
                                oninput: move |e| draft_rope_alpha_text.set(e.value()),
                            }
                        }
                    }

                    button {
                        class: "button button-primary",
                        onclick: handle_save_config,
                        "Save Configuration"
                    }
                }
            }

            match model_state {
                ModelState::Loading(percent) => rsx! {
                    div {
                        class: "load-status",
                        Spinner { size: 16 }
                        ProgressBar { percent }
                    }
                },
                ModelState::Loaded(ref name) => rsx! {
                    div {
                        class: "load-status load-status-ready",
                        span { class: "status-dot" }
                        span { "{name}" }
                    }
                },
                ModelState::Error(ref msg) => rsx! {
                    div {
                        class: "banner banner-error",
                        "{msg}"
                    }
                },
                ModelState::NotLoaded => rsx! {
                    div {
                        class: "load-status load-status-idle",
                        "No model loaded"
                    }
                },
            }

            div {
                class: "button-row",
                button {
                    class: "button",
                    disabled: matches!(*app_state.model_state.read(), ModelState::Loading(_)),
                    onclick: handle_load,
                    "Load Model"
                }
                button {
                    class: "button",
                    disabled: matches!(*app_state.model_state.read(), ModelState::Loading(_)),
                    onclick: handle_unload,
                    "Unload Model"
                }
            }
        }
    }
}
