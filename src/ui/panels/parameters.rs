//! Sampling-parameters panel
//!
//! The twelve sampling knobs in a grid, edited locally and persisted with
//! "Save Parameters". "Reset to Default" writes the documented defaults.

use crate::app::{AppState, StatusMessage};
use crate::storage::settings::save_parameters;
use crate::types::params::SamplingParameters;
use dioxus::prelude::*;

#[component]
pub fn ParametersPanel() -> Element {
    let app_state = use_context::<AppState>();
    let mut draft = use_signal(|| app_state.parameters.read().clone());

    let app_state_for_save = app_state.clone();
    let handle_save = move |_| {
        let mut app_state = app_state_for_save.clone();
        let mut params = draft.read().clone();
        params.validate();
        match save_parameters(&params) {
            Ok(()) => {
                app_state.parameters.set(params.clone());
                draft.set(params);
                app_state.status.set(Some(StatusMessage::Success(
                    "Parameters saved successfully!".to_string(),
                )));
            }
            Err(e) => {
                tracing::error!("Failed to save parameters: {}", e);
                app_state
                    .status
                    .set(Some(StatusMessage::Error(e.to_string())));
            }
        }
    };

    let app_state_for_reset = app_state.clone();
    let handle_reset = move |_| {
        let mut app_state = app_state_for_reset.clone();
        let params = SamplingParameters::default();
        match save_parameters(&params) {
            Ok(()) => {
                app_state.parameters.set(params.clone());
                draft.set(params);
                app_state.status.set(Some(StatusMessage::Success(
                    "Parameters reset to defaults".to_string(),
                )));
            }
            Err(e) => {
                tracing::error!("Failed to save parameters: {}", e);
                app_state
                    .status
                    .set(Some(StatusMessage::Error(e.to_string())));
            }
        }
    };

    let params = draft.read().clone();

    rsx! {
        div {
            class: "parameters-panel",

            div {
                class: "param-grid",

                NumberField {
                    label: "Temperature",
                    min: 0.0,
                    max: 5.0,
                    step: 0.05,
                    value: params.temperature as f64,
                    onchange: move |v: f64| draft.write().temperature = v as f32,
                }
                NumberField {
                    label: "Top K",
                    min: 0.0,
                    max: 200.0,
                    step: 1.0,
                    value: params.top_k as f64,
                    onchange: move |v: f64| draft.write().top_k = v as u32,
                }
                NumberField {
                    label: "Top P",
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    value: params.top_p as f64,
                    onchange: move |v: f64| draft.write().top_p = v as f32,
                }
                NumberField {
                    label: "Typical P",
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    value: params.typical_p as f64,
                    onchange: move |v: f64| draft.write().typical_p = v as f32,
                }
                NumberField {
                    label: "Min P",
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    value: params.min_p as f64,
                    onchange: move |v: f64| draft.write().min_p = v as f32,
                }
                NumberField {
                    label: "Top A",
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    value: params.top_a as f64,
                    onchange: move |v: f64| draft.write().top_a = v as f32,
                }
                NumberField {
                    label: "TFS",
                    min: 0.0,
                    max: 1.0,
                    step: 0.01,
                    value: params.tfs as f64,
                    onchange: move |v: f64| draft.write().tfs = v as f32,
                }
                NumberField {
                    label: "Repetition Penalty",
                    min: 1.0,
                    max: 3.0,
                    step: 0.01,
                    value: params.repetition_penalty as f64,
                    onchange: move |v: f64| draft.write().repetition_penalty = v as f32,
                }
                NumberField {
                    label: "Rep Pen Range",
                    min: 0.0,
                    max: 204800.0,
                    step: 1.0,
                    value: params.rep_pen_range as f64,
                    onchange: move |v: f64| draft.write().rep_pen_range = v as u32,
                }
                NumberField {
                    label: "Rep Pen Decay",
                    min: 0.0,
                    max: 204800.0,
                    step: 1.0,
                    value: params.rep_pen_decay as f64,
                    onchange: move |v: f64| draft.write().rep_pen_decay = v as u32,
                }
                NumberField {
                    label: "Frequency Penalty",
                    min: -2.0,
                    max: 2.0,
                    step: 0.01,
                    value: params.frequency_penalty as f64,
                    onchange: move |v: f64| draft.write().frequency_penalty = v as f32,
                }
                NumberField {
                    label: "Presence Penalty",
                    min: -2.0,
                    max: 2.0,
                    step: 0.01,
                    value: params.presence_penalty as f64,
                    onchange: move |v: f64| draft.write().presence_penalty = v as f32,
                }
            }

            div {
                class: "button-row",
                button {
                    class: "button button-primary",
                    onclick: handle_save,
                    "Save Parameters"
                }
                button {
                    class: "button",
                    onclick: handle_reset,
                    "Reset to Default"
                }
            }
        }
    }
}

#[component]
fn NumberField(
    label: String,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
    onchange: EventHandler<f64>,
) -> Element {
    rsx! {
        div {
            class: "param-field",
            label {
                class: "field-label",
                "{label}"
            }
            input {
                r#type: "number",
                class: "field-input",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                oninput: move |e| {
                    if let Ok(parsed) = e.value().parse::<f64>() {
                        onchange.call(parsed.clamp(min, max));
                    }
                },
            }
        }
    }
}
