//! Root Dioxus application component
//!
//! This module contains the main App component that serves as the root of
//! the UI tree, plus the global state shared across components.

use crate::storage::settings::{load_connection, load_load_config, load_parameters};
use crate::types::config::{ConnectionConfig, LoadConfig};
use crate::types::params::SamplingParameters;
use crate::ui::Layout;
use dioxus::prelude::*;

static MAIN_CSS: Asset = asset!("/assets/main.css");

/// Represents the current state of the remote model
#[derive(Clone, PartialEq, Debug)]
pub enum ModelState {
    /// Nothing loaded, or we have not asked yet
    NotLoaded,
    /// Load in progress, with the server-reported percentage
    Loading(u8),
    Loaded(String),
    Error(String),
}

/// Outcome banner shown in the sidebar after an action
#[derive(Clone, PartialEq, Debug)]
pub enum StatusMessage {
    Success(String),
    Error(String),
}

/// Global application state shared across components
#[derive(Clone)]
pub struct AppState {
    pub connection: Signal<ConnectionConfig>,
    pub load_config: Signal<LoadConfig>,
    pub parameters: Signal<SamplingParameters>,
    /// Model ids fetched from the server, in server order
    pub models: Signal<Vec<String>>,
    /// Draft-model ids, sentinel entry first when any exist
    pub draft_models: Signal<Vec<String>>,
    pub model_state: Signal<ModelState>,
    pub status: Signal<Option<StatusMessage>>,
    /// A completion is streaming; one in-flight request at a time
    pub is_generating: Signal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        tracing::info!("AppState initialized");
        let mut parameters = load_parameters();
        parameters.validate();

        Self {
            connection: Signal::new(load_connection()),
            load_config: Signal::new(load_load_config()),
            parameters: Signal::new(parameters),
            models: Signal::new(Vec::new()),
            draft_models: Signal::new(Vec::new()),
            model_state: Signal::new(ModelState::NotLoaded),
            status: Signal::new(None),
            is_generating: Signal::new(false),
        }
    }
}

#[component]
pub fn App() -> Element {
    let app_state = AppState::new();
    use_context_provider(|| app_state);

    rsx! {
        document::Stylesheet { href: MAIN_CSS }
        Layout {}
    }
}
