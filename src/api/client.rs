//! Inference-server HTTP client
//!
//! One stateless request function per server operation. Each performs
//! exactly one HTTP call, applies no retry, and converts transport or
//! status failures into an `ApiError` for the caller to render.

use crate::api::sse::SseLines;
use crate::api::ApiError;
use crate::types::config::{ConnectionConfig, LoadConfig};
use crate::types::params::SamplingParameters;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Sentinel entry offered in the draft-model list for "no draft model"
pub const NO_DRAFT_MODEL: &str = "None";

/// Completion length the panel always requests
const MAX_TOKENS: u32 = 512;

#[derive(Debug, Deserialize)]
struct ModelDescriptor {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelDescriptor>,
}

/// Client for one configured server connection
pub struct ApiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ConnectionConfig) -> Result<Self, ApiError> {
        // No overall timeout: load and completion bodies stream for minutes.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Api-Key", &self.api_key)
            .header("x-admin-key", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// GET `/v1/model` - the currently loaded model, if any
    pub async fn current_model(&self) -> Result<Option<String>, ApiError> {
        let response = self
            .authorize(self.http.get(self.endpoint("/v1/model")))
            .send()
            .await?;
        if !response.status().is_success() {
            // The server answers 4xx when nothing is loaded
            return Ok(None);
        }
        let model: ModelDescriptor = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedStream(e.to_string()))?;
        Ok(Some(model.id))
    }

    /// GET `/v1/model/list` - available model ids, in server order
    pub async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_model_ids("/v1/model/list").await
    }

    /// GET `/v1/model/draft/list` - available draft models.
    ///
    /// The "no draft model" sentinel is prepended whenever the server
    /// offers any drafts, so the picker always has an opt-out entry.
    pub async fn list_draft_models(&self) -> Result<Vec<String>, ApiError> {
        let mut ids = self.fetch_model_ids("/v1/model/draft/list").await?;
        if !ids.is_empty() {
            ids.insert(0, NO_DRAFT_MODEL.to_string());
        }
        Ok(ids)
    }

    async fn fetch_model_ids(&self, path: &str) -> Result<Vec<String>, ApiError> {
        let response = self
            .authorize(self.http.get(self.endpoint(path)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Server {
                status: response.status(),
            });
        }
        let list: ModelList = response
            .json()
            .await
            .map_err(|e| ApiError::MalformedStream(e.to_string()))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    /// POST `/v1/model/load` - start loading a model.
    ///
    /// Returns the raw streaming line sequence for the load tracker.
    pub async fn load_model(&self, name: &str, config: &LoadConfig) -> Result<SseLines, ApiError> {
        tracing::info!("Loading model {}", name);
        let response = self
            .authorize(self.http.post(self.endpoint("/v1/model/load")))
            .json(&load_payload(name, config))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Server {
                status: response.status(),
            });
        }
        Ok(SseLines::new(response))
    }

    /// POST `/v1/model/unload` - unload the current model
    pub async fn unload_model(&self) -> Result<(), ApiError> {
        tracing::info!("Unloading model");
        let response = self
            .authorize(self.http.post(self.endpoint("/v1/model/unload")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Server {
                status: response.status(),
            });
        }
        Ok(())
    }

    /// POST `/v1/completions` - submit a prompt.
    ///
    /// Returns the raw streaming line sequence for the completion decoder.
    pub async fn submit_completion(
        &self,
        prompt: &str,
        params: &SamplingParameters,
    ) -> Result<SseLines, ApiError> {
        let response = self
            .authorize(self.http.post(self.endpoint("/v1/completions")))
            .json(&completion_payload(prompt, params))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Server {
                status: response.status(),
            });
        }
        Ok(SseLines::new(response))
    }
}

/// Build the `/v1/model/load` body.
///
/// The server applies its own defaults for every `null`, so absent options
/// are sent explicitly rather than omitted. When auto-split is on the split
/// list is sent as `null`; the server must never see both.
fn load_payload(name: &str, config: &LoadConfig) -> Value {
    let gpu_split = if config.gpu_split_auto {
        Value::Null
    } else {
        json!(config.gpu_split)
    };
    let draft = config
        .draft_model
        .as_deref()
        .filter(|m| *m != NO_DRAFT_MODEL)
        .map(|m| {
            json!({
                "draft_model_name": m,
                "draft_rope_scale": config.draft_rope_scale,
                "draft_rope_alpha": config.draft_rope_alpha,
                "draft_cache_mode": null,
            })
        });

    json!({
        "name": name,
        "max_seq_len": config.max_seq_len,
        "override_base_seq_len": null,
        "cache_size": config.max_cache_size,
        "gpu_split_auto": config.gpu_split_auto,
        "autosplit_reserve": null,
        "gpu_split": gpu_split,
        "rope_scale": config.rope_scale,
        "rope_alpha": config.rope_alpha,
        "cache_mode": config.cache_mode.label(),
        "tensor_parallel": null,
        "chunk_size": null,
        "prompt_template": null,
        "num_experts_per_token": null,
        "fasttensors": null,
        "draft": draft,
        "skip_queue": false,
    })
}

/// Build the `/v1/completions` body
fn completion_payload(prompt: &str, params: &SamplingParameters) -> Value {
    json!({
        "prompt": prompt,
        "max_tokens": MAX_TOKENS,
        "stream": true,
        "add_bos_token": true,
        "temperature_last": true,
        "temperature": params.temperature,
        "top_k": params.top_k,
        "top_p": params.top_p,
        "top_a": params.top_a,
        "min_p": params.min_p,
        "tfs": params.tfs,
        "typical": params.typical_p,
        "frequency_penalty": params.frequency_penalty,
        "presence_penalty": params.presence_penalty,
        "repetition_penalty": params.repetition_penalty,
        "penalty_range": params.rep_pen_range,
        "repetition_decay": params.rep_pen_decay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::CacheMode;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ApiClient::new(&ConnectionConfig {
            url: "http://127.0.0.1:5000/".to_string(),
            api_key: String::new(),
        })
        .unwrap();
        assert_eq!(
            client.endpoint("/v1/model"),
            "http://127.0.0.1:5000/v1/model"
        );
    }

    #[test]
    fn test_load_payload_auto_split_sends_null_split() {
        let config = LoadConfig {
            gpu_split_auto: true,
            gpu_split: vec![20.0, 24.0],
            ..LoadConfig::default()
        };
        let payload = load_payload("llama", &config);
        assert_eq!(payload["gpu_split_auto"], true);
        assert!(payload["gpu_split"].is_null());
    }

    #[test]
    fn test_load_payload_manual_split() {
        let config = LoadConfig {
            gpu_split_auto: false,
            gpu_split: vec![0.5, 0.5],
            ..LoadConfig::default()
        };
        let payload = load_payload("llama", &config);
        assert_eq!(payload["gpu_split_auto"], false);
        assert_eq!(payload["gpu_split"], json!([0.5, 0.5]));
    }

    #[test]
    fn test_load_payload_absent_options_are_null() {
        let payload = load_payload("llama", &LoadConfig::default());
        assert_eq!(payload["name"], "llama");
        assert_eq!(payload["max_seq_len"], 4096);
        assert_eq!(payload["cache_mode"], "FP16");
        assert!(payload["cache_size"].is_null());
        assert!(payload["rope_scale"].is_null());
        assert!(payload["rope_alpha"].is_null());
        assert!(payload["tensor_parallel"].is_null());
        assert!(payload["draft"].is_null());
        assert_eq!(payload["skip_queue"], false);
    }

    #[test]
    fn test_load_payload_draft_object() {
        let config = LoadConfig {
            cache_mode: CacheMode::Q8,
            draft_model: Some("tiny-draft".to_string()),
            draft_rope_alpha: Some(2.0),
            ..LoadConfig::default()
        };
        let payload = load_payload("llama", &config);
        assert_eq!(payload["draft"]["draft_model_name"], "tiny-draft");
        assert_eq!(payload["draft"]["draft_rope_alpha"], 2.0);
        assert!(payload["draft"]["draft_rope_scale"].is_null());
    }

    #[test]
    fn test_load_payload_sentinel_means_no_draft() {
        let config = LoadConfig {
            draft_model: Some(NO_DRAFT_MODEL.to_string()),
            ..LoadConfig::default()
        };
        let payload = load_payload("llama", &config);
        assert!(payload["draft"].is_null());
    }

    #[test]
    fn test_completion_payload_fixed_fields() {
        let payload = completion_payload("Once upon", &SamplingParameters::default());
        assert_eq!(payload["prompt"], "Once upon");
        assert_eq!(payload["max_tokens"], 512);
        assert_eq!(payload["stream"], true);
        assert_eq!(payload["add_bos_token"], true);
        assert_eq!(payload["temperature_last"], true);
    }

    #[test]
    fn test_completion_payload_knob_names() {
        let params = SamplingParameters {
            typical_p: 0.75,
            rep_pen_range: 1024,
            rep_pen_decay: 512,
            ..SamplingParameters::default()
        };
        let payload = completion_payload("p", &params);
        // Wire names differ from the knob names for these three
        assert_eq!(payload["typical"], 0.75);
        assert_eq!(payload["penalty_range"], 1024);
        assert_eq!(payload["repetition_decay"], 512);
        assert!(payload.get("typical_p").is_none());
        assert!(payload.get("rep_pen_range").is_none());
    }
}
