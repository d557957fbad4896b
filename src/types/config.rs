//! Configuration types
//!
//! Connection and model-load configuration structures.

use serde::{Deserialize, Serialize};

/// Connection to the remote inference server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the server, e.g. `http://127.0.0.1:5000`
    #[serde(default)]
    pub url: String,
    /// Static API key forwarded with every request
    #[serde(default)]
    pub api_key: String,
}

/// KV-cache quantization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheMode {
    #[serde(rename = "FP16")]
    Fp16,
    Q8,
    Q6,
    Q4,
}

impl CacheMode {
    /// All modes, in the order the server documents them
    pub const ALL: [CacheMode; 4] = [CacheMode::Fp16, CacheMode::Q8, CacheMode::Q6, CacheMode::Q4];

    pub fn label(&self) -> &'static str {
        match self {
            CacheMode::Fp16 => "FP16",
            CacheMode::Q8 => "Q8",
            CacheMode::Q6 => "Q6",
            CacheMode::Q4 => "Q4",
        }
    }

    pub fn from_label(label: &str) -> Option<CacheMode> {
        CacheMode::ALL.iter().copied().find(|m| m.label() == label)
    }
}

impl Default for CacheMode {
    fn default() -> Self {
        CacheMode::Fp16
    }
}

/// Model load-time parameters
///
/// Persisted with the same document keys the panel has always written,
/// so an existing `load-config.json` keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Context length the model is loaded with
    #[serde(rename = "Max Seq Len", default = "default_max_seq_len")]
    pub max_seq_len: u32,
    /// Let the server place layers across devices itself
    #[serde(rename = "GPU Split Auto", default = "default_gpu_split_auto")]
    pub gpu_split_auto: bool,
    /// Per-device memory split in GB, used only when auto-split is off
    #[serde(rename = "GPU Split", default)]
    pub gpu_split: Vec<f32>,
    /// KV-cache quantization
    #[serde(rename = "Cache Mode", default)]
    pub cache_mode: CacheMode,
    #[serde(rename = "Max Cache Size", default)]
    pub max_cache_size: Option<u32>,
    #[serde(rename = "Rope Scale", default)]
    pub rope_scale: Option<f32>,
    #[serde(rename = "Rope Alpha", default)]
    pub rope_alpha: Option<f32>,
    #[serde(rename = "Draft Rope Scale", default)]
    pub draft_rope_scale: Option<f32>,
    #[serde(rename = "Draft Rope Alpha", default)]
    pub draft_rope_alpha: Option<f32>,
    /// Speculative-decoding draft model, `None` to run without one
    #[serde(rename = "Draft Model", default)]
    pub draft_model: Option<String>,
}

fn default_max_seq_len() -> u32 {
    4096
}

fn default_gpu_split_auto() -> bool {
    true
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_seq_len: default_max_seq_len(),
            gpu_split_auto: default_gpu_split_auto(),
            gpu_split: Vec::new(),
            cache_mode: CacheMode::default(),
            max_cache_size: None,
            rope_scale: None,
            rope_alpha: None,
            draft_rope_scale: None,
            draft_rope_alpha: None,
            draft_model: None,
        }
    }
}

/// Result of parsing the GPU-split text field
#[derive(Debug, Clone, PartialEq)]
pub enum GpuSplit {
    /// Blank input: let the server auto-split
    Auto,
    /// Explicit per-device split
    Manual(Vec<f32>),
}

/// Parse the comma-separated GPU-split field.
///
/// Blank input means auto-split. Anything else must be a comma-separated
/// list of numbers; a bad entry rejects the whole input.
pub fn parse_gpu_split(input: &str) -> Result<GpuSplit, String> {
    if input.trim().is_empty() {
        return Ok(GpuSplit::Auto);
    }

    let mut split = Vec::new();
    for part in input.split(',') {
        let value: f32 = part
            .trim()
            .parse()
            .map_err(|_| "Invalid input: enter a comma-separated list of numbers.".to_string())?;
        split.push(value);
    }
    Ok(GpuSplit::Manual(split))
}

impl LoadConfig {
    /// Apply the GPU-split text field to this config.
    ///
    /// Blank input switches to auto-split and keeps the previously saved
    /// list; invalid input leaves the config untouched.
    pub fn apply_gpu_split(&mut self, input: &str) -> Result<(), String> {
        match parse_gpu_split(input)? {
            GpuSplit::Auto => self.gpu_split_auto = true,
            GpuSplit::Manual(split) => {
                self.gpu_split_auto = false;
                self.gpu_split = split;
            }
        }
        Ok(())
    }

    /// The GPU-split list rendered back into the text field
    pub fn gpu_split_text(&self) -> String {
        if self.gpu_split_auto {
            String::new()
        } else {
            self.gpu_split
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults() {
        let config = LoadConfig::default();
        assert_eq!(config.max_seq_len, 4096);
        assert!(config.gpu_split_auto);
        assert!(config.gpu_split.is_empty());
        assert_eq!(config.cache_mode, CacheMode::Fp16);
        assert!(config.draft_model.is_none());
    }

    #[test]
    fn test_load_config_document_keys() {
        let config = LoadConfig::default();
        let value = serde_json::to_value(&config).unwrap();
        let doc = value.as_object().unwrap();
        assert!(doc.contains_key("Max Seq Len"));
        assert!(doc.contains_key("GPU Split Auto"));
        assert!(doc.contains_key("Cache Mode"));
        assert_eq!(doc["Cache Mode"], "FP16");
    }

    #[test]
    fn test_load_config_round_trip() {
        let mut config = LoadConfig::default();
        config.max_seq_len = 8192;
        config.gpu_split_auto = false;
        config.gpu_split = vec![20.0, 24.0];
        config.cache_mode = CacheMode::Q4;
        config.draft_model = Some("tiny-draft".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let loaded: LoadConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.max_seq_len, 8192);
        assert!(!loaded.gpu_split_auto);
        assert_eq!(loaded.gpu_split, vec![20.0, 24.0]);
        assert_eq!(loaded.cache_mode, CacheMode::Q4);
        assert_eq!(loaded.draft_model.as_deref(), Some("tiny-draft"));
    }

    #[test]
    fn test_load_config_partial_document() {
        // Older documents may miss fields entirely
        let loaded: LoadConfig = serde_json::from_str(r#"{"Max Seq Len": 2048}"#).unwrap();
        assert_eq!(loaded.max_seq_len, 2048);
        assert!(loaded.gpu_split_auto);
        assert_eq!(loaded.cache_mode, CacheMode::Fp16);
    }

    #[test]
    fn test_parse_gpu_split_manual() {
        assert_eq!(
            parse_gpu_split("0.5, 0.5").unwrap(),
            GpuSplit::Manual(vec![0.5, 0.5])
        );
        assert_eq!(
            parse_gpu_split("20,24").unwrap(),
            GpuSplit::Manual(vec![20.0, 24.0])
        );
    }

    #[test]
    fn test_parse_gpu_split_blank_is_auto() {
        assert_eq!(parse_gpu_split("").unwrap(), GpuSplit::Auto);
        assert_eq!(parse_gpu_split("   ").unwrap(), GpuSplit::Auto);
    }

    #[test]
    fn test_parse_gpu_split_invalid() {
        assert!(parse_gpu_split("a,b").is_err());
        assert!(parse_gpu_split("0.5,,1").is_err());
    }

    #[test]
    fn test_apply_gpu_split_blank_keeps_saved_list() {
        let mut config = LoadConfig {
            gpu_split_auto: false,
            gpu_split: vec![1.0, 2.0],
            ..LoadConfig::default()
        };
        config.apply_gpu_split("").unwrap();
        assert!(config.gpu_split_auto);
        assert_eq!(config.gpu_split, vec![1.0, 2.0]);
    }

    #[test]
    fn test_apply_gpu_split_invalid_leaves_config_untouched() {
        let mut config = LoadConfig {
            gpu_split_auto: false,
            gpu_split: vec![1.0, 2.0],
            ..LoadConfig::default()
        };
        assert!(config.apply_gpu_split("a,b").is_err());
        assert!(!config.gpu_split_auto);
        assert_eq!(config.gpu_split, vec![1.0, 2.0]);
    }

    #[test]
    fn test_cache_mode_labels() {
        for mode in CacheMode::ALL {
            assert_eq!(CacheMode::from_label(mode.label()), Some(mode));
        }
        assert_eq!(CacheMode::from_label("Q5"), None);
    }
}
