//! Sampling parameters
//!
//! The tunable sampling knobs sent with every completion request.
//! Every field has a default so a missing key never fails a request.

use serde::{Deserialize, Serialize};

/// Sampling parameters for text generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParameters {
    /// Softmax temperature (0.0 - 5.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Top-k sampling, 0 disables it (0 - 200)
    #[serde(default)]
    pub top_k: u32,
    /// Nucleus sampling threshold (0.0 - 1.0)
    #[serde(default = "default_one")]
    pub top_p: f32,
    /// Typical-p sampling (0.0 - 1.0)
    #[serde(default = "default_one")]
    pub typical_p: f32,
    /// Minimum token probability relative to the top token (0.0 - 1.0)
    #[serde(default)]
    pub min_p: f32,
    /// Top-a sampling (0.0 - 1.0)
    #[serde(default)]
    pub top_a: f32,
    /// Tail-free sampling (0.0 - 1.0)
    #[serde(default = "default_one")]
    pub tfs: f32,
    /// Multiplicative repetition penalty (1.0 - 3.0)
    #[serde(default = "default_one")]
    pub repetition_penalty: f32,
    /// How many recent tokens the repetition penalty covers (0 - 204800)
    #[serde(default)]
    pub rep_pen_range: u32,
    /// Decay window for the repetition penalty (0 - 204800)
    #[serde(default)]
    pub rep_pen_decay: u32,
    /// Additive frequency penalty (-2.0 - 2.0)
    #[serde(default)]
    pub frequency_penalty: f32,
    /// Additive presence penalty (-2.0 - 2.0)
    #[serde(default)]
    pub presence_penalty: f32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_one() -> f32 {
    1.0
}

impl Default for SamplingParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 0,
            top_p: 1.0,
            typical_p: 1.0,
            min_p: 0.0,
            top_a: 0.0,
            tfs: 1.0,
            repetition_penalty: 1.0,
            rep_pen_range: 0,
            rep_pen_decay: 0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl SamplingParameters {
    /// Clamp every knob into its documented range
    pub fn validate(&mut self) {
        self.temperature = self.temperature.clamp(0.0, 5.0);
        self.top_k = self.top_k.min(200);
        self.top_p = self.top_p.clamp(0.0, 1.0);
        self.typical_p = self.typical_p.clamp(0.0, 1.0);
        self.min_p = self.min_p.clamp(0.0, 1.0);
        self.top_a = self.top_a.clamp(0.0, 1.0);
        self.tfs = self.tfs.clamp(0.0, 1.0);
        self.repetition_penalty = self.repetition_penalty.clamp(1.0, 3.0);
        self.rep_pen_range = self.rep_pen_range.min(204800);
        self.rep_pen_decay = self.rep_pen_decay.min(204800);
        self.frequency_penalty = self.frequency_penalty.clamp(-2.0, 2.0);
        self.presence_penalty = self.presence_penalty.clamp(-2.0, 2.0);
    }
}
