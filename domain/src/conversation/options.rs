//! Per-send model parameters and the limits the inference service enforces.

use serde::{Deserialize, Serialize};

/// Longest message the service accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 10_000;

/// Largest `max_tokens` the service accepts.
pub const MAX_TOKENS_LIMIT: u32 = 4096;

/// Accepted sampling temperature range (inclusive).
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 2.0);

/// Model and sampling options for one send.
///
/// `None` fields are left to the server's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendOptions {
    pub model_name: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl SendOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Check the options against the service limits.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.temperature {
            let (min, max) = TEMPERATURE_RANGE;
            if !(min..=max).contains(&t) {
                return Err(format!("temperature {t} outside {min}..={max}"));
            }
        }
        if let Some(n) = self.max_tokens
            && !(1..=MAX_TOKENS_LIMIT).contains(&n)
        {
            return Err(format!("max_tokens {n} outside 1..={MAX_TOKENS_LIMIT}"));
        }
        if let Some(model) = &self.model_name
            && model.trim().is_empty()
        {
            return Err("model name is empty".to_string());
        }
        Ok(())
    }
}
