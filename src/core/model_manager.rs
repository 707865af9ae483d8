//! Model selection for flows
//!
//! Flows ask for a model tier rather than a concrete id; this module maps
//! the tier to the configured model and normalizes prefixed identifiers.

use crate::core::config::Config;

/// Kind of model a flow needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Text and structured JSON generation
    Text,
    /// Image generation
    Image,
}

/// Maps model tiers to configured model ids
pub struct ModelManager {
    text_model: String,
    image_model: String,
}

impl ModelManager {
    /// Create a new ModelManager with the given configuration
    pub fn new(config: &Config) -> Self {
        Self {
            text_model: normalize_model_id(&config.text_model),
            image_model: normalize_model_id(&config.image_model),
        }
    }

    /// Model id to use for the given tier
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Text => &self.text_model,
            ModelTier::Image => &self.image_model,
        }
    }
}

/// Strip plugin and resource prefixes from a model id
///
/// `googleai/gemini-2.0-flash` and `models/gemini-2.0-flash` both become
/// `gemini-2.0-flash`. Ids of other vendors behind a gateway
/// (`openai/gpt-4o`) are left untouched.
pub fn normalize_model_id(model: &str) -> String {
    let model = model.trim();
    let model = model.strip_prefix("googleai/").unwrap_or(model);
    let model = model.strip_prefix("models/").unwrap_or(model);
    model.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_config;

    #[test]
    fn test_normalize_genkit_prefix() {
        assert_eq!(
            normalize_model_id("googleai/gemini-2.0-flash"),
            "gemini-2.0-flash"
        );
        assert_eq!(normalize_model_id("models/gemini-1.5-pro"), "gemini-1.5-pro");
        assert_eq!(normalize_model_id(" gemini-2.0-flash "), "gemini-2.0-flash");
    }

    #[test]
    fn test_passthrough_gateway_model() {
        assert_eq!(normalize_model_id("openai/gpt-4o"), "openai/gpt-4o");
    }

    #[test]
    fn test_model_for_tier() {
        let mut config = test_config();
        config.text_model = "googleai/gemini-2.0-flash".to_string();
        let manager = ModelManager::new(&config);
        assert_eq!(manager.model_for(ModelTier::Text), "gemini-2.0-flash");
        assert_eq!(
            manager.model_for(ModelTier::Image),
            "gemini-2.0-flash-preview-image-generation"
        );
    }
}
