use serde::{Deserialize, Serialize};

/// Plan for a whole deck, as returned by a provider or the offline generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub key_message: String,
    #[serde(default)]
    pub slides: Vec<SlideDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDescriptor {
    pub order: i32,
    pub title: String,
    #[serde(rename = "type", default = "default_slide_type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_prompt: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default = "default_visual_type")]
    pub visual_type: String,
}

fn default_slide_type() -> String {
    "content".to_string()
}

fn default_visual_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSuggestions {
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub visual_elements: Vec<String>,
    #[serde(default)]
    pub image_prompt: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub typography: String,
}

impl DesignSuggestions {
    pub fn new(layout: &str, visual_elements: &[&str], image_prompt: String, colors: &[&str], typography: &str) -> Self {
        DesignSuggestions {
            layout: layout.to_string(),
            visual_elements: visual_elements.iter().map(|s| s.to_string()).collect(),
            image_prompt,
            colors: colors.iter().map(|s| s.to_string()).collect(),
            typography: typography.to_string(),
        }
    }
}

/// Generated content for one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub speaker_notes: String,
    #[serde(default)]
    pub design_suggestions: Option<DesignSuggestions>,
    #[serde(default, alias = "aiImageNeeded")]
    pub image_needed: bool,
}

impl SlideDraft {
    pub fn image_prompt(&self) -> Option<&str> {
        self.design_suggestions
            .as_ref()
            .map(|d| d.image_prompt.as_str())
            .filter(|p| !p.trim().is_empty())
    }
}

/// Backends in fallback priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Groq,
    Anthropic,
    HuggingFace,
    Offline,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub provider: ProviderKind,
    pub available_providers: Vec<ProviderKind>,
    pub is_offline: bool,
}
