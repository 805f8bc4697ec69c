//! Text generation for decks: outlines, per-slide content and speaker notes.
//!
//! Hosted providers are tried in configured priority order (only the first is
//! used per call). With no provider configured, or when a provider call
//! fails, the offline generator answers instead. Only [`GenerationClient::outline`]
//! surfaces provider failures, so deck creation can record them.

pub mod offline;
pub mod parse;
pub mod providers;
pub mod types;

use reqwest::Client;
use std::time::Duration;

use crate::config::ProviderKeys;
use crate::errors::AppError;
use providers::{Provider, Sampling};
pub use types::*;

const SLIDE_SYSTEM_PROMPT: &str = r#"You are an expert presentation designer. Generate professional slide content in JSON format.
Return ONLY a valid JSON object with this exact structure:
{
  "title": "Compelling slide title (max 60 chars)",
  "content": "Well-structured content with bullet points using • symbol",
  "speakerNotes": "Detailed presenter notes with timing and key points",
  "designSuggestions": {
    "layout": "title-content",
    "visualElements": ["chart", "diagram", "photo"],
    "imagePrompt": "Description for image generation",
    "colors": ["blue", "green"],
    "typography": "modern"
  },
  "aiImageNeeded": true
}
Make each slide unique and specific to the topic. Include concrete examples, statistics, or case studies when relevant, and actionable insights specific to the slide."#;

const OUTLINE_SYSTEM_PROMPT: &str = r#"You are a presentation expert. Create ONLY valid JSON for a presentation outline.
Use this exact structure:
{
  "title": "Presentation Title",
  "description": "Brief description",
  "theme": "professional|creative|technical",
  "targetAudience": "Target audience",
  "keyMessage": "Main message",
  "slides": [
    {
      "order": 1,
      "title": "Slide Title",
      "type": "intro|content|conclusion",
      "description": "Slide description",
      "contentPrompt": "Detailed content prompt",
      "estimatedTime": "X minutes",
      "visualType": "image|chart|text|diagram"
    }
  ]
}
Return ONLY the JSON object, no additional text or explanation."#;

const SLIDE_SAMPLING: Sampling = Sampling { temperature: 0.8, max_tokens: 1200 };
const OUTLINE_SAMPLING: Sampling = Sampling { temperature: 0.7, max_tokens: 2000 };
const NOTES_SAMPLING: Sampling = Sampling { temperature: 0.6, max_tokens: 800 };

/// First `max` characters of `text`, with `...` appended when cut.
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

pub struct GenerationClient {
    http: Client,
    providers: Vec<Provider>,
}

impl GenerationClient {
    pub fn new(keys: &ProviderKeys, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_providers(
            Client::builder().timeout(timeout).build()?,
            Provider::from_keys(keys),
        ))
    }

    pub fn with_providers(http: Client, providers: Vec<Provider>) -> Self {
        GenerationClient { http, providers }
    }

    /// A client that never leaves the process.
    pub fn offline() -> Self {
        Self::with_providers(Client::new(), Vec::new())
    }

    fn active(&self) -> Option<&Provider> {
        self.providers.first()
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            provider: self.active().map_or(ProviderKind::Offline, Provider::kind),
            available_providers: self.providers.iter().map(Provider::kind).collect(),
            is_offline: self.providers.is_empty(),
        }
    }

    /// Outline for `topic`. Provider failures are returned to the caller.
    /// Unlike `outline_or_offline`, this does not fall back, so the deck
    /// builder can store its four-slide fallback deck and a FAILED audit entry.
    pub async fn outline(&self, topic: &str, count: usize) -> Result<Outline, AppError> {
        let provider = match self.active() {
            Some(p) if p.supports_structured_output() => p,
            _ => return Ok(offline::outline(topic, count)),
        };
        log::info!("Generating outline with {} provider", provider.kind().as_str());
        let user = format!("Create a {count}-slide presentation outline about: {topic}. Return only valid JSON.");
        let completion = provider
            .complete(&self.http, OUTLINE_SYSTEM_PROMPT, &user, OUTLINE_SAMPLING)
            .await?;
        parse::parse_outline(&completion)
    }

    /// Outline that degrades to the offline generator instead of failing.
    pub async fn outline_or_offline(&self, topic: &str, count: usize) -> Outline {
        match self.outline(topic, count).await {
            Ok(outline) => outline,
            Err(e) => {
                log::warn!("Outline generation failed ({}), using offline outline", e);
                offline::outline(topic, count)
            }
        }
    }

    /// Content for one slide. Never fails.
    pub async fn slide_content(&self, prompt: &str, context: Option<&str>) -> SlideDraft {
        let Some(provider) = self.active() else {
            return offline::slide_content(prompt);
        };
        match self.slide_from_provider(provider, prompt, context).await {
            Ok(draft) => draft,
            Err(e) => {
                log::warn!(
                    "{} slide generation failed ({}), using offline content",
                    provider.kind().as_str(),
                    e
                );
                offline::slide_content(prompt)
            }
        }
    }

    async fn slide_from_provider(
        &self,
        provider: &Provider,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<SlideDraft, AppError> {
        let mut user = format!(
            "Create professional slide content about: {prompt}\n\nMake this slide unique and avoid generic content. Include specific details and examples relevant to this particular aspect of the topic."
        );
        if let Some(context) = context {
            user.push_str(&format!("\nContext: {context}"));
        }
        let completion = provider
            .complete(&self.http, SLIDE_SYSTEM_PROMPT, &user, SLIDE_SAMPLING)
            .await?;

        if provider.supports_structured_output() {
            parse::parse_slide_draft(&completion, prompt)
        } else {
            Ok(insights_draft(prompt, &completion))
        }
    }

    /// Reworked speaker notes, or `notes` unchanged when no provider can help.
    pub async fn improve_notes(&self, notes: &str, audience: Option<&str>) -> String {
        let Some(provider) = self.active().filter(|p| p.supports_structured_output()) else {
            return notes.to_string();
        };
        let mut system = "You are an expert public speaking coach. Improve and expand speaker notes to help the presenter deliver effectively.".to_string();
        if let Some(audience) = audience.map(str::trim).filter(|a| !a.is_empty()) {
            system.push_str(&format!("\nThe target audience is: {audience}"));
        }
        system.push_str("\nReturn improved speaker notes as plain text.");
        let user = format!("Improve these speaker notes: {notes}");

        match provider.complete(&self.http, &system, &user, NOTES_SAMPLING).await {
            Ok(improved) if !improved.trim().is_empty() => improved.trim().to_string(),
            Ok(_) => notes.to_string(),
            Err(e) => {
                log::warn!("Speaker notes improvement failed ({}), keeping original", e);
                notes.to_string()
            }
        }
    }
}

/// Free-text completions are folded into a fixed bullet template.
fn insights_draft(prompt: &str, generated: &str) -> SlideDraft {
    let overview = if generated.trim().is_empty() { prompt } else { generated.trim() };
    SlideDraft {
        title: format!("Professional Insights: {}", clip(prompt, 40)),
        content: format!(
            "• Overview: {}\n• Key Points: Strategic analysis and recommendations\n• Implementation: Action steps for success\n• Metrics: Success indicators and KPIs",
            clip(overview, 100)
        ),
        speaker_notes: format!(
            "This slide covers important aspects of {prompt}. Engage your audience with specific examples and encourage questions."
        ),
        design_suggestions: Some(DesignSuggestions::new(
            "title-content",
            &["diagram", "chart"],
            format!("Professional illustration about {prompt}"),
            &["blue", "gray"],
            "modern",
        )),
        image_needed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_groq() -> GenerationClient {
        GenerationClient::with_providers(
            Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .expect("client"),
            vec![Provider::Groq {
                api_key: "key".into(),
                base_url: "http://127.0.0.1:9".into(),
            }],
        )
    }

    #[test]
    fn clip_counts_characters() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("exactly ten", 11), "exactly ten");
        assert_eq!(clip("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn offline_status_reports_no_providers() {
        let status = GenerationClient::offline().status();
        assert_eq!(status.provider, ProviderKind::Offline);
        assert!(status.available_providers.is_empty());
        assert!(status.is_offline);
        let json = serde_json::to_value(&status).expect("serialize");
        assert_eq!(json["provider"], "offline");
        assert_eq!(json["isOffline"], true);
    }

    #[tokio::test]
    async fn offline_outline_never_fails() {
        let outline = GenerationClient::offline().outline("renewable energy", 8).await.expect("outline");
        assert_eq!(outline.slides.len(), 8);
    }

    #[tokio::test]
    async fn failing_provider_surfaces_outline_error() {
        let client = unreachable_groq();
        assert!(matches!(client.outline("rust", 8).await, Err(AppError::Upstream(_))));
        assert_eq!(client.outline_or_offline("rust", 3).await.slides.len(), 3);
    }

    #[tokio::test]
    async fn failing_provider_falls_back_for_slides_and_notes() {
        let client = unreachable_groq();
        let draft = client.slide_content("Quarterly marketing review", None).await;
        assert_eq!(draft.title, "Digital Marketing Performance Dashboard");
        assert_eq!(client.improve_notes("Say hello", Some("execs")).await, "Say hello");
    }

    #[test]
    fn insights_template_wraps_generated_text() {
        let draft = insights_draft("cloud costs", "Costs rise with scale.");
        assert_eq!(draft.title, "Professional Insights: cloud costs");
        assert!(draft.content.starts_with("• Overview: Costs rise with scale."));
        assert!(draft.image_needed);
    }
}
