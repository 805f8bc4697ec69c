//! Presentation creation pipeline.
//!
//! Validation and owner resolution happen first. AI-assisted decks are then
//! planned entirely in memory (outline, per-slide content, optional images,
//! layout) and written in a single transaction together with the generation
//! audit, so a failed request never leaves a half-built deck behind.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::generation::{GenerationClient, Outline, SlideDescriptor, SlideDraft};
use crate::images::ImageFinder;
use crate::models::content::{ImageObject, SlideDocument, SlideObject, TextObject};
use crate::models::generation_audit::{AuditStatus, KIND_PRESENTATION_OUTLINE, NewAudit};
use crate::models::presentation::{self, CreatePresentationRequest, NewPresentation, Presentation};
use crate::models::slide::NewSlide;
use crate::models::user;

const TITLE_COLOR: &str = "#1a202c";
const BODY_COLOR: &str = "#2d3748";

/// Limits applied while planning generated decks.
#[derive(Debug, Clone, Copy)]
pub struct DeckSettings {
    pub outline_slide_count: usize,
    pub max_generated_slides: usize,
}

impl Default for DeckSettings {
    fn default() -> Self {
        DeckSettings {
            outline_slide_count: 8,
            max_generated_slides: 10,
        }
    }
}

/// Slides and audit record for a deck that has not been stored yet.
#[derive(Debug, Clone)]
pub struct DeckPlan {
    pub slides: Vec<NewSlide>,
    pub audit: Option<NewAudit>,
}

impl DeckPlan {
    fn empty() -> Self {
        DeckPlan { slides: Vec::new(), audit: None }
    }
}

pub struct DeckBuilder<'a> {
    generation: &'a GenerationClient,
    images: &'a ImageFinder,
    settings: DeckSettings,
}

impl<'a> DeckBuilder<'a> {
    pub fn new(generation: &'a GenerationClient, images: &'a ImageFinder, settings: DeckSettings) -> Self {
        DeckBuilder { generation, images, settings }
    }

    /// Validate, resolve the owner, plan and persist a new presentation.
    pub async fn create(
        &self,
        pool: &PgPool,
        subject: &str,
        request: &CreatePresentationRequest,
    ) -> Result<Presentation, AppError> {
        let new = NewPresentation::from_request(request)?;
        let owner = user::find_or_create(pool, subject).await?;

        let topic = request.topic.as_deref().map(str::trim).filter(|t| !t.is_empty());
        let plan = match topic {
            Some(topic) if request.use_ai => self.plan(&new.title, topic, request.use_images).await,
            _ => DeckPlan::empty(),
        };

        presentation::create_deck(pool, owner.id, &new, &plan.slides, plan.audit.as_ref()).await
    }

    /// Build the slides for `topic`. An outline failure produces the
    /// four-slide fallback deck and a FAILED audit.
    pub async fn plan(&self, title: &str, topic: &str, use_images: bool) -> DeckPlan {
        log::info!("Starting AI presentation generation for topic: {}", topic);
        let outline = match self.generation.outline(topic, self.settings.outline_slide_count).await {
            Ok(outline) => outline,
            Err(e) => {
                log::warn!("Outline generation failed for '{}': {}", topic, e);
                return DeckPlan {
                    slides: fallback_slides(topic),
                    audit: Some(NewAudit {
                        kind: KIND_PRESENTATION_OUTLINE,
                        prompt: topic.to_string(),
                        result: serde_json::json!({ "error": e.to_string() }),
                        status: AuditStatus::Failed,
                    }),
                };
            }
        };

        let total = outline.slides.len();
        let mut slides = Vec::with_capacity(total.min(self.settings.max_generated_slides));
        for (index, descriptor) in outline.slides.iter().take(self.settings.max_generated_slides).enumerate() {
            let prompt = slide_prompt(descriptor, topic, index, total);
            let context = slide_context(title, descriptor);
            let draft = self.generation.slide_content(&prompt, Some(&context)).await;

            let document = if use_images {
                let image = match draft.image_prompt() {
                    Some(image_prompt) => self.images.image(image_prompt).await,
                    None => self.images.image(&draft.title).await,
                };
                visual_layout(&draft, Some(&image))
            } else {
                text_layout(&draft)
            };

            log::info!("Planned slide {} of {}: \"{}\"", index + 1, total, draft.title);
            slides.push(NewSlide {
                order: Some(descriptor.order),
                title: Some(draft.title.clone()),
                content: Some(document.to_value()),
                notes: Some(speaker_notes(&draft)),
                duration: None,
            });
        }

        DeckPlan {
            slides,
            audit: Some(NewAudit {
                kind: KIND_PRESENTATION_OUTLINE,
                prompt: topic.to_string(),
                result: outline_json(&outline),
                status: AuditStatus::Completed,
            }),
        }
    }
}

fn outline_json(outline: &Outline) -> serde_json::Value {
    serde_json::to_value(outline).unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
}

fn speaker_notes(draft: &SlideDraft) -> String {
    if draft.speaker_notes.trim().is_empty() {
        format!("Speaker notes for {}", draft.title)
    } else {
        draft.speaker_notes.clone()
    }
}

/// Per-slide prompt that keeps generated slides distinct from each other.
pub fn slide_prompt(descriptor: &SlideDescriptor, topic: &str, index: usize, total: usize) -> String {
    format!(
        "{}. Focus on {}. This is slide {} of {} in a presentation about {}. Make this content unique and specific to the \"{}\" topic. Include relevant details, examples, and actionable insights.",
        descriptor.content_prompt,
        descriptor.description,
        index + 1,
        total,
        topic,
        descriptor.title
    )
}

pub fn slide_context(title: &str, descriptor: &SlideDescriptor) -> String {
    format!(
        "Presentation: {}. Slide type: {}. Visual type: {}",
        title, descriptor.kind, descriptor.visual_type
    )
}

fn body_text(draft: &SlideDraft) -> String {
    if draft.content.trim().is_empty() {
        format!("Content for {}", draft.title)
    } else {
        draft.content.clone()
    }
}

/// Title and body only.
pub fn text_layout(draft: &SlideDraft) -> SlideDocument {
    SlideDocument::new(vec![
        SlideObject::Textbox(TextObject::new(&draft.title, 50.0, 50.0, 32.0).bold().size(700.0, None)),
        SlideObject::Textbox(TextObject::new(body_text(draft), 50.0, 120.0, 16.0).size(700.0, Some(300.0))),
    ])
}

/// Title over an image column and a text column, or a wide text block when
/// no image is available.
pub fn visual_layout(draft: &SlideDraft, image: Option<&str>) -> SlideDocument {
    let mut objects = vec![SlideObject::Textbox(
        TextObject::new(&draft.title, 50.0, 30.0, 28.0)
            .bold()
            .size(700.0, None)
            .fill(TITLE_COLOR),
    )];
    match image {
        Some(src) => {
            objects.push(SlideObject::Image(ImageObject::new(src, 50.0, 100.0, 300.0, 200.0)));
            objects.push(SlideObject::Textbox(
                TextObject::new(body_text(draft), 370.0, 100.0, 16.0)
                    .size(380.0, Some(400.0))
                    .fill(BODY_COLOR),
            ));
        }
        None => objects.push(SlideObject::Textbox(
            TextObject::new(body_text(draft), 50.0, 120.0, 16.0)
                .size(700.0, Some(400.0))
                .fill(BODY_COLOR),
        )),
    }
    SlideDocument::new(objects)
}

const FALLBACK_SLIDES: [(&str, &str); 4] = [
    (
        "Introduction",
        "Welcome to your presentation about {topic}. This slide was created as a fallback when AI generation failed.",
    ),
    (
        "Overview",
        "This presentation covers key aspects of {topic}. You can edit these slides to add your own content.",
    ),
    (
        "Main Content",
        "Add your main content about {topic} here. Use the editor to customize this slide.",
    ),
    (
        "Conclusion",
        "Thank you for your attention. This concludes the presentation on {topic}.",
    ),
];

/// Editable starter deck used when outline generation fails.
pub fn fallback_slides(topic: &str) -> Vec<NewSlide> {
    FALLBACK_SLIDES
        .iter()
        .enumerate()
        .map(|(index, (title, body))| {
            let document = SlideDocument::new(vec![
                SlideObject::Textbox(TextObject::new(*title, 50.0, 50.0, 32.0).bold()),
                SlideObject::Textbox(
                    TextObject::new(body.replace("{topic}", topic), 50.0, 120.0, 16.0).size(500.0, None),
                ),
            ]);
            NewSlide {
                order: Some(index as i32 + 1),
                title: Some(title.to_string()),
                content: Some(document.to_value()),
                notes: Some(format!("Speaker notes for {}.", title.to_lowercase())),
                duration: None,
            }
        })
        .collect()
}
