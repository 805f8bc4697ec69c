//! Turning raw completion text into typed drafts and outlines.

use crate::errors::AppError;
use super::clip;
use super::types::{DesignSuggestions, Outline, SlideDraft};

const MIN_IMAGE_PROMPT_LEN: usize = 20;
const MAX_FALLBACK_LINES: usize = 6;

/// Remove C0/C1 control characters that models like to leak into JSON.
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c as u32, 0x00..=0x1F | 0x7F..=0x9F))
        .collect::<String>()
        .trim()
        .to_string()
}

/// The outermost `{ ... }` span, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a slide completion. JSON payloads are decoded; free text becomes a
/// bullet list built from its first lines.
pub fn parse_slide_draft(completion: &str, prompt: &str) -> Result<SlideDraft, AppError> {
    let cleaned = strip_control_chars(completion);
    match extract_json_object(&cleaned) {
        Some(json) => {
            let mut draft: SlideDraft = serde_json::from_str(json)
                .map_err(|e| AppError::Upstream(format!("Malformed slide JSON: {e}")))?;
            draft.image_needed = true;
            let fallback_prompt = format!(
                "Professional illustration for {} with modern business elements",
                draft.title
            );
            match draft.design_suggestions.as_mut() {
                Some(design) if design.image_prompt.chars().count() >= MIN_IMAGE_PROMPT_LEN => {}
                Some(design) => design.image_prompt = fallback_prompt,
                None => {
                    draft.design_suggestions = Some(DesignSuggestions::new(
                        "title-content",
                        &[],
                        fallback_prompt,
                        &[],
                        "modern",
                    ))
                }
            }
            Ok(draft)
        }
        None => Ok(bullets_from_text(completion, prompt)),
    }
}

fn bullets_from_text(completion: &str, prompt: &str) -> SlideDraft {
    let content = completion
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_FALLBACK_LINES)
        .map(|line| format!("• {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    SlideDraft {
        title: clip(prompt, 40),
        content,
        speaker_notes: format!(
            "This presentation covers {prompt}. Focus on engaging your audience with concrete examples and encourage questions throughout."
        ),
        design_suggestions: Some(DesignSuggestions::new(
            "title-content",
            &["diagram", "chart"],
            format!("Professional business illustration about {prompt}"),
            &["blue", "gray"],
            "modern",
        )),
        image_needed: true,
    }
}

/// Parse an outline completion. An outline without slides is rejected.
pub fn parse_outline(completion: &str) -> Result<Outline, AppError> {
    let cleaned = strip_control_chars(completion);
    let json = extract_json_object(&cleaned)
        .ok_or_else(|| AppError::Upstream("No JSON found in outline response".to_string()))?;
    let outline: Outline =
        serde_json::from_str(json).map_err(|e| AppError::Upstream(format!("Malformed outline JSON: {e}")))?;
    if outline.slides.is_empty() {
        return Err(AppError::Upstream("Outline contained no slides".to_string()));
    }
    Ok(outline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(strip_control_chars("\u{0}{\"a\":\n1}\u{9f} "), "{\"a\":1}");
    }

    #[test]
    fn json_object_is_found_inside_chatter() {
        let text = "Sure! Here it is: {\"title\": \"X\", \"nested\": {\"a\": 1}} Hope this helps.";
        assert_eq!(
            extract_json_object(text),
            Some("{\"title\": \"X\", \"nested\": {\"a\": 1}}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn structured_draft_gets_image_defaults() {
        let completion = r#"{"title":"Edge Caching","content":"• CDN","speakerNotes":"Talk","designSuggestions":{"layout":"two-column","visualElements":[],"imagePrompt":"cache","colors":[],"typography":"modern"},"aiImageNeeded":false}"#;
        let draft = parse_slide_draft(completion, "caching").expect("draft");
        assert!(draft.image_needed);
        assert_eq!(
            draft.image_prompt(),
            Some("Professional illustration for Edge Caching with modern business elements")
        );
        assert_eq!(draft.speaker_notes, "Talk");
    }

    #[test]
    fn long_image_prompt_is_kept() {
        let completion = r#"{"title":"T","content":"c","designSuggestions":{"imagePrompt":"A wide shot of a modern data center at dusk"}}"#;
        let draft = parse_slide_draft(completion, "p").expect("draft");
        assert_eq!(draft.image_prompt(), Some("A wide shot of a modern data center at dusk"));
    }

    #[test]
    fn free_text_becomes_six_bullets() {
        let completion = "one\n\ntwo\nthree\nfour\nfive\nsix\nseven";
        let draft = parse_slide_draft(completion, "A very long prompt that goes on and on about things").expect("draft");
        assert_eq!(draft.content.lines().count(), 6);
        assert!(draft.content.starts_with("• one"));
        assert!(!draft.content.contains("seven"));
        assert_eq!(draft.title, "A very long prompt that goes on and on a...");
    }

    #[test]
    fn malformed_json_is_an_upstream_error() {
        assert!(matches!(
            parse_slide_draft("{\"title\": }", "p"),
            Err(AppError::Upstream(_))
        ));
    }

    #[test]
    fn outline_requires_slides() {
        assert!(matches!(parse_outline(r#"{"title":"Empty","slides":[]}"#), Err(AppError::Upstream(_))));
        assert!(matches!(parse_outline("no json"), Err(AppError::Upstream(_))));

        let outline = parse_outline(
            r#"Outline: {"title":"Rust","slides":[{"order":1,"title":"Why Rust","type":"intro","contentPrompt":"Why Rust","visualType":"image"}]}"#,
        )
        .expect("outline");
        assert_eq!(outline.slides.len(), 1);
        assert_eq!(outline.slides[0].kind, "intro");
        assert_eq!(outline.slides[0].visual_type, "image");
    }
}
