//! Converts stored slide content into a structured view tree for
//! presentation mode. Pure and infallible: any input yields some view.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::models::content::{SlideDocument, TextObject};
use crate::models::presentation::PresentationDetail;

pub const NO_CONTENT_MESSAGE: &str = "No content available";
pub const UNSUPPORTED_MESSAGE: &str = "Unsupported content format";
pub const DEFAULT_TITLE: &str = "Slide Content";

const MAX_TITLE_LEN: usize = 80;
const TITLE_MIN_FONT_SIZE: f64 = 20.0;
const TITLE_MAX_TOP: f64 = 100.0;
const LONG_PARAGRAPH_LEN: usize = 80;
const MIN_SENTENCE_LEN: usize = 15;

static BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*(br|/p|/div|/li|/h[1-6])\s*/?\s*>").expect("valid regex"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s*class\s*=\s*"[^"]*""#).expect("valid regex"));
static BULLET_GLYPH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[•·▪▫◦‣⁃]\s*").expect("valid regex"));
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+").expect("valid regex"));
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,3})[.)]\s+(.*)$").expect("valid regex"));
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s*").expect("valid regex"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*|\*([^*\s][^*]*)\*").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum Span {
    Text(String),
    Strong(String),
    Emphasis(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
    Bullet { spans: Vec<Span> },
    Numbered { number: u32, spans: Vec<Span> },
    Paragraph { spans: Vec<Span> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlideView {
    Empty { message: String },
    Layout {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        blocks: Vec<Block>,
    },
    Text { title: String, blocks: Vec<Block> },
    Unsupported { message: String },
}

/// Render one slide's stored content. `title` is the slide's own title,
/// which wins over any title detected in the content.
pub fn render_slide(content: Option<&Value>, title: Option<&str>) -> SlideView {
    let given_title = title.map(str::trim).filter(|t| !t.is_empty());
    match content {
        None | Some(Value::Null) => SlideView::Empty {
            message: NO_CONTENT_MESSAGE.to_string(),
        },
        Some(Value::String(text)) => SlideView::Text {
            title: clean_title(given_title.unwrap_or(DEFAULT_TITLE)),
            blocks: text_blocks(text),
        },
        Some(value) => match SlideDocument::from_value(value) {
            Some(document) => render_document(&document, given_title),
            None if value.as_object().is_some_and(|o| o.is_empty()) => SlideView::Empty {
                message: NO_CONTENT_MESSAGE.to_string(),
            },
            None => SlideView::Unsupported {
                message: UNSUPPORTED_MESSAGE.to_string(),
            },
        },
    }
}

fn is_title_like(text: &TextObject) -> bool {
    text.has_text()
        && text.text.trim().chars().count() < MAX_TITLE_LEN
        && (text.font_size.is_some_and(|s| s > TITLE_MIN_FONT_SIZE) || text.is_bold() || text.top < TITLE_MAX_TOP)
}

fn render_document(document: &SlideDocument, given_title: Option<&str>) -> SlideView {
    let texts: Vec<&TextObject> = document.text_objects().filter(|t| t.has_text()).collect();
    let title_index = texts.iter().position(|t| is_title_like(t));

    let title = given_title
        .map(str::to_string)
        .or_else(|| title_index.map(|i| texts[i].text.trim().to_string()))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let mut body: Vec<&TextObject> = texts
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != title_index)
        .map(|(_, t)| *t)
        .collect();
    if body.is_empty() {
        body = if texts.len() > 1 { texts[1..].to_vec() } else { texts.clone() };
    }

    SlideView::Layout {
        title: clean_title(&title),
        image: document.first_image_src().map(str::to_string),
        blocks: body.iter().flat_map(|t| text_blocks(&t.text)).collect(),
    }
}

fn clean_title(title: &str) -> String {
    let stripped = strip_markup(title);
    let text: String = stripped.replace("**", "").replace('*', "");
    let text = HEADING.replace(text.trim(), "");
    let text = text.trim();
    if text.is_empty() { DEFAULT_TITLE.to_string() } else { text.to_string() }
}

fn strip_markup(text: &str) -> String {
    let text = BLOCK_TAG.replace_all(text, "\n");
    let text = CLASS_ATTR.replace_all(&text, "");
    let text = ANY_TAG.replace_all(&text, "");
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Clean free text and split it into typed blocks.
pub fn text_blocks(raw: &str) -> Vec<Block> {
    let text = strip_markup(raw);
    let text = BULLET_GLYPH.replace_all(&text, "\n• ");

    let mut blocks: Vec<Block> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "•")
        .map(classify_line)
        .collect();

    if let [Block::Paragraph { spans }] = blocks.as_slice() {
        let plain = plain_text(spans);
        if plain.chars().count() > LONG_PARAGRAPH_LEN {
            let sentences = split_sentences(&plain);
            if sentences.len() > 1 {
                blocks = sentences
                    .into_iter()
                    .map(|s| Block::Bullet { spans: parse_spans(&s) })
                    .collect();
            }
        }
    }
    blocks
}

fn classify_line(line: &str) -> Block {
    if let Some(rest) = line.strip_prefix('•') {
        return Block::Bullet { spans: parse_spans(rest.trim()) };
    }
    if LIST_MARKER.is_match(line) && !line.starts_with("**") {
        let rest = LIST_MARKER.replace(line, "");
        return Block::Bullet { spans: parse_spans(rest.trim()) };
    }
    if let Some(caps) = NUMBERED.captures(line) {
        let number = caps[1].parse().unwrap_or(1);
        return Block::Numbered { number, spans: parse_spans(caps[2].trim()) };
    }
    let line = HEADING.replace(line, "");
    Block::Paragraph { spans: parse_spans(line.trim()) }
}

fn plain_text(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| match s {
            Span::Text(t) => t.clone(),
            Span::Strong(t) => format!("**{t}**"),
            Span::Emphasis(t) => format!("*{t}*"),
        })
        .collect()
}

/// Sentences of a long paragraph, each ending in punctuation. Fragments of
/// `MIN_SENTENCE_LEN` characters or fewer are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        let at_boundary = matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|n| n.is_whitespace());
        if at_boundary {
            sentences.push(std::mem::take(&mut current));
        }
    }
    sentences.push(current);

    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| s.chars().count() > MIN_SENTENCE_LEN)
        .map(|s| {
            if s.ends_with(['.', '!', '?']) {
                s
            } else {
                format!("{s}.")
            }
        })
        .collect()
}

/// Split inline `**strong**` and `*emphasis*` markers into spans.
pub fn parse_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in EMPHASIS.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::Text(text[last..whole.start()].to_string()));
        }
        if let Some(strong) = caps.get(1) {
            spans.push(Span::Strong(strong.as_str().to_string()));
        } else if let Some(em) = caps.get(2) {
            spans.push(Span::Emphasis(em.as_str().to_string()));
        }
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::Text(text[last..].to_string()));
    }
    spans
}

/// A slide ready for presentation mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSlide {
    pub id: i64,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    pub view: SlideView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDeck {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_public: bool,
    pub slides: Vec<RenderedSlide>,
}

/// Render every slide of a deck, keeping the stored display order.
pub fn render_deck(detail: &PresentationDetail) -> RenderedDeck {
    let presentation = &detail.presentation;
    RenderedDeck {
        id: presentation.id,
        title: presentation.title.clone(),
        description: presentation.description.clone(),
        is_public: presentation.is_public,
        slides: detail
            .slides
            .iter()
            .map(|slide| RenderedSlide {
                id: slide.id,
                order: slide.order,
                notes: slide.notes.clone(),
                duration: slide.duration,
                view: render_slide(Some(&slide.content), slide.title.as_deref()),
            })
            .collect(),
    }
}
