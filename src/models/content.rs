//! Typed view of the slide `content` JSON document.
//!
//! Slides store an editor document of the form
//! `{ "type": "fabric", "objects": [ ... ] }`. Only text boxes and images are
//! modelled; everything else is kept opaque. Fields this crate does not know
//! about are preserved through `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DOCUMENT_KIND: &str = "fabric";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(f64),
    Named(String),
}

impl FontWeight {
    pub fn is_bold(&self) -> bool {
        match self {
            FontWeight::Numeric(weight) => *weight > 400.0,
            FontWeight::Named(name) => {
                let name = name.trim();
                name.eq_ignore_ascii_case("bold")
                    || name.eq_ignore_ascii_case("bolder")
                    || name.parse::<f64>().is_ok_and(|w| w > 400.0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextObject {
    pub fn new(text: impl Into<String>, left: f64, top: f64, font_size: f64) -> Self {
        TextObject {
            text: text.into(),
            left,
            top,
            font_size: Some(font_size),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = Some(FontWeight::Named("bold".to_string()));
        self
    }

    pub fn size(mut self, width: f64, height: Option<f64>) -> Self {
        self.width = Some(width);
        self.height = height;
        self
    }

    pub fn fill(mut self, color: &str) -> Self {
        self.fill = Some(color.to_string());
        self
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight.as_ref().is_some_and(FontWeight::is_bold)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageObject {
    pub fn new(src: impl Into<String>, left: f64, top: f64, width: f64, height: f64) -> Self {
        ImageObject {
            src: Some(src.into()),
            left,
            top,
            width: Some(width),
            height: Some(height),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlideObject {
    Textbox(TextObject),
    Image(ImageObject),
    /// Any other drawable, kept verbatim.
    Other(Value),
}

impl SlideObject {
    /// Classify one raw object. Text-like types (`textbox`, `text`,
    /// `i-text`) are treated alike; malformed known types fall back to `Other`.
    pub fn from_value(value: &Value) -> SlideObject {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
        match kind.to_ascii_lowercase().as_str() {
            "textbox" | "text" | "i-text" => serde_json::from_value(value.clone())
                .map(SlideObject::Textbox)
                .unwrap_or_else(|_| SlideObject::Other(value.clone())),
            "image" => serde_json::from_value(value.clone())
                .map(SlideObject::Image)
                .unwrap_or_else(|_| SlideObject::Other(value.clone())),
            _ => SlideObject::Other(value.clone()),
        }
    }

    pub fn to_value(&self) -> Value {
        let (kind, body) = match self {
            SlideObject::Textbox(text) => ("textbox", serde_json::to_value(text)),
            SlideObject::Image(image) => ("image", serde_json::to_value(image)),
            SlideObject::Other(value) => return value.clone(),
        };
        match body {
            Ok(Value::Object(mut map)) => {
                map.entry("type").or_insert_with(|| Value::String(kind.to_string()));
                Value::Object(map)
            }
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlideDocument {
    pub objects: Vec<SlideObject>,
}

impl SlideDocument {
    pub fn new(objects: Vec<SlideObject>) -> Self {
        SlideDocument { objects }
    }

    /// Read a stored document. Returns `None` when `value` has no `objects`
    /// array.
    pub fn from_value(value: &Value) -> Option<SlideDocument> {
        let objects = value.get("objects")?.as_array()?;
        Some(SlideDocument {
            objects: objects.iter().map(SlideObject::from_value).collect(),
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "type": DOCUMENT_KIND,
            "objects": self.objects.iter().map(SlideObject::to_value).collect::<Vec<_>>(),
        })
    }

    pub fn text_objects(&self) -> impl Iterator<Item = &TextObject> {
        self.objects.iter().filter_map(|o| match o {
            SlideObject::Textbox(t) => Some(t),
            _ => None,
        })
    }

    pub fn first_image_src(&self) -> Option<&str> {
        self.objects.iter().find_map(|o| match o {
            SlideObject::Image(image) => image.src.as_deref().filter(|s| !s.trim().is_empty()),
            _ => None,
        })
    }
}
