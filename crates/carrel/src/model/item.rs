//! The normalized display item.

use std::collections::BTreeMap;

use super::record::MetaValue;

/// Placeholder title for records that carry no usable title.
pub const UNTITLED: &str = "Untitled";

/// How an item refers to its image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageReference {
    /// A concrete source usable as-is (URL, absolute path, data URI).
    Direct(String),
    /// An identifier resolved through the image registry.
    Asset(String),
}

impl ImageReference {
    /// Classifies a raw reference string.
    ///
    /// Strings containing `://`, starting with `/`, or starting with `data:`
    /// are direct references; anything else is an asset identifier. Blank
    /// strings yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.contains("://") || raw.starts_with('/') || raw.starts_with("data:") {
            Some(ImageReference::Direct(raw.to_string()))
        } else {
            Some(ImageReference::Asset(raw.to_string()))
        }
    }

    /// The raw reference text.
    pub fn as_str(&self) -> &str {
        match self {
            ImageReference::Direct(s) | ImageReference::Asset(s) => s,
        }
    }
}

/// A renderable glyph (emoji or short symbol) shown instead of, or beside, an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Glyph(String);

impl Glyph {
    /// Creates a glyph from text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The glyph text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The uniform unit every source record is normalized into.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    /// Reconciliation key, unique within one normalized list.
    pub id: String,
    /// Primary text; never empty after normalization.
    pub title: String,
    /// Secondary line.
    pub subtitle: Option<String>,
    /// Longer body text.
    pub description: Option<String>,
    /// Image to resolve at render time.
    pub image: Option<ImageReference>,
    /// Glyph decoration.
    pub icon: Option<Glyph>,
    /// Free-form values read by renderers through string keys.
    pub metadata: BTreeMap<String, MetaValue>,
}

impl DisplayItem {
    /// Creates an item with only an id and a title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            description: None,
            image: None,
            icon: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Sets the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: ImageReference) -> Self {
        self.image = Some(image);
        self
    }

    /// Sets the glyph.
    pub fn with_icon(mut self, icon: Glyph) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Adds a metadata entry.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Raw metadata lookup.
    pub fn meta(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// Metadata value as display text; empty values count as missing.
    pub fn meta_text(&self, key: &str) -> Option<String> {
        self.meta(key)
            .map(MetaValue::display)
            .filter(|text| !text.trim().is_empty())
    }

    /// The first non-empty display text among `keys`.
    pub fn meta_text_any(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.meta_text(key))
    }

    /// The first numeric value among `keys`.
    pub fn meta_number_any(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .find_map(|key| self.meta(key).and_then(MetaValue::as_float))
    }
}
