//! Framework-neutral rendered card.

use super::category::Category;
use super::image::CardImage;

/// How a card's image is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageShape {
    /// Full-bleed banner at the top of the card.
    #[default]
    Cover,
    /// Round avatar.
    Circle,
    /// Small square glyph tile.
    Icon,
}

/// Card dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardSize {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// A labelled line of metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaLine {
    /// Short label such as `"duration"`.
    pub label: String,
    /// Display text.
    pub value: String,
}

impl MetaLine {
    /// Creates a line.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The output of an item renderer.
///
/// Hosts draw this however they like; activating it goes back through
/// [`CollectionView::activate`](crate::view::CollectionView::activate) with
/// the card's `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCard {
    /// Reconciliation key (the display item's id).
    pub key: String,
    /// Index of the source record this card was built from.
    pub source_index: usize,
    /// Template that produced the card.
    pub variant: Category,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: CardImage,
    pub image_shape: ImageShape,
    /// Short highlight labels ("Bestseller", a level, a tag).
    pub badges: Vec<String>,
    pub meta: Vec<MetaLine>,
    pub size: CardSize,
}

impl RenderedCard {
    /// Looks up a meta line by label.
    pub fn meta_value(&self, label: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }

    /// Returns `true` if the card carries `badge`.
    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }
}
