//! Image resolution and placeholder generation.

use std::collections::HashMap;

use carrel_core::logging::targets;

use super::category::Category;
use crate::model::{DisplayItem, Glyph, ImageReference};

/// A concrete, loadable image source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageSource(String);

impl ImageSource {
    /// Creates a source from a URL or path.
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// The source text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolves image references to concrete sources.
///
/// Queried lazily, once per item, at render time. Returning `None` makes the
/// renderer draw a placeholder instead.
pub trait ImageRegistry: Send + Sync {
    /// Resolves a reference.
    fn resolve(&self, reference: &ImageReference) -> Option<ImageSource>;
}

/// A map-backed registry. Direct references pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: HashMap<String, ImageSource>,
}

impl AssetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an asset, replacing any previous source for `id`.
    pub fn insert(&mut self, id: impl Into<String>, source: impl Into<String>) {
        self.assets.insert(id.into(), ImageSource::new(source));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_asset(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(id, source);
        self
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns `true` if no assets are registered.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AssetRegistry
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (id, source) in iter {
            registry.insert(id, source);
        }
        registry
    }
}

impl ImageRegistry for AssetRegistry {
    fn resolve(&self, reference: &ImageReference) -> Option<ImageSource> {
        match reference {
            ImageReference::Direct(source) => Some(ImageSource::new(source.clone())),
            ImageReference::Asset(id) => self.assets.get(id).cloned(),
        }
    }
}

/// A two-stop gradient, stored as `0xRRGGBB` colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gradient {
    /// Starting color.
    pub from: u32,
    /// Ending color.
    pub to: u32,
}

impl Gradient {
    /// CSS-style hex strings for both stops.
    pub fn to_hex(self) -> (String, String) {
        (format!("#{:06x}", self.from), format!("#{:06x}", self.to))
    }
}

const PALETTE: [Gradient; 8] = [
    Gradient { from: 0x667eea, to: 0x764ba2 },
    Gradient { from: 0xf093fb, to: 0xf5576c },
    Gradient { from: 0x4facfe, to: 0x00f2fe },
    Gradient { from: 0x43e97b, to: 0x38f9d7 },
    Gradient { from: 0xfa709a, to: 0xfee140 },
    Gradient { from: 0x30cfd0, to: 0x330867 },
    Gradient { from: 0xa18cd1, to: 0xfbc2eb },
    Gradient { from: 0xff9a9e, to: 0xfecfef },
];

/// The image slot of a rendered card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardImage {
    /// A resolved image.
    Source(ImageSource),
    /// A gradient with a glyph drawn over it.
    Placeholder {
        /// Background gradient.
        gradient: Gradient,
        /// Foreground glyph.
        glyph: Glyph,
    },
}

impl CardImage {
    /// Returns `true` for placeholders.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, CardImage::Placeholder { .. })
    }
}

/// Resolves an item's image, falling back to a placeholder.
pub fn resolve_card_image(
    item: &DisplayItem,
    category: Category,
    registry: &dyn ImageRegistry,
) -> CardImage {
    if let Some(reference) = &item.image {
        if let Some(source) = registry.resolve(reference) {
            return CardImage::Source(source);
        }
        tracing::debug!(
            target: targets::RENDER,
            id = %item.id,
            reference = reference.as_str(),
            "image did not resolve, using placeholder"
        );
    }
    placeholder(item, category)
}

/// The deterministic placeholder for an item.
///
/// The gradient is chosen by a stable hash of the item id. The glyph is the
/// item's icon, else the category glyph, else the title's first letter.
pub fn placeholder(item: &DisplayItem, category: Category) -> CardImage {
    let gradient = PALETTE[(fnv1a(item.id.as_bytes()) % PALETTE.len() as u64) as usize];
    let glyph = item
        .icon
        .clone()
        .or_else(|| {
            let metrics = category.metrics();
            (!metrics.glyph.is_empty()).then(|| metrics.glyph())
        })
        .unwrap_or_else(|| initial_glyph(&item.title));
    CardImage::Placeholder { gradient, glyph }
}

fn initial_glyph(title: &str) -> Glyph {
    let initial = title
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| "?".to_string());
    Glyph::new(initial)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(PRIME))
}
