//! Card rendering for display items.
//!
//! A delegate turns a [`DisplayItem`](crate::model::DisplayItem) into a
//! [`RenderedCard`]. The category picks one of the built-in templates unless
//! the caller supplies its own [`ItemRenderer`]. Images are resolved through
//! an [`ImageRegistry`] and degrade to a gradient placeholder.

mod card;
mod category;
mod image;
mod renderer;

pub use card::{CardSize, ImageShape, MetaLine, RenderedCard};
pub use category::{Category, CategoryMetrics};
pub use image::{
    AssetRegistry, CardImage, Gradient, ImageRegistry, ImageSource, placeholder, resolve_card_image,
};
pub use renderer::{BuiltinRenderer, ItemRenderer, RenderContext, select_renderer};
