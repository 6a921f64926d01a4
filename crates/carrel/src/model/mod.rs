//! Data model for the collection viewer.
//!
//! Source records arrive in whatever shape the data collaborator provides.
//! The normalizer turns each one into a [`DisplayItem`], the uniform unit the
//! renderers and the layout adapter work with.

mod item;
mod normalize;
mod record;

pub use item::{DisplayItem, Glyph, ImageReference, UNTITLED};
pub use normalize::{ItemMapper, infer_item, normalize};
pub use record::{MetaValue, SourceRecord};
