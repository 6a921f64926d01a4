//! Rendering strategy selection.
//!
//! Each category has a built-in template, modelled as a closed enum with one
//! arm per category. A caller-supplied [`ItemRenderer`] replaces the built-in
//! selection entirely.
//!
//! # Example
//!
//! ```
//! use carrel::delegate::{AssetRegistry, Category, RenderContext, select_renderer};
//! use carrel::model::{DisplayItem, SourceRecord};
//!
//! let registry = AssetRegistry::new();
//! let renderer = select_renderer(Category::Course, None);
//! let item = DisplayItem::new("c1", "Calculus").with_meta("duration", "8 weeks");
//! let ctx = RenderContext::new(Category::Course, &registry, 0);
//!
//! let card = renderer.render(&item, &SourceRecord::default(), &ctx);
//! assert_eq!(card.meta_value("duration"), Some("8 weeks"));
//! assert!(card.image.is_placeholder());
//! ```

use std::sync::Arc;

use super::card::{CardSize, ImageShape, MetaLine, RenderedCard};
use super::category::Category;
use super::image::{ImageRegistry, resolve_card_image};
use crate::model::{DisplayItem, SourceRecord};

/// Everything a renderer may consult besides the item itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Category of the viewer.
    pub category: Category,
    /// Registry for image lookups.
    pub registry: &'a dyn ImageRegistry,
    /// Position of the item in the normalized list.
    pub index: usize,
}

impl<'a> RenderContext<'a> {
    /// Creates a context.
    pub fn new(category: Category, registry: &'a dyn ImageRegistry, index: usize) -> Self {
        Self {
            category,
            registry,
            index,
        }
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("category", &self.category)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Turns a display item into a card.
///
/// Implemented for closures with the matching signature.
pub trait ItemRenderer: Send + Sync {
    /// Renders one item. `record` is the source record the item came from.
    fn render(&self, item: &DisplayItem, record: &SourceRecord, ctx: &RenderContext<'_>) -> RenderedCard;
}

impl<F> ItemRenderer for F
where
    F: Fn(&DisplayItem, &SourceRecord, &RenderContext<'_>) -> RenderedCard + Send + Sync,
{
    fn render(&self, item: &DisplayItem, record: &SourceRecord, ctx: &RenderContext<'_>) -> RenderedCard {
        self(item, record, ctx)
    }
}

/// Picks the renderer for `category`. A `custom` renderer always wins.
pub fn select_renderer(
    category: Category,
    custom: Option<Arc<dyn ItemRenderer>>,
) -> Arc<dyn ItemRenderer> {
    custom.unwrap_or_else(|| Arc::new(BuiltinRenderer::for_category(category)))
}

/// The built-in card templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRenderer {
    Default,
    Blog,
    Course,
    Instructor,
    Category,
    User,
}

impl BuiltinRenderer {
    /// The template for a category.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Default => BuiltinRenderer::Default,
            Category::Blog => BuiltinRenderer::Blog,
            Category::Course => BuiltinRenderer::Course,
            Category::Instructor => BuiltinRenderer::Instructor,
            Category::Category => BuiltinRenderer::Category,
            Category::User => BuiltinRenderer::User,
        }
    }

    /// The category whose metrics and glyph this template uses.
    pub fn category(self) -> Category {
        match self {
            BuiltinRenderer::Default => Category::Default,
            BuiltinRenderer::Blog => Category::Blog,
            BuiltinRenderer::Course => Category::Course,
            BuiltinRenderer::Instructor => Category::Instructor,
            BuiltinRenderer::Category => Category::Category,
            BuiltinRenderer::User => Category::User,
        }
    }
}

impl ItemRenderer for BuiltinRenderer {
    fn render(&self, item: &DisplayItem, _record: &SourceRecord, ctx: &RenderContext<'_>) -> RenderedCard {
        let category = self.category();
        let mut card = base_card(item, category, ctx);

        match self {
            BuiltinRenderer::Default => {
                card.meta = item
                    .metadata
                    .keys()
                    .filter_map(|key| item.meta_text(key).map(|value| MetaLine::new(key.as_str(), value)))
                    .take(DEFAULT_META_LINES)
                    .collect();
            }
            BuiltinRenderer::Blog => {
                push_text(&mut card, item, "author", &["author", "authorName", "writer"]);
                push_text(&mut card, item, "date", &["date", "publishedAt", "published_at"]);
                if let Some(minutes) = item.meta_number_any(&["readTime", "read_time"]) {
                    card.meta.push(MetaLine::new("read time", format!("{} min read", minutes.round())));
                } else {
                    push_text(&mut card, item, "read time", &["readTime", "read_time"]);
                }
                if let Some(tag) = item.meta_text_any(&["tag", "topic"]) {
                    card.badges.push(tag);
                }
            }
            BuiltinRenderer::Course => {
                push_text(&mut card, item, "instructor", &["instructor", "teacher", "author"]);
                push_text(&mut card, item, "duration", &["duration", "length"]);
                if let Some(level) = item.meta_text_any(&["level", "difficulty"]) {
                    card.badges.push(level);
                }
                if let Some(students) = item.meta_number_any(&["students", "enrolled", "enrollments"]) {
                    card.meta.push(MetaLine::new("students", compact_count(students)));
                }
                push_rating(&mut card, item);
                if let Some(price) = item.meta("price") {
                    let text = match price.as_float() {
                        Some(amount) if amount <= 0.0 => "Free".to_string(),
                        Some(amount) => format!("${amount:.2}"),
                        None => price.display(),
                    };
                    if !text.is_empty() {
                        card.meta.push(MetaLine::new("price", text));
                    }
                }
                if item.meta("bestseller").and_then(|v| v.as_bool()).unwrap_or(false) {
                    card.badges.push("Bestseller".to_string());
                }
            }
            BuiltinRenderer::Instructor => {
                card.image_shape = ImageShape::Circle;
                if card.subtitle.is_none() {
                    card.subtitle = item.meta_text_any(&["title", "position"]);
                }
                push_text(&mut card, item, "expertise", &["expertise", "specialty", "subject"]);
                if let Some(courses) = item.meta_number_any(&["courses", "courseCount", "course_count"]) {
                    card.meta.push(MetaLine::new("courses", compact_count(courses)));
                }
                push_rating(&mut card, item);
            }
            BuiltinRenderer::Category => {
                card.image_shape = ImageShape::Icon;
                if let Some(count) = item.meta_number_any(&["count", "courseCount", "course_count", "items"]) {
                    card.meta.push(MetaLine::new("count", format!("{} items", compact_count(count))));
                }
            }
            BuiltinRenderer::User => {
                card.image_shape = ImageShape::Circle;
                push_text(&mut card, item, "email", &["email"]);
                push_text(&mut card, item, "joined", &["joined", "joinedAt", "memberSince"]);
                if let Some(points) = item.meta_number_any(&["points", "xp"]) {
                    card.meta.push(MetaLine::new("points", compact_count(points)));
                }
                if let Some(role) = item.meta_text("role") {
                    card.badges.push(role);
                }
            }
        }
        card
    }
}

const DEFAULT_META_LINES: usize = 4;

fn base_card(item: &DisplayItem, category: Category, ctx: &RenderContext<'_>) -> RenderedCard {
    let metrics = category.metrics();
    RenderedCard {
        key: item.id.clone(),
        source_index: ctx.index,
        variant: category,
        title: item.title.clone(),
        subtitle: item.subtitle.clone(),
        description: item.description.clone(),
        image: resolve_card_image(item, category, ctx.registry),
        image_shape: ImageShape::Cover,
        badges: Vec::new(),
        meta: Vec::new(),
        size: CardSize {
            width: metrics.card_width,
            height: metrics.card_height,
        },
    }
}

fn push_text(card: &mut RenderedCard, item: &DisplayItem, label: &str, keys: &[&str]) {
    if let Some(value) = item.meta_text_any(keys) {
        card.meta.push(MetaLine::new(label, value));
    }
}

fn push_rating(card: &mut RenderedCard, item: &DisplayItem) {
    if let Some(rating) = item.meta_number_any(&["rating", "stars"]) {
        card.meta.push(MetaLine::new("rating", format!("★ {rating:.1}")));
    }
}

/// Formats counts as `950`, `1.2k`, `3.4M`.
fn compact_count(n: f64) -> String {
    let n = n.max(0.0);
    if n >= 1_000_000.0 {
        trim_decimal(format!("{:.1}", n / 1_000_000.0)) + "M"
    } else if n >= 1_000.0 {
        trim_decimal(format!("{:.1}", n / 1_000.0)) + "k"
    } else {
        format!("{}", n.round() as u64)
    }
}

fn trim_decimal(s: String) -> String {
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{AssetRegistry, CardImage};
    use crate::model::ImageReference;

    fn render(category: Category, item: &DisplayItem) -> RenderedCard {
        let registry = AssetRegistry::new().with_asset("okafor", "/img/okafor.jpg");
        let ctx = RenderContext::new(category, &registry, 3);
        select_renderer(category, None).render(item, &SourceRecord::default(), &ctx)
    }

    #[test]
    fn test_course_card() {
        let item = DisplayItem::new("c1", "Statistics")
            .with_meta("instructor", "Dr. Okafor")
            .with_meta("students", 12500)
            .with_meta("rating", 4.7)
            .with_meta("price", 0)
            .with_meta("level", "Beginner")
            .with_meta("bestseller", true);
        let card = render(Category::Course, &item);

        assert_eq!(card.variant, Category::Course);
        assert_eq!(card.source_index, 3);
        assert_eq!(card.meta_value("instructor"), Some("Dr. Okafor"));
        assert_eq!(card.meta_value("students"), Some("12.5k"));
        assert_eq!(card.meta_value("rating"), Some("★ 4.7"));
        assert_eq!(card.meta_value("price"), Some("Free"));
        assert!(card.has_badge("Bestseller"));
        assert!(card.has_badge("Beginner"));
        assert_eq!(card.size.width, Category::Course.metrics().card_width);
    }

    #[test]
    fn test_instructor_card_uses_circle_avatar() {
        let item = DisplayItem::new("i1", "Dr. Okafor")
            .with_image(ImageReference::Asset("okafor".into()))
            .with_meta("expertise", "Probability")
            .with_meta("courses", 7);
        let card = render(Category::Instructor, &item);

        assert_eq!(card.image_shape, ImageShape::Circle);
        assert!(matches!(card.image, CardImage::Source(ref s) if s.as_str() == "/img/okafor.jpg"));
        assert_eq!(card.meta_value("expertise"), Some("Probability"));
        assert_eq!(card.meta_value("courses"), Some("7"));
    }

    #[test]
    fn test_blog_read_time() {
        let item = DisplayItem::new("b1", "Why proofs matter")
            .with_meta("authorName", "Ada")
            .with_meta("readTime", 6);
        let card = render(Category::Blog, &item);

        assert_eq!(card.meta_value("author"), Some("Ada"));
        assert_eq!(card.meta_value("read time"), Some("6 min read"));
    }

    #[test]
    fn test_category_card_count() {
        let item = DisplayItem::new("t1", "Mathematics").with_meta("count", 42);
        let card = render(Category::Category, &item);
        assert_eq!(card.image_shape, ImageShape::Icon);
        assert_eq!(card.meta_value("count"), Some("42 items"));
    }

    #[test]
    fn test_user_card() {
        let item = DisplayItem::new("u1", "Grace")
            .with_meta("email", "grace@example.org")
            .with_meta("role", "Moderator")
            .with_meta("points", 1000);
        let card = render(Category::User, &item);
        assert_eq!(card.meta_value("email"), Some("grace@example.org"));
        assert_eq!(card.meta_value("points"), Some("1k"));
        assert!(card.has_badge("Moderator"));
    }

    #[test]
    fn test_default_card_lists_metadata() {
        let item = DisplayItem::new("d1", "Notes")
            .with_meta("a", "1")
            .with_meta("b", "")
            .with_meta("c", "3");
        let card = render(Category::Default, &item);
        let labels: Vec<_> = card.meta.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c"]);
    }

    fn shouting(item: &DisplayItem, record: &SourceRecord, ctx: &RenderContext<'_>) -> RenderedCard {
        let mut card = BuiltinRenderer::Default.render(item, record, ctx);
        card.title = item.title.to_uppercase();
        card
    }

    #[test]
    fn test_custom_renderer_overrides_builtin() {
        let registry = AssetRegistry::new();
        let ctx = RenderContext::new(Category::Course, &registry, 0);
        let card = select_renderer(Category::Course, Some(Arc::new(shouting))).render(
            &DisplayItem::new("x", "Algebra"),
            &SourceRecord::default(),
            &ctx,
        );

        assert_eq!(card.title, "ALGEBRA");
        assert_eq!(card.variant, Category::Default);
    }

    #[test]
    fn test_compact_count() {
        assert_eq!(compact_count(950.0), "950");
        assert_eq!(compact_count(1_200.0), "1.2k");
        assert_eq!(compact_count(3_000_000.0), "3M");
    }
}
