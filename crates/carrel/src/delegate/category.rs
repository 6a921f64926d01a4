//! Category tags and their fixed sizing table.

use std::fmt;

use carrel_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::model::Glyph;

/// The closed set of content categories a viewer can present.
///
/// Parsing is case-insensitive. `department` and `faculty` are aliases of
/// [`Category::Default`], and any unrecognized tag falls back to it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Generic content.
    #[default]
    Default,
    /// Articles and posts.
    Blog,
    /// Courses.
    Course,
    /// People who teach courses.
    Instructor,
    /// Topic groupings.
    Category,
    /// Platform members.
    User,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Default,
        Category::Blog,
        Category::Course,
        Category::Instructor,
        Category::Category,
        Category::User,
    ];

    /// Parses a category tag, falling back to [`Category::Default`].
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "" | "default" | "department" | "faculty" => Category::Default,
            "blog" => Category::Blog,
            "course" => Category::Course,
            "instructor" => Category::Instructor,
            "category" => Category::Category,
            "user" => Category::User,
            other => {
                tracing::debug!(target: targets::RENDER, tag = other, "unknown category, using default");
                Category::Default
            }
        }
    }

    /// The canonical tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Default => "default",
            Category::Blog => "blog",
            Category::Course => "course",
            Category::Instructor => "instructor",
            Category::Category => "category",
            Category::User => "user",
        }
    }

    /// Sizing and decoration for cards of this category.
    pub fn metrics(self) -> CategoryMetrics {
        match self {
            Category::Course => CategoryMetrics {
                card_width: 320.0,
                card_height: 360.0,
                grid_columns: 3,
                items_per_indicator: 3,
                glyph: "📘",
            },
            Category::Blog => CategoryMetrics {
                card_width: 320.0,
                card_height: 340.0,
                grid_columns: 3,
                items_per_indicator: 3,
                glyph: "📝",
            },
            Category::Instructor => CategoryMetrics {
                card_width: 240.0,
                card_height: 300.0,
                grid_columns: 4,
                items_per_indicator: 4,
                glyph: "🎓",
            },
            Category::Category => CategoryMetrics {
                card_width: 200.0,
                card_height: 160.0,
                grid_columns: 6,
                items_per_indicator: 6,
                glyph: "🗂",
            },
            Category::User => CategoryMetrics {
                card_width: 220.0,
                card_height: 260.0,
                grid_columns: 4,
                items_per_indicator: 4,
                glyph: "👤",
            },
            Category::Default => CategoryMetrics {
                card_width: 280.0,
                card_height: 300.0,
                grid_columns: 3,
                items_per_indicator: 3,
                glyph: "",
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Category::parse(tag)
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        Category::parse(&tag)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// Fixed per-category sizing used by renderers and the layout adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryMetrics {
    /// Card width in logical pixels.
    pub card_width: f32,
    /// Card height in logical pixels.
    pub card_height: f32,
    /// Columns in the grid template.
    pub grid_columns: usize,
    /// How many cards one position indicator covers.
    pub items_per_indicator: usize,
    /// Fallback glyph for image placeholders. Empty means "use the title's initial".
    pub glyph: &'static str,
}

impl CategoryMetrics {
    /// The placeholder glyph as a [`Glyph`].
    pub fn glyph(&self) -> Glyph {
        Glyph::new(self.glyph)
    }
}
