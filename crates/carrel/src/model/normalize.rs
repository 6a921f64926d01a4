//! Record normalization.
//!
//! Converts arbitrary source records into [`DisplayItem`]s, either through a
//! caller-supplied mapper or by probing well-known field names. Normalization
//! never fails: a record with nothing usable still yields an item titled
//! [`UNTITLED`].
//!
//! # Example
//!
//! ```
//! use carrel::model::{normalize, SourceRecord};
//! use serde_json::json;
//!
//! let records = vec![
//!     SourceRecord::from(json!({ "id": 7, "name": "Dr. Okafor", "avatar": "okafor" })),
//!     SourceRecord::from(json!({ "level": "advanced" })),
//! ];
//! let items = normalize(&records, None);
//!
//! assert_eq!(items[0].id, "7");
//! assert_eq!(items[0].title, "Dr. Okafor");
//! assert_eq!(items[1].id, "1");
//! assert_eq!(items[1].title, "Untitled");
//! ```

use std::collections::{BTreeMap, HashSet};

use carrel_core::logging::targets;
use serde_json::Value;

use super::item::{DisplayItem, Glyph, ImageReference, UNTITLED};
use super::record::{MetaValue, SourceRecord};

/// A caller-supplied conversion from a record to a display item.
pub type ItemMapper = dyn Fn(&SourceRecord) -> DisplayItem + Send + Sync;

const ID_KEYS: &[&str] = &["id", "_id", "slug", "key"];
const TITLE_KEYS: &[&str] = &["title", "name", "label", "fullName", "full_name"];
const SUBTITLE_KEYS: &[&str] = &["subtitle", "tagline", "headline", "role"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary", "excerpt", "bio"];
const IMAGE_KEYS: &[&str] = &[
    "image",
    "avatar",
    "thumbnail",
    "cover",
    "imageUrl",
    "image_url",
    "photo",
];
const ICON_KEYS: &[&str] = &["icon", "emoji"];

/// Normalizes `records` into exactly one display item each.
///
/// With a `mapper`, each record is converted by the mapper and the result is
/// kept as returned, except that an empty title is replaced by [`UNTITLED`]
/// and an empty id by the record's position. Without one, fields are inferred
/// (see [`infer_item`]). Duplicate ids are made unique as `"{id}~{index}"`.
#[tracing::instrument(skip_all, target = "carrel::normalize", level = "debug", fields(count = records.len()))]
pub fn normalize(records: &[SourceRecord], mapper: Option<&ItemMapper>) -> Vec<DisplayItem> {
    let mut seen = HashSet::with_capacity(records.len());

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut item = match mapper {
                Some(map) => map(record),
                None => infer_item(record, index),
            };

            if item.title.trim().is_empty() {
                item.title = UNTITLED.to_string();
            }
            if item.id.trim().is_empty() {
                item.id = index.to_string();
            }
            if !seen.insert(item.id.clone()) {
                let unique = format!("{}~{index}", item.id);
                tracing::debug!(target: targets::NORMALIZE, id = %item.id, %unique, "duplicate item id");
                item.id = unique;
                seen.insert(item.id.clone());
            }
            item
        })
        .collect()
}

/// Infers a display item from a record's field names.
///
/// For each display field the first non-empty candidate key wins; keys that
/// were not picked by any probe are copied into the item's metadata.
pub fn infer_item(record: &SourceRecord, index: usize) -> DisplayItem {
    let mut consumed: HashSet<&str> = HashSet::new();

    let id = probe(record, ID_KEYS, &mut consumed, scalar_text).unwrap_or_else(|| index.to_string());
    let title = probe(record, TITLE_KEYS, &mut consumed, scalar_text)
        .or_else(|| record.as_text().map(str::trim).filter(|t| !t.is_empty()).map(String::from))
        .unwrap_or_else(|| UNTITLED.to_string());
    let subtitle = probe(record, SUBTITLE_KEYS, &mut consumed, scalar_text);
    let description = probe(record, DESCRIPTION_KEYS, &mut consumed, scalar_text);
    let image = probe(record, IMAGE_KEYS, &mut consumed, image_reference);
    let icon = probe(record, ICON_KEYS, &mut consumed, scalar_text).map(Glyph::new);

    let metadata: BTreeMap<String, MetaValue> = record
        .fields()
        .filter(|(key, _)| !consumed.contains(key))
        .map(|(key, value)| (key.to_string(), MetaValue::from(value)))
        .collect();

    DisplayItem {
        id,
        title,
        subtitle,
        description,
        image,
        icon,
        metadata,
    }
}

/// Returns the first candidate that `extract` accepts, marking its key consumed.
fn probe<'r, T>(
    record: &'r SourceRecord,
    keys: &[&'r str],
    consumed: &mut HashSet<&'r str>,
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter().find_map(|key| {
        let value = extract(record.get(key)?)?;
        consumed.insert(key);
        Some(value)
    })
}

/// Non-empty text from a string, number, or boolean.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// An image reference from a string or an object carrying `src`/`url`.
fn image_reference(value: &Value) -> Option<ImageReference> {
    match value {
        Value::String(s) => ImageReference::parse(s),
        Value::Object(fields) => ["src", "url"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .and_then(ImageReference::parse),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<SourceRecord> {
        values.into_iter().map(SourceRecord::from).collect()
    }

    #[test]
    fn test_one_item_per_record() {
        let input = records(vec![json!({}), json!(null), json!([1, 2]), json!({ "title": "" })]);
        let items = normalize(&input, None);

        assert_eq!(items.len(), input.len());
        assert!(items.iter().all(|item| !item.title.is_empty()));
        assert!(items.iter().all(|item| item.title == UNTITLED));
    }

    #[test]
    fn test_title_falls_back_to_name() {
        let items = normalize(&records(vec![json!({ "name": "Linear Algebra" })]), None);
        assert_eq!(items[0].title, "Linear Algebra");
    }

    #[test]
    fn test_image_falls_back_to_avatar() {
        let items = normalize(
            &records(vec![json!({ "name": "Grace", "avatar": "https://img.example.org/g.jpg" })]),
            None,
        );
        assert_eq!(
            items[0].image,
            Some(ImageReference::Direct("https://img.example.org/g.jpg".into()))
        );
    }

    #[test]
    fn test_unmapped_fields_become_metadata() {
        let items = normalize(
            &records(vec![json!({
                "id": "c1",
                "title": "Statistics",
                "name": "stats-101",
                "duration": "6 weeks",
                "rating": 4.7
            })]),
            None,
        );
        let item = &items[0];

        assert_eq!(item.meta_text("duration"), Some("6 weeks".into()));
        assert_eq!(item.meta_text("rating"), Some("4.7".into()));
        // `name` lost the title probe to `title`, so it stays informational.
        assert_eq!(item.meta_text("name"), Some("stats-101".into()));
        assert!(item.meta("title").is_none());
        assert!(item.meta("id").is_none());
    }

    #[test]
    fn test_missing_id_uses_position() {
        let items = normalize(&records(vec![json!({ "title": "A" }), json!({ "title": "B" })]), None);
        assert_eq!(items[0].id, "0");
        assert_eq!(items[1].id, "1");
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let items = normalize(&records(vec![json!({ "id": 42, "title": "A" })]), None);
        assert_eq!(items[0].id, "42");
    }

    #[test]
    fn test_duplicate_ids_are_disambiguated() {
        let input = records(vec![
            json!({ "id": "x", "title": "A" }),
            json!({ "id": "x", "title": "B" }),
        ]);
        let first = normalize(&input, None);
        let second = normalize(&input, None);

        assert_eq!(first[0].id, "x");
        assert_eq!(first[1].id, "x~1");
        assert_eq!(first, second);
    }

    #[test]
    fn test_mapper_result_is_used() {
        let mapper = |record: &SourceRecord| {
            let code = record.get("code").and_then(Value::as_str).unwrap_or_default();
            DisplayItem::new(code, format!("Course {code}"))
        };
        let items = normalize(&records(vec![json!({ "code": "MATH201" })]), Some(&mapper));

        assert_eq!(items[0].id, "MATH201");
        assert_eq!(items[0].title, "Course MATH201");
        assert!(items[0].metadata.is_empty());
    }

    #[test]
    fn test_mapper_empty_title_gets_placeholder() {
        let mapper = |_: &SourceRecord| DisplayItem::new("", "");
        let items = normalize(&records(vec![json!({})]), Some(&mapper));
        assert_eq!(items[0].title, UNTITLED);
        assert_eq!(items[0].id, "0");
    }

    #[test]
    fn test_bare_string_record_becomes_title() {
        let items = normalize(&records(vec![json!("Number Theory")]), None);
        assert_eq!(items[0].title, "Number Theory");
    }

    #[test]
    fn test_image_object_with_src() {
        let items = normalize(&records(vec![json!({ "image": { "src": "hero-banner" } })]), None);
        assert_eq!(items[0].image, Some(ImageReference::Asset("hero-banner".into())));
    }

    #[test]
    fn test_icon_probe() {
        let items = normalize(&records(vec![json!({ "name": "Chemistry", "emoji": "🧪" })]), None);
        assert_eq!(items[0].icon, Some(Glyph::new("🧪")));
    }
}
