//! Response reshaping: null stripping and compact page/content records.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Recursively drop null-valued map entries and null array items.
///
/// Scalars are returned unchanged. Applying this twice yields the same value
/// as applying it once.
pub fn remove_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, remove_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter(|v| !v.is_null())
                .map(remove_nulls)
                .collect(),
        ),
        other => other,
    }
}

/// Compact page record. Absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub id: Option<String>,
    pub title: Option<String>,
    pub space: Option<String>,
    pub url: Option<String>,
}

/// Compact search result record. Absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentSummary {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub url: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw remote records
// ─────────────────────────────────────────────────────────────────────────────

/// A page item as the service returns it, reduced to the fields we read.
#[derive(Debug, Default, Deserialize)]
struct RawPage {
    #[serde(default, deserialize_with = "text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    title: Option<String>,
    #[serde(rename = "_expandable", default, deserialize_with = "lenient")]
    expandable: Option<RawExpandable>,
    #[serde(default, deserialize_with = "lenient")]
    space: Option<RawSpace>,
    #[serde(rename = "_links", default, deserialize_with = "lenient")]
    links: Option<RawLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct RawExpandable {
    #[serde(default, deserialize_with = "text")]
    space: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSpace {
    #[serde(default, deserialize_with = "text")]
    key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLinks {
    #[serde(default, deserialize_with = "text")]
    webui: Option<String>,
}

/// A search result item: either flat or wrapping a `content` object.
#[derive(Debug, Default, Deserialize)]
struct RawContent {
    #[serde(flatten)]
    fields: RawContentFields,
    #[serde(default, deserialize_with = "lenient")]
    content: Option<RawContentFields>,
}

#[derive(Debug, Default, Deserialize)]
struct RawContentFields {
    #[serde(default, deserialize_with = "text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "text")]
    title: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "text")]
    content_type: Option<String>,
    #[serde(rename = "_links", default, deserialize_with = "lenient")]
    links: Option<RawLinks>,
}

impl RawContentFields {
    fn url(&self) -> Option<String> {
        self.links.as_ref().and_then(|l| l.webui.clone())
    }
}

/// Accept strings and numbers as text; anything else reads as absent.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse a nested object, treating a value of the wrong shape as absent.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn parse<T: DeserializeOwned + Default>(item: Value) -> T {
    T::deserialize(item).unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

/// Reduce page items to `{id, title, space, url}`.
///
/// `space` comes from `_expandable.space` when set, otherwise from
/// `space.key`. Missing fields never fail; they come out as `None`.
pub fn filter_pages(pages: Vec<Value>) -> Vec<PageSummary> {
    pages
        .into_iter()
        .map(parse::<RawPage>)
        .map(|page| PageSummary {
            id: page.id,
            title: page.title,
            space: page
                .expandable
                .and_then(|e| e.space)
                .or_else(|| page.space.and_then(|s| s.key)),
            url: page.links.and_then(|l| l.webui),
        })
        .collect()
}

/// Reduce search result items to `{id, title, type, url}`.
///
/// Each field prefers the nested `content` object's value and falls back to
/// the item's own.
pub fn filter_content(items: Vec<Value>) -> Vec<ContentSummary> {
    items
        .into_iter()
        .map(parse::<RawContent>)
        .map(|item| {
            let nested = item.content.unwrap_or_default();
            let flat = item.fields;
            ContentSummary {
                url: nested.url().or_else(|| flat.url()),
                id: nested.id.or(flat.id),
                title: nested.title.or(flat.title),
                content_type: nested.content_type.or(flat.content_type),
            }
        })
        .collect()
}
