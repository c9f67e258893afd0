//! Request and response types for the Confluence REST API.
//!
//! Responses that the adapter passes through untouched stay as
//! [`serde_json::Value`]; only request bodies and list envelopes are typed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// Paginated list envelope (`results`, `start`, `limit`, `size`, `_links`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// The page of results.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Offset of the first result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    /// Requested page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Number of results in this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Navigation links (`next`, `base`, ...).
    #[serde(default, rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

impl ResultEnvelope {
    /// Whether the server advertised a further page.
    pub fn has_next(&self) -> bool {
        self.links
            .as_ref()
            .and_then(|l| l.get("next"))
            .is_some_and(|n| !n.is_null())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Representation
// ─────────────────────────────────────────────────────────────────────────────

/// Page body representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// Confluence storage format (XHTML).
    #[default]
    Storage,
    /// Editor format.
    Editor,
    /// Rendered view.
    View,
    /// Rendered view for export.
    ExportView,
    /// Rendered view with styles inlined.
    StyledView,
}

impl Representation {
    /// All supported representations.
    pub const ALL: [Representation; 5] = [
        Representation::Storage,
        Representation::Editor,
        Representation::View,
        Representation::ExportView,
        Representation::StyledView,
    ];

    /// Wire name of the representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Storage => "storage",
            Representation::Editor => "editor",
            Representation::View => "view",
            Representation::ExportView => "export_view",
            Representation::StyledView => "styled_view",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized representation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown representation '{0}'")]
pub struct UnknownRepresentation(pub String);

impl FromStr for Representation {
    type Err = UnknownRepresentation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Representation::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRepresentation(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content requests
// ─────────────────────────────────────────────────────────────────────────────

/// Reference to a space by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceRef {
    /// Space key.
    pub key: String,
}

/// Reference to an ancestor page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AncestorRef {
    /// Page ID.
    pub id: String,
}

/// Page body keyed by representation name, e.g. `{"storage": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentBody(pub serde_json::Map<String, Value>);

impl ContentBody {
    /// Build a body holding a single representation.
    pub fn new(value: impl Into<String>, representation: Representation) -> Self {
        let mut map = serde_json::Map::new();
        map.insert(
            representation.as_str().to_string(),
            serde_json::json!({
                "value": value.into(),
                "representation": representation.as_str(),
            }),
        );
        Self(map)
    }
}

/// Version block sent with updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRef {
    /// The new version number.
    pub number: u64,
}

/// Request to create a page.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest {
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Target space.
    pub space: SpaceRef,
    /// Page body.
    pub body: ContentBody,
    /// Parent page, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<AncestorRef>,
}

impl CreatePageRequest {
    /// Create a page request at the root of a space.
    pub fn new(
        space_key: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        representation: Representation,
    ) -> Self {
        Self {
            content_type: "page".to_string(),
            title: title.into(),
            space: SpaceRef {
                key: space_key.into(),
            },
            body: ContentBody::new(body, representation),
            ancestors: Vec::new(),
        }
    }

    /// Place the page under a parent.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.ancestors = vec![AncestorRef {
            id: parent_id.into(),
        }];
        self
    }
}

/// Request to update a page.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePageRequest {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Page body.
    pub body: ContentBody,
    /// The version this update creates.
    pub version: VersionRef,
}

impl UpdatePageRequest {
    /// Create an update request.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        representation: Representation,
        version: u64,
    ) -> Self {
        Self {
            id: id.into(),
            content_type: "page".to_string(),
            title: title.into(),
            body: ContentBody::new(body, representation),
            version: VersionRef { number: version },
        }
    }
}

/// Request to set a content property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyRequest {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: Value,
}
