//! Content documents (events, services, profiles, locations) as read from the
//! content backend.

use std::{fmt, str::FromStr};

use serde_json::{Map, Value};
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use super::{blocks::RichText, error::DomainError, location::MapPayload};

/// Which collection a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Event,
    Service,
    Profile,
    Location,
}

/// Ordering applied to collection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Time-ordered content, newest first.
    DateDesc,
    /// Editor-curated content, by explicit `Order` field.
    OrderAsc,
}

impl SortOrder {
    pub fn as_graphql(self) -> &'static str {
        match self {
            SortOrder::DateDesc => "Date:desc",
            SortOrder::OrderAsc => "Order:asc",
        }
    }
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Event => "event",
            ContentKind::Service => "service",
            ContentKind::Profile => "profile",
            ContentKind::Location => "location",
        }
    }

    /// GraphQL field for single-document lookups.
    pub fn single_field(self) -> &'static str {
        match self {
            ContentKind::Event => "userEvent",
            ContentKind::Service => "service",
            ContentKind::Profile => "profile",
            ContentKind::Location => "location",
        }
    }

    /// GraphQL field for collection queries.
    pub fn collection_field(self) -> &'static str {
        match self {
            ContentKind::Event => "userEvents",
            ContentKind::Service => "services",
            ContentKind::Profile => "profiles",
            ContentKind::Location => "locations",
        }
    }

    /// Name used for generated GraphQL operations, e.g. `EventByDocumentId`.
    pub fn operation_prefix(self) -> &'static str {
        match self {
            ContentKind::Event => "Event",
            ContentKind::Service => "Service",
            ContentKind::Profile => "Profile",
            ContentKind::Location => "Location",
        }
    }

    pub fn default_sort(self) -> SortOrder {
        match self {
            ContentKind::Event => SortOrder::DateDesc,
            ContentKind::Service | ContentKind::Profile | ContentKind::Location => {
                SortOrder::OrderAsc
            }
        }
    }

    /// Fields requested for every document of this kind.
    pub fn selection(self) -> &'static [&'static str] {
        match self {
            ContentKind::Event => &[
                "documentId",
                "Title",
                "Description",
                "Date",
                "Visible",
                "Image { url }",
            ],
            ContentKind::Service => &[
                "documentId",
                "Title",
                "URL",
                "Description",
                "Order",
                "Visible",
            ],
            ContentKind::Profile => &["documentId", "Title", "Description", "Order", "Visible"],
            ContentKind::Location => &["documentId", "Title", "Map", "Order", "Visible"],
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "event" | "events" | "news" => Ok(ContentKind::Event),
            "service" | "services" => Ok(ContentKind::Service),
            "profile" | "profiles" => Ok(ContentKind::Profile),
            "location" | "locations" => Ok(ContentKind::Location),
            other => Err(DomainError::validation(format!(
                "unknown content kind `{other}` (expected event, service, profile or location)"
            ))),
        }
    }
}

/// A validated lookup key for single-document retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().is_empty() {
            return Err(DomainError::validation("document identifier is empty"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key can also name a legacy numeric identifier: one or more
    /// ASCII digits and nothing else.
    pub fn is_legacy_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.bytes().all(|byte| byte.is_ascii_digit())
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalised backend document. Only the fields relevant to `kind` are
/// populated; everything else stays at its empty default.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    pub kind: ContentKind,
    pub document_id: Option<String>,
    pub legacy_id: Option<String>,
    pub title: String,
    pub description: RichText,
    pub date: Option<OffsetDateTime>,
    pub visible: Option<bool>,
    pub order: Option<i64>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub map: MapPayload,
}

impl ContentDocument {
    pub fn new(kind: ContentKind, document_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind,
            document_id: Some(document_id.into()),
            legacy_id: None,
            title: title.into(),
            description: RichText::default(),
            date: None,
            visible: None,
            order: None,
            url: None,
            image_url: None,
            map: MapPayload::None,
        }
    }

    /// Normalise one raw backend object. Missing or oddly typed fields fall
    /// back to empty values; only a non-object payload is rejected.
    pub fn from_value(kind: ContentKind, value: &Value) -> Result<Self, DomainError> {
        let Value::Object(fields) = value else {
            return Err(DomainError::malformed(
                "document",
                format!("expected an object, found {}", value_type(value)),
            ));
        };

        let title = match fields.get("Title") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => RichText::from_value(other).plain_text(),
            None => String::new(),
        };

        Ok(Self {
            kind,
            document_id: string_like(fields, "documentId"),
            legacy_id: string_like(fields, "id"),
            title,
            description: fields
                .get("Description")
                .map(RichText::from_value)
                .unwrap_or_default(),
            date: fields
                .get("Date")
                .and_then(Value::as_str)
                .and_then(parse_content_date),
            visible: fields.get("Visible").and_then(Value::as_bool),
            order: fields.get("Order").and_then(|order| {
                order
                    .as_i64()
                    .or_else(|| order.as_f64().map(|float| float.trunc() as i64))
            }),
            url: non_blank(fields.get("URL").and_then(Value::as_str)),
            image_url: non_blank(
                fields
                    .get("Image")
                    .and_then(|image| image.get("url"))
                    .and_then(Value::as_str),
            ),
            map: fields
                .get("Map")
                .map(MapPayload::from_value)
                .unwrap_or_default(),
        })
    }

    /// The trimmed title, or `fallback` when the title is blank.
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() { fallback } else { trimmed }
    }

    /// Identifier suitable for building links: the document id, else the
    /// legacy id.
    pub fn public_id(&self) -> Option<&str> {
        self.document_id.as_deref().or(self.legacy_id.as_deref())
    }

    pub fn is_hidden(&self) -> bool {
        self.visible == Some(false)
    }
}

/// Parse the backend's date field: RFC 3339 date-times, or plain calendar
/// dates interpreted as midnight UTC.
pub fn parse_content_date(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if let Ok(datetime) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(datetime);
    }
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

fn string_like(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(text) => non_blank(Some(text.as_str())),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
