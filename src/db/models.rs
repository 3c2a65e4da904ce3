use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry describing an external AI product, stored in the `tools`
/// collection.
///
/// `category` is denormalized: a comma-joined list of category names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Service-generated UUID.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharable_link: Option<String>,
    /// Pricing tier label, e.g. `Free`, `Freemium`, `Paid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

/// A normalized category label, stored in the `categories` collection.
///
/// Names keep the casing of their first submission; uniqueness is
/// case-insensitive and enforced by a collated unique index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A dated editorial record, stored in the `news` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: String,
    /// Publication date. Persisted as a fixed-width RFC 3339 string so the
    /// store can sort on it lexically.
    #[serde(with = "rfc3339_millis")]
    pub date: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// The request payload for `POST /api/tools`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateToolRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Comma-separated category names.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub sharable_link: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The request payload for `POST /api/news`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNewsRequest {
    /// Defaults to the creation time when absent.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Generate a new record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Serde adapter writing timestamps as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Every value has the same width, so string order equals time order.
pub mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|d| d.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
