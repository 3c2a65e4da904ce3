use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Criteria for listing tools. Every field is optional; absent fields do not
/// constrain the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolQuery {
    /// Free text matched against name, subtitle, category and features.
    pub search: Option<String>,
    /// Substring of the category field.
    pub category: Option<String>,
    /// Exact (case-insensitive) subscription tier.
    pub subscription: Option<String>,
}

/// Criteria for listing news items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsQuery {
    /// Free text matched against title, description and author.
    pub search: Option<String>,
}

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Build a page window, clamping `page` and `limit` to at least 1.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).max(1),
        }
    }

    /// Number of records to skip before this page.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// `ceil(total / limit)`.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit.max(1))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page,
            total_pages: request.total_pages(total),
        }
    }
}

/// Returns `Some(trimmed)` for non-blank text.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Case-insensitive "contains" condition on a single field.
fn contains_ci(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

/// Case-insensitive whole-value condition on a single field.
fn equals_ci(text: &str) -> Document {
    doc! { "$regex": format!("^{}$", regex::escape(text)), "$options": "i" }
}

/// Translate a [`ToolQuery`] into a MongoDB filter.
pub fn tool_filter(query: &ToolQuery) -> Document {
    let mut filter = Document::new();

    if let Some(search) = non_blank(query.search.as_deref()) {
        filter.insert(
            "$or",
            vec![
                doc! { "name": contains_ci(search) },
                doc! { "subtitle": contains_ci(search) },
                doc! { "category": contains_ci(search) },
                doc! { "features": contains_ci(search) },
            ],
        );
    }

    if let Some(category) = non_blank(query.category.as_deref()) {
        filter.insert("category", contains_ci(category));
    }

    if let Some(subscription) = non_blank(query.subscription.as_deref()) {
        filter.insert("subscription", equals_ci(subscription));
    }

    filter
}

/// Translate a [`NewsQuery`] into a MongoDB filter.
pub fn news_filter(query: &NewsQuery) -> Document {
    match non_blank(query.search.as_deref()) {
        Some(search) => doc! {
            "$or": [
                { "title": contains_ci(search) },
                { "description": contains_ci(search) },
                { "author": contains_ci(search) },
            ]
        },
        None => Document::new(),
    }
}
