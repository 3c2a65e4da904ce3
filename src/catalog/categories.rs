use std::collections::HashSet;

use crate::db::category_repository::CategoryRepository;
use crate::db::tool_repository::ToolRepository;
use crate::error::AppError;

/// Split a comma-separated category string into trimmed, non-empty names.
///
/// Order and casing are preserved; duplicates are kept.
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drop later names that equal an earlier one ignoring case.
fn dedup_case_insensitive(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.to_lowercase()))
        .collect()
}

/// Normalize a category string and register every name it contains.
///
/// Returns the value to store on the tool: the trimmed names rejoined with
/// `,`. Names not yet known (case-insensitively) are created with the casing
/// given here. Returns `None` when the string holds no names.
pub async fn normalize_and_register(
    repo: &dyn CategoryRepository,
    raw: &str,
) -> Result<Option<String>, AppError> {
    let names = split_categories(raw);
    if names.is_empty() {
        return Ok(None);
    }

    for name in dedup_case_insensitive(names.clone()) {
        if repo.insert_if_absent(&name).await? {
            tracing::info!("Registered new category '{}'", name);
        }
    }

    Ok(Some(names.join(",")))
}

/// Register every category referenced by stored tools.
///
/// Returns the names that were missing and have been added, in first-seen
/// order.
pub async fn sync_from_tools(
    tools: &dyn ToolRepository,
    categories: &dyn CategoryRepository,
) -> Result<Vec<String>, AppError> {
    let names: Vec<String> = tools
        .distinct_categories()
        .await?
        .iter()
        .flat_map(|raw| split_categories(raw))
        .collect();

    let mut added = Vec::new();
    for name in dedup_case_insensitive(names) {
        if categories.insert_if_absent(&name).await? {
            added.push(name);
        }
    }

    tracing::info!("Category sync added {} categories", added.len());
    Ok(added)
}
