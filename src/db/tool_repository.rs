use async_trait::async_trait;

use crate::db::models::Tool;
use crate::db::query::{PageRequest, ToolQuery};
use crate::error::AppError;

/// Repository trait for tool operations.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait ToolRepository: Send + Sync {
    /// Insert a single tool.
    async fn insert(&self, tool: &Tool) -> Result<(), AppError>;

    /// Insert many tools in one ordered batch. Returns the number inserted.
    ///
    /// A failure mid-batch leaves the preceding tools in place.
    async fn insert_many(&self, tools: &[Tool]) -> Result<usize, AppError>;

    /// Fetch one page of tools matching the query.
    async fn find_page(&self, query: &ToolQuery, page: PageRequest) -> Result<Vec<Tool>, AppError>;

    /// Count all tools matching the query, ignoring pagination.
    async fn count(&self, query: &ToolQuery) -> Result<u64, AppError>;

    /// Every distinct, non-empty category string stored on tools.
    async fn distinct_categories(&self) -> Result<Vec<String>, AppError>;
}

/// MongoDB implementation of the ToolRepository.
pub struct MongoToolRepository {
    collection: mongodb::Collection<Tool>,
}

impl MongoToolRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("tools"),
        }
    }
}

#[async_trait]
impl ToolRepository for MongoToolRepository {
    async fn insert(&self, tool: &Tool) -> Result<(), AppError> {
        self.collection
            .insert_one(tool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn insert_many(&self, tools: &[Tool]) -> Result<usize, AppError> {
        if tools.is_empty() {
            return Ok(0);
        }

        let result = self
            .collection
            .insert_many(tools)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.inserted_ids.len())
    }

    async fn find_page(&self, query: &ToolQuery, page: PageRequest) -> Result<Vec<Tool>, AppError> {
        use mongodb::options::FindOptions;

        let filter = crate::db::query::tool_filter(query);
        let options = FindOptions::builder()
            .skip(page.skip())
            .limit(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .build();

        let mut cursor = self
            .collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut tools = Vec::new();
        use futures::TryStreamExt;
        while let Some(tool) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            tools.push(tool);
        }

        Ok(tools)
    }

    async fn count(&self, query: &ToolQuery) -> Result<u64, AppError> {
        self.collection
            .count_documents(crate::db::query::tool_filter(query))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, AppError> {
        use mongodb::bson::doc;

        let values = self
            .collection
            .distinct("category", doc! {})
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .filter(|v| !v.trim().is_empty())
            .collect())
    }
}
