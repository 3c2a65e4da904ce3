use async_trait::async_trait;

use crate::db::models::News;
use crate::db::query::{NewsQuery, PageRequest};
use crate::error::AppError;

/// Repository trait for news operations.
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Insert a news item.
    async fn insert(&self, news: &News) -> Result<(), AppError>;

    /// Fetch one page of news matching the query, newest first.
    async fn find_page(&self, query: &NewsQuery, page: PageRequest) -> Result<Vec<News>, AppError>;

    /// Count all news matching the query, ignoring pagination.
    async fn count(&self, query: &NewsQuery) -> Result<u64, AppError>;

    /// Delete a news item by id. Returns `false` when nothing matched.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// MongoDB implementation of the NewsRepository.
pub struct MongoNewsRepository {
    collection: mongodb::Collection<News>,
}

impl MongoNewsRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("news"),
        }
    }
}

#[async_trait]
impl NewsRepository for MongoNewsRepository {
    async fn insert(&self, news: &News) -> Result<(), AppError> {
        self.collection
            .insert_one(news)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_page(&self, query: &NewsQuery, page: PageRequest) -> Result<Vec<News>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        // Dates are fixed-width RFC 3339 strings, so a string sort is chronological.
        let options = FindOptions::builder()
            .sort(doc! { "date": -1 })
            .skip(page.skip())
            .limit(i64::try_from(page.limit).unwrap_or(i64::MAX))
            .build();

        let mut cursor = self
            .collection
            .find(crate::db::query::news_filter(query))
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut items = Vec::new();
        use futures::TryStreamExt;
        while let Some(item) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            items.push(item);
        }

        Ok(items)
    }

    async fn count(&self, query: &NewsQuery) -> Result<u64, AppError> {
        self.collection
            .count_documents(crate::db::query::news_filter(query))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}
