use async_trait::async_trait;

use crate::db::models::Category;
use crate::error::AppError;

/// Repository trait for category operations.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Create the case-insensitive unique index on `name`.
    /// Should be called once on startup.
    async fn ensure_indexes(&self) -> Result<(), AppError>;

    /// Insert `name` unless a category with the same name, compared
    /// case-insensitively, already exists. Returns `true` when inserted.
    async fn insert_if_absent(&self, name: &str) -> Result<bool, AppError>;

    /// List all categories sorted by name ascending.
    async fn list_sorted(&self) -> Result<Vec<Category>, AppError>;
}

/// MongoDB implementation of the CategoryRepository.
///
/// Case-insensitive uniqueness comes from an `en`/strength-2 collation on
/// both the unique index and the upsert filter, so concurrent inserts of
/// the same name collapse into a single document.
pub struct MongoCategoryRepository {
    collection: mongodb::Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("categories"),
        }
    }

    fn name_collation() -> mongodb::options::Collation {
        use mongodb::options::{Collation, CollationStrength};

        Collation::builder()
            .locale("en")
            .strength(CollationStrength::Secondary)
            .build()
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000
    )
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        let options = IndexOptions::builder()
            .name("name_ci_unique".to_string())
            .unique(true)
            .collation(Self::name_collation())
            .build();
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(options)
            .build();

        self.collection
            .create_index(index)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn insert_if_absent(&self, name: &str) -> Result<bool, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::UpdateOptions;

        let options = UpdateOptions::builder()
            .upsert(true)
            .collation(Self::name_collation())
            .build();

        // On insert the document takes `name` from the equality filter.
        let result = self
            .collection
            .update_one(
                doc! { "name": name },
                doc! { "$setOnInsert": { "id": crate::db::models::new_id() } },
            )
            .with_options(options)
            .await;

        match result {
            Ok(result) => Ok(result.upserted_id.is_some()),
            // A concurrent upsert of the same name won the unique index.
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn list_sorted(&self) -> Result<Vec<Category>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "name": 1 })
            .build();

        let mut cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut categories = Vec::new();
        use futures::TryStreamExt;
        while let Some(category) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            categories.push(category);
        }

        Ok(categories)
    }
}
