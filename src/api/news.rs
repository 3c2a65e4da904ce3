use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::envelope::Envelope;
use crate::api::extract::{Json, Query};
use crate::db::models::{new_id, CreateNewsRequest, News};
use crate::db::news_repository::NewsRepository;
use crate::db::query::{non_blank, NewsQuery, PageRequest, Pagination};
use crate::error::AppError;

/// Query string of `GET /api/news`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNewsParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    non_blank(value.as_deref())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest(format!("News {field} is required")))
}

/// Core news creation logic.
pub async fn process_create_news(
    repo: &dyn NewsRepository,
    request: CreateNewsRequest,
) -> Result<News, AppError> {
    let news = News {
        id: new_id(),
        date: request.date.unwrap_or_else(Utc::now),
        title: required(request.title, "title")?,
        description: required(request.description, "description")?,
        author: required(request.author, "author")?,
        image: request.image,
        reference: request.reference,
    };

    repo.insert(&news).await?;
    tracing::info!("Created news '{}' ({})", news.title, news.id);

    Ok(news)
}

/// Core logic to list one page of news, newest first.
pub async fn process_list_news(
    repo: &dyn NewsRepository,
    query: &NewsQuery,
    page: PageRequest,
) -> Result<(Vec<News>, Pagination), AppError> {
    let items = repo.find_page(query, page).await?;
    let total = repo.count(query).await?;

    Ok((items, Pagination::new(page, total)))
}

/// Core news deletion logic.
pub async fn process_delete_news(repo: &dyn NewsRepository, id: &str) -> Result<(), AppError> {
    if !repo.delete(id).await? {
        return Err(AppError::NotFound(format!("News '{}' not found", id)));
    }

    tracing::info!("Deleted news {}", id);
    Ok(())
}

/// Axum handler for `POST /api/news`.
pub async fn create_news_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    Json(request): Json<CreateNewsRequest>,
) -> Result<Envelope<Vec<News>>, AppError> {
    let news = process_create_news(state.news_repo.as_ref(), request).await?;
    Ok(Envelope::created("News added successfully", vec![news]))
}

/// Axum handler for `GET /api/news`.
pub async fn list_news_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    Query(params): Query<ListNewsParams>,
) -> Result<Envelope<Vec<News>>, AppError> {
    let query = NewsQuery {
        search: params.search,
    };
    let page = PageRequest::new(params.page, params.limit);
    let (items, pagination) = process_list_news(state.news_repo.as_ref(), &query, page).await?;

    Ok(Envelope::ok("News fetched successfully", items).with_pagination(pagination))
}

/// Axum handler for `DELETE /api/news/{id}`.
pub async fn delete_news_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::extract::Path(id): axum::extract::Path<String>,
) -> Result<Envelope<()>, AppError> {
    process_delete_news(state.news_repo.as_ref(), &id).await?;
    Ok(Envelope::message("News deleted successfully"))
}
