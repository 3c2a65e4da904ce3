use serde::{Deserialize, Serialize};

use crate::api::envelope::Envelope;
use crate::api::extract::{Json, Query};
use crate::catalog::categories::{normalize_and_register, sync_from_tools};
use crate::db::category_repository::CategoryRepository;
use crate::db::models::{new_id, Category, CreateToolRequest, Tool};
use crate::db::query::{non_blank, PageRequest, Pagination, ToolQuery};
use crate::db::tool_repository::ToolRepository;
use crate::error::AppError;

/// Query string of `GET /api/tools`.
///
/// `name` is accepted as an alias of `search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListToolsParams {
    #[serde(default, alias = "name")]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl ListToolsParams {
    fn split(self) -> (ToolQuery, PageRequest) {
        (
            ToolQuery {
                search: self.search,
                category: self.category,
                subscription: self.subscription,
            },
            PageRequest::new(self.page, self.limit),
        )
    }
}

/// Core tool creation logic — separated from the HTTP layer for testability.
///
/// Validates the request, registers its categories and stores the tool with
/// the normalized category string.
pub async fn process_create_tool(
    tools: &dyn ToolRepository,
    categories: &dyn CategoryRepository,
    request: CreateToolRequest,
) -> Result<Tool, AppError> {
    let name = non_blank(request.name.as_deref())
        .ok_or_else(|| AppError::BadRequest("Tool name is required".into()))?
        .to_string();

    let raw_category = request
        .category
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Tool category is required".into()))?;

    let category = normalize_and_register(categories, raw_category)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Tool category must name at least one category".into())
        })?;

    let tool = Tool {
        id: new_id(),
        name,
        category: Some(category),
        subtitle: request.subtitle,
        rating: request.rating,
        website_link: request.website_link,
        image_link: request.image_link,
        features: request.features,
        sharable_link: request.sharable_link,
        subscription: request.subscription,
    };

    tools.insert(&tool).await?;
    tracing::info!("Created tool '{}' ({})", tool.name, tool.id);

    Ok(tool)
}

/// Core logic to list one page of tools together with its pagination block.
pub async fn process_list_tools(
    tools: &dyn ToolRepository,
    query: &ToolQuery,
    page: PageRequest,
) -> Result<(Vec<Tool>, Pagination), AppError> {
    let items = tools.find_page(query, page).await?;
    let total = tools.count(query).await?;

    Ok((items, Pagination::new(page, total)))
}

/// Axum handler for `POST /api/tools`.
pub async fn create_tool_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    Json(request): Json<CreateToolRequest>,
) -> Result<Envelope<Vec<Tool>>, AppError> {
    let tool = process_create_tool(
        state.tool_repo.as_ref(),
        state.category_repo.as_ref(),
        request,
    )
    .await?;

    Ok(Envelope::created("Tool added successfully", vec![tool]))
}

/// Axum handler for `GET /api/tools`.
pub async fn list_tools_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    Query(params): Query<ListToolsParams>,
) -> Result<Envelope<Vec<Tool>>, AppError> {
    let (query, page) = params.split();
    let (items, pagination) = process_list_tools(state.tool_repo.as_ref(), &query, page).await?;

    Ok(Envelope::ok("Tools fetched successfully", items).with_pagination(pagination))
}

/// Axum handler for `GET /api/categories`.
pub async fn list_categories_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
) -> Result<Envelope<Vec<Category>>, AppError> {
    let categories = state.category_repo.list_sorted().await?;
    Ok(Envelope::ok("Categories fetched successfully", categories))
}

/// Axum handler for `POST /api/categories/sync`.
///
/// Registers every category referenced by stored tools and returns the
/// names that were added.
pub async fn sync_categories_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
) -> Result<Envelope<Vec<String>>, AppError> {
    let added = sync_from_tools(state.tool_repo.as_ref(), state.category_repo.as_ref()).await?;
    Ok(Envelope::ok("Categories synced successfully", added))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCategoryRepo, MockToolRepo};

    fn make_request(name: &str, category: &str) -> CreateToolRequest {
        CreateToolRequest {
            name: Some(name.to_string()),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    async fn seed(tools: &MockToolRepo, name: &str, subscription: Option<&str>) {
        let categories = MockCategoryRepo::new();
        let mut request = make_request(name, "AI");
        request.subscription = subscription.map(str::to_string);
        process_create_tool(tools, &categories, request).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_tool_normalizes_category() {
        let tools = MockToolRepo::new();
        let categories = MockCategoryRepo::new();

        let tool = process_create_tool(&tools, &categories, make_request("Foo", "AI, Writing"))
            .await
            .unwrap();

        assert_eq!(tool.category.as_deref(), Some("AI,Writing"));
        assert_eq!(categories.names(), vec!["AI", "Writing"]);
        assert_eq!(tools.tools.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_tool_requires_name() {
        let tools = MockToolRepo::new();
        let categories = MockCategoryRepo::new();

        let result = process_create_tool(&tools, &categories, make_request("  ", "AI")).await;
        match result.unwrap_err() {
            AppError::BadRequest(msg) => assert!(msg.contains("name")),
            other => panic!("Expected BadRequest error, got: {:?}", other),
        }
        assert!(categories.names().is_empty());
    }

    #[tokio::test]
    async fn test_create_tool_requires_category() {
        let tools = MockToolRepo::new();
        let categories = MockCategoryRepo::new();

        let mut request = make_request("Foo", "");
        request.category = None;
        let result = process_create_tool(&tools, &categories, request).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = process_create_tool(&tools, &categories, make_request("Foo", " , ")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(tools.tools.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_tools_pagination() {
        let tools = MockToolRepo::new();
        for i in 0..12 {
            seed(&tools, &format!("Tool {i}"), None).await;
        }

        let (items, pagination) =
            process_list_tools(&tools, &ToolQuery::default(), PageRequest::new(Some(2), Some(5)))
                .await
                .unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].name, "Tool 5");
        assert_eq!(pagination, Pagination { total: 12, page: 2, total_pages: 3 });

        let (items, _) =
            process_list_tools(&tools, &ToolQuery::default(), PageRequest::new(Some(3), Some(5)))
                .await
                .unwrap();
        assert_eq!(items.len(), 2);

        let (items, _) =
            process_list_tools(&tools, &ToolQuery::default(), PageRequest::new(Some(4), Some(5)))
                .await
                .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_list_tools_search_is_case_insensitive() {
        let tools = MockToolRepo::new();
        seed(&tools, "ChatGPT", None).await;
        seed(&tools, "Midjourney", None).await;

        let query = ToolQuery {
            search: Some("chat".to_string()),
            ..Default::default()
        };
        let (items, pagination) = process_list_tools(&tools, &query, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "ChatGPT");
        assert_eq!(pagination.total, 1);
    }

    #[tokio::test]
    async fn test_list_tools_subscription_is_exact() {
        let tools = MockToolRepo::new();
        seed(&tools, "A", Some("Freemium")).await;
        seed(&tools, "B", Some("free")).await;

        let query = ToolQuery {
            subscription: Some("Free".to_string()),
            ..Default::default()
        };
        let (items, _) = process_list_tools(&tools, &query, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "B");
    }

    #[test]
    fn test_list_params_name_alias() {
        let params: ListToolsParams =
            serde_json::from_value(serde_json::json!({ "name": "chat", "page": 3 })).unwrap();
        let (query, page) = params.split();
        assert_eq!(query.search.as_deref(), Some("chat"));
        assert_eq!(page, PageRequest { page: 3, limit: 10 });
    }
}
