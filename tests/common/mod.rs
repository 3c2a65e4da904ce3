#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use aitools_catalog::app::AppState;
use aitools_catalog::db::category_repository::{CategoryRepository, MongoCategoryRepository};
use aitools_catalog::db::news_repository::{MongoNewsRepository, NewsRepository};
use aitools_catalog::db::tool_repository::{MongoToolRepository, ToolRepository};

/// Holds a running MongoDB container and provides the Axum router for
/// integration tests.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, the container is stopped and the upload directory removed.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub upload_dir: tempfile::TempDir,
    pub router: Router,
    pub tool_repo: Arc<dyn ToolRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub news_repo: Arc<dyn NewsRepository>,
}

impl TestEnv {
    /// Spin up MongoDB and build an Axum router wired to real repositories.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("aitools_test");

        let tool_repo: Arc<dyn ToolRepository> = Arc::new(MongoToolRepository::new(&mongo_db));
        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(MongoCategoryRepository::new(&mongo_db));
        let news_repo: Arc<dyn NewsRepository> = Arc::new(MongoNewsRepository::new(&mongo_db));

        category_repo
            .ensure_indexes()
            .await
            .expect("Failed to create category index");

        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let app_state = AppState {
            tool_repo: tool_repo.clone(),
            category_repo: category_repo.clone(),
            news_repo: news_repo.clone(),
            http_client: reqwest::Client::new(),
            upload_dir: upload_dir.path().to_path_buf(),
        };

        let router = aitools_catalog::app::router(app_state, 5 * 1024 * 1024);

        Self {
            _mongo: mongo_container,
            upload_dir,
            router,
            tool_repo,
            category_repo,
            news_repo,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Helper: create a tool via the API.
    pub async fn create_tool(
        &self,
        server: &axum_test::TestServer,
        body: serde_json::Value,
    ) -> axum_test::TestResponse {
        server.post("/api/tools").json(&body).await
    }

    /// Helper: create a news item via the API.
    pub async fn create_news(
        &self,
        server: &axum_test::TestServer,
        title: &str,
        date: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/api/news")
            .json(&serde_json::json!({
                "title": title,
                "description": format!("About {title}"),
                "author": "Test Author",
                "date": date,
            }))
            .await
    }

    /// Number of files currently in the upload directory.
    pub fn upload_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path())
            .expect("Failed to read upload dir")
            .count()
    }
}
