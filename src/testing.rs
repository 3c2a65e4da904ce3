//! In-memory repository mocks for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::category_repository::CategoryRepository;
use crate::db::models::{Category, News, Tool};
use crate::db::news_repository::NewsRepository;
use crate::db::query::{non_blank, NewsQuery, PageRequest, ToolQuery};
use crate::db::tool_repository::ToolRepository;
use crate::error::AppError;

fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|f| f.to_lowercase().contains(&needle.to_lowercase()))
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.skip() as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

pub struct MockToolRepo {
    pub tools: Mutex<Vec<Tool>>,
    /// When set, `insert_many` fails after storing this many tools.
    pub fail_after: Option<usize>,
}

impl MockToolRepo {
    pub fn new() -> Self {
        Self {
            tools: Mutex::new(vec![]),
            fail_after: None,
        }
    }

    fn matches(tool: &Tool, query: &ToolQuery) -> bool {
        if let Some(search) = non_blank(query.search.as_deref()) {
            let hit = contains_ci(Some(tool.name.as_str()), search)
                || contains_ci(tool.subtitle.as_deref(), search)
                || contains_ci(tool.category.as_deref(), search)
                || contains_ci(tool.features.as_deref(), search);
            if !hit {
                return false;
            }
        }
        if let Some(category) = non_blank(query.category.as_deref()) {
            if !contains_ci(tool.category.as_deref(), category) {
                return false;
            }
        }
        if let Some(subscription) = non_blank(query.subscription.as_deref()) {
            let exact = tool
                .subscription
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(subscription));
            if !exact {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ToolRepository for MockToolRepo {
    async fn insert(&self, tool: &Tool) -> Result<(), AppError> {
        self.tools.lock().unwrap().push(tool.clone());
        Ok(())
    }

    async fn insert_many(&self, tools: &[Tool]) -> Result<usize, AppError> {
        let mut stored = self.tools.lock().unwrap();
        for (i, tool) in tools.iter().enumerate() {
            if self.fail_after == Some(i) {
                return Err(AppError::Database("write failed".into()));
            }
            stored.push(tool.clone());
        }
        Ok(tools.len())
    }

    async fn find_page(&self, query: &ToolQuery, page: PageRequest) -> Result<Vec<Tool>, AppError> {
        let matching: Vec<Tool> = self
            .tools
            .lock()
            .unwrap()
            .iter()
            .filter(|t| Self::matches(t, query))
            .cloned()
            .collect();
        Ok(page_of(&matching, page))
    }

    async fn count(&self, query: &ToolQuery) -> Result<u64, AppError> {
        Ok(self
            .tools
            .lock()
            .unwrap()
            .iter()
            .filter(|t| Self::matches(t, query))
            .count() as u64)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, AppError> {
        let mut values: Vec<String> = Vec::new();
        for tool in self.tools.lock().unwrap().iter() {
            if let Some(category) = &tool.category {
                if !category.trim().is_empty() && !values.contains(category) {
                    values.push(category.clone());
                }
            }
        }
        Ok(values)
    }
}

pub struct MockCategoryRepo {
    pub categories: Mutex<Vec<Category>>,
}

impl MockCategoryRepo {
    pub fn new() -> Self {
        Self {
            categories: Mutex::new(vec![]),
        }
    }

    pub fn with_names(names: &[&str]) -> Self {
        let repo = Self::new();
        repo.categories.lock().unwrap().extend(names.iter().map(|n| Category {
            id: crate::db::models::new_id(),
            name: n.to_string(),
        }));
        repo
    }

    /// Stored names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

#[async_trait]
impl CategoryRepository for MockCategoryRepo {
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_if_absent(&self, name: &str) -> Result<bool, AppError> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.name.to_lowercase() == name.to_lowercase()) {
            return Ok(false);
        }
        categories.push(Category {
            id: crate::db::models::new_id(),
            name: name.to_string(),
        });
        Ok(true)
    }

    async fn list_sorted(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.categories.lock().unwrap().clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

pub struct MockNewsRepo {
    pub news: Mutex<Vec<News>>,
}

impl MockNewsRepo {
    pub fn new() -> Self {
        Self {
            news: Mutex::new(vec![]),
        }
    }

    fn matches(item: &News, query: &NewsQuery) -> bool {
        match non_blank(query.search.as_deref()) {
            Some(search) => {
                contains_ci(Some(item.title.as_str()), search)
                    || contains_ci(Some(item.description.as_str()), search)
                    || contains_ci(Some(item.author.as_str()), search)
            }
            None => true,
        }
    }
}

#[async_trait]
impl NewsRepository for MockNewsRepo {
    async fn insert(&self, news: &News) -> Result<(), AppError> {
        self.news.lock().unwrap().push(news.clone());
        Ok(())
    }

    async fn find_page(&self, query: &NewsQuery, page: PageRequest) -> Result<Vec<News>, AppError> {
        let mut matching: Vec<News> = self
            .news
            .lock()
            .unwrap()
            .iter()
            .filter(|n| Self::matches(n, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(page_of(&matching, page))
    }

    async fn count(&self, query: &NewsQuery) -> Result<u64, AppError> {
        Ok(self
            .news
            .lock()
            .unwrap()
            .iter()
            .filter(|n| Self::matches(n, query))
            .count() as u64)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut news = self.news.lock().unwrap();
        let len_before = news.len();
        news.retain(|n| n.id != id);
        Ok(news.len() != len_before)
    }
}
