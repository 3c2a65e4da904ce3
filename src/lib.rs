pub mod app;
pub mod config;
pub mod error;
pub mod keepalive;
pub mod db {
    pub mod category_repository;
    pub mod models;
    pub mod news_repository;
    pub mod query;
    pub mod tool_repository;
}
pub mod catalog {
    pub mod categories;
}
pub mod import {
    pub mod spreadsheet;
}
pub mod api {
    pub mod envelope;
    pub mod errors;
    pub mod extract;
    pub mod health;
    pub mod import;
    pub mod news;
    pub mod proxy;
    pub mod tools;
}

#[cfg(test)]
pub(crate) mod testing;
