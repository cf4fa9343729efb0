pub mod crawler;
pub mod web;

pub use crawler::{FetchError, PageKind, PageSource};
pub use web::HttpFetcher;
