//! Typed client for the Douban v2 movie API.
//!
//! Only the read endpoints the catalog sync needs are covered: curated list
//! pages (`in_theaters`, `top250`) and per-subject detail.

mod client;
mod error;
pub mod models;
mod movies;

pub use client::{DoubanClient, DEFAULT_BASE_URL};
pub use error::DoubanError;
pub use models::{Rating, Subject, SubjectImages, SubjectList};
pub use movies::ListParams;

pub type Result<T> = std::result::Result<T, DoubanError>;
