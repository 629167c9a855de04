//! Archive content: data model, loading, text rewriting and search

pub mod loader;
pub mod search;
pub mod transform;
pub mod types;

pub use loader::{load_archive, LoadError, MAX_FILE_SIZE};
pub use search::{search, SearchHit};
pub use transform::{article_url, transform};
pub use types::{Archive, Article, Page, Volume};
