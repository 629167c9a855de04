//! Article search
//!
//! Case-insensitive substring matching over article metadata, the same
//! algorithm the website's search overlay uses. There is no index to keep in
//! sync: every query scans the archive's flat article list.

use super::types::{Archive, Article};

/// A matched article and the volume it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub article: &'a Article,
    pub volume: u32,
}

/// Search titles, descriptions, authors, handles, categories and tags.
///
/// An empty query matches nothing. Hits come back in archive order
/// (volume, then order within the volume).
pub fn search<'a>(archive: &'a Archive, query: &str) -> Vec<SearchHit<'a>> {
    if query.is_empty() {
        return Vec::new();
    }

    let query = query.to_lowercase();
    archive
        .articles
        .iter()
        .filter(|a| matches(a, &query))
        .map(|article| SearchHit {
            article,
            volume: article.volume,
        })
        .collect()
}

/// `query` must already be lower-cased
fn matches(article: &Article, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);
    contains(&article.title)
        || contains(&article.description)
        || contains(&article.author)
        || contains(&article.handle)
        || contains(&article.category)
        || article.tags.iter().any(|t| contains(t))
}
