//! Archive data model
//!
//! Everything here is built once by the loader and never mutated afterwards,
//! so the whole [`Archive`] can be shared between sessions behind an `Arc`.

use chrono::NaiveDate;

/// An article of one volume, parsed from a markdown file with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub title: String,
    pub author: String,
    pub handle: String,
    pub description: String,
    /// Publish date, `None` when missing or not a `YYYY-MM-DD` date
    pub date: Option<NaiveDate>,
    pub volume: u32,
    pub order: i64,
    pub category: String,
    /// Tags without duplicates, in the order they were first written
    pub tags: Vec<String>,
    pub draft: bool,
    /// File name without extension, e.g. "01-smashing-the-stack"
    pub slug: String,
    /// Raw markdown after the metadata block
    pub body: String,
}

impl Article {
    /// Publish date formatted for display
    pub fn date_label(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "undated".to_string())
    }
}

/// A static page (about, manifesto, ...)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub body: String,
}

/// Articles grouped by volume number, sorted by their order field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub number: u32,
    pub articles: Vec<Article>,
}

/// All loaded content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    /// Sorted by number ascending
    pub volumes: Vec<Volume>,
    /// Every non-draft article, sorted by (volume, order)
    pub articles: Vec<Article>,
    /// Sorted by slug
    pub pages: Vec<Page>,
}

impl Archive {
    pub fn volume(&self, number: u32) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.number == number)
    }

    pub fn article(&self, volume: u32, index: usize) -> Option<&Article> {
        self.volume(volume).and_then(|v| v.articles.get(index))
    }

    /// Position of the article with `slug` inside its volume
    pub fn article_index(&self, volume: u32, slug: &str) -> Option<usize> {
        self.volume(volume)
            .and_then(|v| v.articles.iter().position(|a| a.slug == slug))
    }

    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Highest volume number, used for the home screen tagline
    pub fn latest_volume(&self) -> Option<u32> {
        self.volumes.last().map(|v| v.number)
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty() && self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(volume: u32, order: i64, slug: &str) -> Article {
        Article {
            title: slug.to_uppercase(),
            volume,
            order,
            slug: slug.to_string(),
            ..Default::default()
        }
    }

    fn archive() -> Archive {
        let v1 = vec![article(1, 1, "intro"), article(1, 2, "shellcode")];
        let v3 = vec![article(3, 1, "radio")];
        Archive {
            articles: v1.iter().chain(v3.iter()).cloned().collect(),
            volumes: vec![
                Volume {
                    number: 1,
                    articles: v1,
                },
                Volume {
                    number: 3,
                    articles: v3,
                },
            ],
            pages: vec![Page {
                title: "About".to_string(),
                slug: "about".to_string(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_lookups() {
        let archive = archive();
        assert_eq!(archive.volume(3).map(|v| v.articles.len()), Some(1));
        assert!(archive.volume(2).is_none());
        assert_eq!(
            archive.article(1, 1).map(|a| a.slug.as_str()),
            Some("shellcode")
        );
        assert!(archive.article(1, 2).is_none());
        assert_eq!(archive.article_index(1, "shellcode"), Some(1));
        assert_eq!(archive.article_index(3, "shellcode"), None);
        assert_eq!(archive.page("about").map(|p| p.title.as_str()), Some("About"));
        assert_eq!(archive.latest_volume(), Some(3));
    }

    #[test]
    fn test_empty_archive() {
        let archive = Archive::default();
        assert!(archive.is_empty());
        assert_eq!(archive.latest_volume(), None);
    }

    #[test]
    fn test_date_label() {
        let mut a = article(1, 1, "x");
        assert_eq!(a.date_label(), "undated");
        a.date = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(a.date_label(), "2024-03-09");
    }
}
