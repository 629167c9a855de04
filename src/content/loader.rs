//! Content loading
//!
//! Scans a content root laid out as
//!
//! ```text
//! <root>/issues/vol<N>/*.{md,mdx}   articles, N = default volume number
//! <root>/pages/*.{md,mdx}           static pages
//! ```
//!
//! and builds the immutable [`Archive`]. A broken file never aborts the load:
//! it is skipped with a warning and the rest of the archive is still built.

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::types::{Archive, Article, Page, Volume};

/// Files larger than this are skipped (1 MiB)
pub const MAX_FILE_SIZE: u64 = 1 << 20;

const ISSUES_DIR: &str = "issues";
const PAGES_DIR: &str = "pages";
const VOLUME_DIR_PREFIX: &str = "vol";
const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "mdx"];
const FENCE: &str = "---";

/// Why a single file or directory was skipped
#[derive(Debug)]
pub enum LoadError {
    Io { path: PathBuf, message: String },
    /// The path resolves outside the content root (symlink escape)
    OutsideRoot(PathBuf),
    TooLarge { path: PathBuf, size: u64 },
    MissingOpeningFence,
    MissingClosingFence,
    Metadata(String),
    DuplicateSlug(String),
}

impl LoadError {
    fn io(path: &Path, err: io::Error) -> Self {
        LoadError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, message } => write!(f, "{}: {message}", path.display()),
            LoadError::OutsideRoot(path) => write!(
                f,
                "{} resolves outside the content directory",
                path.display()
            ),
            LoadError::TooLarge { path, size } => write!(
                f,
                "{} exceeds max size ({size} > {MAX_FILE_SIZE})",
                path.display()
            ),
            LoadError::MissingOpeningFence => write!(f, "no opening frontmatter fence"),
            LoadError::MissingClosingFence => write!(f, "no closing frontmatter fence"),
            LoadError::Metadata(msg) => write!(f, "cannot parse frontmatter: {msg}"),
            LoadError::DuplicateSlug(slug) => write!(f, "duplicate slug '{slug}'"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Article frontmatter. Every key is optional; YAML `null` counts as missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArticleMeta {
    title: Option<String>,
    author: Option<String>,
    handle: Option<String>,
    date: Option<String>,
    volume: Option<u32>,
    order: Option<i64>,
    category: Option<String>,
    tags: Option<Vec<String>>,
    description: Option<String>,
    draft: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageMeta {
    title: Option<String>,
    description: Option<String>,
}

/// Load everything under `root`.
///
/// Only an unresolvable root short-circuits, and even then an empty archive
/// is returned so sessions can still be served.
pub fn load_archive(root: &Path) -> Archive {
    let root = match fs::canonicalize(root) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("cannot resolve content dir {}: {}", root.display(), e);
            return Archive::default();
        }
    };

    let mut by_volume: BTreeMap<u32, Vec<Article>> = BTreeMap::new();
    // slugs taken per resolved volume, across vol<N> directories
    let mut seen: HashSet<(u32, String)> = HashSet::new();
    let issues_dir = root.join(ISSUES_DIR);
    match sorted_entries(&issues_dir) {
        Ok(entries) => {
            for entry in entries {
                let Some(default_volume) = entry.file_name().to_str().and_then(volume_dir_number)
                else {
                    // _templates and friends
                    continue;
                };
                if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    continue;
                }
                for (path, article) in load_volume_dir(&entry.path(), default_volume, &root) {
                    if article.draft {
                        tracing::debug!("skipping draft {}/{}", article.volume, article.slug);
                        continue;
                    }
                    if !seen.insert((article.volume, article.slug.clone())) {
                        tracing::warn!(
                            "skipping {}: {}",
                            path.display(),
                            LoadError::DuplicateSlug(article.slug)
                        );
                        continue;
                    }
                    by_volume.entry(article.volume).or_default().push(article);
                }
            }
        }
        Err(e) => tracing::warn!("cannot read issues dir {}: {}", issues_dir.display(), e),
    }

    let volumes: Vec<Volume> = by_volume
        .into_iter()
        .map(|(number, mut articles)| {
            // stable: equal orders keep scan order
            articles.sort_by_key(|a| a.order);
            Volume { number, articles }
        })
        .collect();
    let articles = volumes
        .iter()
        .flat_map(|v| v.articles.iter().cloned())
        .collect();

    let pages = load_pages(&root.join(PAGES_DIR), &root);

    let archive = Archive {
        volumes,
        articles,
        pages,
    };
    tracing::info!(
        "content: loaded {} volumes, {} articles, {} pages",
        archive.volumes.len(),
        archive.articles.len(),
        archive.pages.len()
    );
    archive
}

/// Volume number encoded in a directory name like `vol12`
pub fn volume_dir_number(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(VOLUME_DIR_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn load_volume_dir(dir: &Path, default_volume: u32, root: &Path) -> Vec<(PathBuf, Article)> {
    let entries = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("cannot read dir {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut articles = Vec::new();
    for path in entries.iter().map(|e| e.path()).filter(|p| is_document(p)) {
        let result = read_document(&path, root)
            .and_then(|text| parse_article(&text, &slug_of(&path), default_volume));
        match result {
            Ok(article) => articles.push((path, article)),
            Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
        }
    }
    articles
}

fn load_pages(dir: &Path, root: &Path) -> Vec<Page> {
    let entries = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("cannot read pages dir {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut pages = Vec::new();
    for path in entries.iter().map(|e| e.path()).filter(|p| is_document(p)) {
        let slug = slug_of(&path);
        if !seen.insert(slug.clone()) {
            tracing::warn!(
                "skipping page {}: {}",
                path.display(),
                LoadError::DuplicateSlug(slug)
            );
            continue;
        }
        match read_document(&path, root).and_then(|text| parse_page(&text, &slug)) {
            Ok(page) => pages.push(page),
            Err(e) => tracing::warn!("skipping page {}: {}", path.display(), e),
        }
    }
    pages.sort_by(|a, b| a.slug.cmp(&b.slug));
    pages
}

/// Parse a whole article file. `default_volume` applies when the metadata
/// has no volume (or volume 0).
pub fn parse_article(text: &str, slug: &str, default_volume: u32) -> Result<Article, LoadError> {
    let (block, body) = split_frontmatter(text)?;
    let meta: ArticleMeta = parse_meta(block)?;

    let mut tags: Vec<String> = Vec::new();
    for tag in meta.tags.unwrap_or_default() {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    Ok(Article {
        title: meta.title.unwrap_or_default(),
        author: meta.author.unwrap_or_default(),
        handle: meta.handle.unwrap_or_default(),
        description: meta.description.unwrap_or_default(),
        date: meta
            .date
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok()),
        volume: meta.volume.filter(|v| *v != 0).unwrap_or(default_volume),
        order: meta.order.unwrap_or_default(),
        category: meta.category.unwrap_or_default(),
        tags,
        draft: meta.draft.unwrap_or(false),
        slug: slug.to_string(),
        body: body.to_string(),
    })
}

pub fn parse_page(text: &str, slug: &str) -> Result<Page, LoadError> {
    let (block, body) = split_frontmatter(text)?;
    let meta: PageMeta = parse_meta(block)?;
    Ok(Page {
        title: meta.title.unwrap_or_default(),
        description: meta.description.unwrap_or_default(),
        slug: slug.to_string(),
        body: body.to_string(),
    })
}

fn parse_meta<T: Default + serde::de::DeserializeOwned>(block: &str) -> Result<T, LoadError> {
    if block.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(block).map_err(|e| LoadError::Metadata(e.to_string()))
}

/// Split a document into its metadata block and body.
///
/// Leading whitespace is ignored. The first line must be the `---` fence;
/// the block ends at the next line consisting of `---` (trailing whitespace
/// allowed). The body starts on the line after the closing fence.
pub fn split_frontmatter(text: &str) -> Result<(&str, &str), LoadError> {
    let rest = text
        .trim_start()
        .strip_prefix(FENCE)
        .ok_or(LoadError::MissingOpeningFence)?;
    let opening_tail = rest.split('\n').next().unwrap_or("");
    if !opening_tail.trim().is_empty() {
        return Err(LoadError::MissingOpeningFence);
    }

    let closing = "\n---";
    for (idx, _) in rest.match_indices(closing) {
        let after = &rest[idx + closing.len()..];
        let (line_tail, body) = match after.find('\n') {
            Some(nl) => (&after[..nl], &after[nl + 1..]),
            None => (after, ""),
        };
        if line_tail.trim().is_empty() {
            return Ok((rest[..idx].trim(), body));
        }
    }
    Err(LoadError::MissingClosingFence)
}

/// Read a file that must live under `root` and be at most [`MAX_FILE_SIZE`].
fn read_document(path: &Path, root: &Path) -> Result<String, LoadError> {
    let resolved = fs::canonicalize(path).map_err(|e| LoadError::io(path, e))?;
    if !resolved.starts_with(root) {
        return Err(LoadError::OutsideRoot(path.to_path_buf()));
    }
    let size = fs::metadata(&resolved)
        .map_err(|e| LoadError::io(path, e))?
        .len();
    if size > MAX_FILE_SIZE {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            size,
        });
    }
    fs::read_to_string(&resolved).map_err(|e| LoadError::io(path, e))
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn is_document(path: &Path) -> bool {
    let known = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext));
    known && !path.is_dir()
}

fn slug_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
