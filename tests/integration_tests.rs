// Integration tests - loading content roots from disk

mod common;

use common::fixtures::{long_body, ContentRoot};
use terminull::content::{load_archive, search, MAX_FILE_SIZE};

#[test]
fn test_sample_archive_loads() {
    let root = ContentRoot::sample().unwrap();
    let archive = load_archive(&root.path);

    let numbers: Vec<u32> = archive.volumes.iter().map(|v| v.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(archive.volumes[0].articles.len(), 3);
    assert_eq!(archive.articles.len(), 4);
    assert_eq!(archive.pages.len(), 1);

    let stack = &archive.volumes[0].articles[1];
    assert_eq!(stack.slug, "02-stack");
    assert_eq!(stack.handle, "aleph1");
    assert_eq!(stack.tags, vec!["memory", "c"]);
    assert_eq!(stack.body, long_body(60));
}

#[test]
fn test_drafts_are_excluded() {
    let root = ContentRoot::new().unwrap();
    root.article("vol1", "a.md", "title: Live\norder: 1", "x").unwrap();
    root.article("vol1", "b.md", "title: Hidden\ndraft: true", "x")
        .unwrap();

    let archive = load_archive(&root.path);
    assert_eq!(archive.articles.len(), 1);
    assert_eq!(archive.articles[0].title, "Live");
    assert!(search(&archive, "hidden").is_empty());
}

#[test]
fn test_volume_defaults_to_directory() {
    let root = ContentRoot::new().unwrap();
    root.article("vol3", "a.md", "title: No volume", "x").unwrap();
    root.article("vol3", "b.md", "title: Zero\nvolume: 0", "x")
        .unwrap();
    root.article("vol3", "c.md", "title: Moved\nvolume: 7", "x")
        .unwrap();

    let archive = load_archive(&root.path);
    let v3 = archive.volume(3).unwrap();
    assert_eq!(v3.articles.len(), 2);
    let v7 = archive.volume(7).unwrap();
    assert_eq!(v7.articles[0].title, "Moved");
}

#[test]
fn test_sort_order() {
    let root = ContentRoot::new().unwrap();
    root.article("vol10", "a.md", "title: Ten", "x").unwrap();
    root.article("vol2", "z.md", "title: Second\norder: 2", "x")
        .unwrap();
    root.article("vol2", "a.md", "title: Third\norder: 3", "x")
        .unwrap();
    root.article("vol2", "m.md", "title: First\norder: 1", "x")
        .unwrap();

    let archive = load_archive(&root.path);
    let numbers: Vec<u32> = archive.volumes.iter().map(|v| v.number).collect();
    assert_eq!(numbers, vec![2, 10]);
    let titles: Vec<&str> = archive.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third", "Ten"]);
}

#[test]
fn test_equal_orders_keep_file_order() {
    let root = ContentRoot::new().unwrap();
    root.article("vol1", "b.md", "title: B", "x").unwrap();
    root.article("vol1", "a.md", "title: A", "x").unwrap();

    let archive = load_archive(&root.path);
    let titles: Vec<&str> = archive.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[test]
fn test_broken_files_are_skipped() {
    let root = ContentRoot::new().unwrap();
    root.article("vol1", "good.md", "title: Good", "x").unwrap();
    root.raw_article("vol1", "no-fence.md", "title: Nope\n\nbody")
        .unwrap();
    root.raw_article("vol1", "unclosed.md", "---\ntitle: Nope\nbody")
        .unwrap();
    root.article("vol1", "bad-yaml.md", "title: [unclosed", "x")
        .unwrap();
    root.raw_article("vol1", "notes.txt", "---\ntitle: Text\n---\n")
        .unwrap();

    let archive = load_archive(&root.path);
    let titles: Vec<&str> = archive.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Good"]);
}

#[test]
fn test_oversized_file_is_skipped() {
    let root = ContentRoot::new().unwrap();
    let body = "x".repeat(MAX_FILE_SIZE as usize + 1);
    root.article("vol1", "huge.md", "title: Huge", &body).unwrap();
    root.article("vol1", "small.md", "title: Small", "x").unwrap();

    let archive = load_archive(&root.path);
    assert_eq!(archive.articles.len(), 1);
    assert_eq!(archive.articles[0].title, "Small");
}

#[cfg(unix)]
#[test]
fn test_symlink_escape_is_skipped() {
    let root = ContentRoot::new().unwrap();
    let secret = root.outside().join("secret.md");
    std::fs::write(&secret, "---\ntitle: Secret\n---\nshh").unwrap();
    let vol = root.path.join("issues").join("vol1");
    std::fs::create_dir_all(&vol).unwrap();
    std::os::unix::fs::symlink(&secret, vol.join("leak.md")).unwrap();

    // A link that stays inside the root is fine
    let inner = root.article("vol1", "inner.md", "title: Inner", "x").unwrap();
    std::os::unix::fs::symlink(&inner, root.path.join("pages").join("alias.md")).unwrap();

    let archive = load_archive(&root.path);
    let titles: Vec<&str> = archive.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Inner"]);
    assert_eq!(archive.pages.len(), 1);
    assert_eq!(archive.pages[0].slug, "alias");
}

#[test]
fn test_duplicate_slug_keeps_first() {
    let root = ContentRoot::new().unwrap();
    root.article("vol1", "post.md", "title: Markdown", "x").unwrap();
    root.article("vol1", "post.mdx", "title: MDX", "x").unwrap();

    let archive = load_archive(&root.path);
    assert_eq!(archive.articles.len(), 1);
    assert_eq!(archive.articles[0].title, "Markdown");
}

#[test]
fn test_duplicate_slug_across_directories_keeps_first() {
    let root = ContentRoot::new().unwrap();
    root.article("vol1", "intro.md", "title: First\norder: 1", "x")
        .unwrap();
    root.article(
        "vol2",
        "intro.md",
        "title: Second\nvolume: 1\norder: 2\ntags: [unique]",
        "x",
    )
    .unwrap();
    root.article("vol2", "other.md", "title: Stays", "x").unwrap();

    let archive = load_archive(&root.path);
    let v1: Vec<&str> = archive
        .volume(1)
        .unwrap()
        .articles
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(v1, vec!["First"]);
    assert_eq!(archive.volume(2).unwrap().articles[0].title, "Stays");
    assert!(search(&archive, "unique").is_empty());

    // Every article resolves back to itself by slug
    for article in &archive.articles {
        let index = archive
            .article_index(article.volume, &article.slug)
            .unwrap();
        assert_eq!(
            archive.article(article.volume, index).unwrap().title,
            article.title
        );
    }
}

#[test]
fn test_missing_root_gives_empty_archive() {
    let root = ContentRoot::new().unwrap();
    let archive = load_archive(&root.path.join("does-not-exist"));
    assert!(archive.is_empty());
    assert!(archive.articles.is_empty());
}

#[test]
fn test_missing_subdirectories() {
    let root = ContentRoot::new().unwrap();
    std::fs::remove_dir(root.path.join("pages")).unwrap();
    root.article("vol1", "a.md", "title: Only", "x").unwrap();

    let archive = load_archive(&root.path);
    assert_eq!(archive.articles.len(), 1);
    assert!(archive.pages.is_empty());
}

#[test]
fn test_non_volume_directories_are_ignored() {
    let root = ContentRoot::new().unwrap();
    root.article("_templates", "t.md", "title: Template", "x")
        .unwrap();
    root.article("volume1", "t.md", "title: Wrong name", "x")
        .unwrap();
    root.article("vol1", "a.md", "title: Real", "x").unwrap();

    let archive = load_archive(&root.path);
    let titles: Vec<&str> = archive.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Real"]);
}

#[test]
fn test_pages_sorted_by_slug() {
    let root = ContentRoot::new().unwrap();
    root.page("manifesto.md", "Manifesto", "We are").unwrap();
    root.page("about.mdx", "About", "Hi").unwrap();
    std::fs::write(root.path.join("pages").join("readme.txt"), "no").unwrap();

    let archive = load_archive(&root.path);
    let slugs: Vec<&str> = archive.pages.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["about", "manifesto"]);
    assert_eq!(archive.page("about").unwrap().title, "About");
}
