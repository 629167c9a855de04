// Content root fixtures

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary content root with `issues/` and `pages/`
pub struct ContentRoot {
    _temp_dir: TempDir,
    pub path: PathBuf,
}

impl ContentRoot {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("content");
        fs::create_dir_all(path.join("issues"))?;
        fs::create_dir_all(path.join("pages"))?;
        Ok(ContentRoot {
            _temp_dir: temp_dir,
            path,
        })
    }

    /// Directory outside the content root, for symlink escapes
    pub fn outside(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Write `issues/<dir>/<file>` verbatim
    pub fn raw_article(&self, dir: &str, file: &str, text: &str) -> anyhow::Result<PathBuf> {
        let dir = self.path.join("issues").join(dir);
        fs::create_dir_all(&dir)?;
        let path = dir.join(file);
        fs::write(&path, text)?;
        Ok(path)
    }

    /// Write an article with the given frontmatter lines and body
    pub fn article(
        &self,
        dir: &str,
        file: &str,
        frontmatter: &str,
        body: &str,
    ) -> anyhow::Result<PathBuf> {
        self.raw_article(dir, file, &format!("---\n{frontmatter}\n---\n{body}"))
    }

    /// Write `pages/<file>`
    pub fn page(&self, file: &str, title: &str, body: &str) -> anyhow::Result<PathBuf> {
        let path = self.path.join("pages").join(file);
        fs::write(&path, format!("---\ntitle: {title}\n---\n{body}"))?;
        Ok(path)
    }

    /// The small archive most navigation tests run against: two volumes
    /// and an about page
    pub fn sample() -> anyhow::Result<Self> {
        let root = Self::new()?;
        root.article(
            "vol1",
            "01-intro.md",
            "title: Intro\nauthor: Acid Burn\ncategory: editorial\norder: 1",
            "# Welcome\n\nFirst issue.\n",
        )?;
        root.article(
            "vol1",
            "02-stack.md",
            "title: Smashing the Stack\nauthor: Aleph\nhandle: aleph1\ncategory: exploit\norder: 2\ntags: [memory, c]",
            &long_body(60),
        )?;
        root.article(
            "vol1",
            "03-radio.md",
            "title: Radio Hacking\nauthor: Zero Cool\ncategory: hardware\norder: 3",
            "Tune in.\n",
        )?;
        root.article(
            "vol2",
            "01-phreak.md",
            "title: Phreaking Today\nauthor: Phiber\ncategory: history\norder: 1",
            "Blue boxes.\n",
        )?;
        root.page("about.md", "About", "A zine about terminals.\n")?;
        Ok(root)
    }
}

/// Markdown with `paragraphs` numbered paragraphs
pub fn long_body(paragraphs: usize) -> String {
    (1..=paragraphs)
        .map(|i| format!("Paragraph {i} of the article.\n\n"))
        .collect()
}
