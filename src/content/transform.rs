//! Markdown rewriting for terminal display
//!
//! Terminals cannot show images or play media, and the site's admonition
//! syntax means nothing to a plain markdown renderer. [`transform`] rewrites
//! those constructs into text before the body is laid out.
//!
//! Each construct is handled by its own scanning pass:
//!
//! * callouts are line anchored: `>` at the start of a line, optional spaces
//!   or tabs, then `[!KIND]`;
//! * images are free-form: `![alt](target)` anywhere, alt without `]`,
//!   target non-empty and without `)`;
//! * `<video ...>...</video>` and `<audio ...>...</audio>` take the shortest
//!   span to the first closing tag and may cross lines.

/// Callout kinds understood by the site
pub const CALLOUT_KINDS: [&str; 3] = ["WARN", "HACK", "INFO"];

/// Public URL of an article on the website
pub fn article_url(site_url: &str, volume: u32, slug: &str) -> String {
    format!("{site_url}/vol/{volume}/{slug}")
}

/// Rewrite callouts and replace media with placeholders linking to the web
/// version of the article. Total over any input; text without any of the
/// handled constructs comes back unchanged.
pub fn transform(body: &str, site_url: &str, volume: u32, slug: &str) -> String {
    let url = article_url(site_url, volume, slug);
    let text = rewrite_callouts(body);
    let text = replace_images(&text, &url);
    let text = replace_tag_blocks(&text, "video", &format!("[VIDEO] — view at {url}"));
    replace_tag_blocks(&text, "audio", &format!("[AUDIO] — view at {url}"))
}

fn rewrite_callouts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        match rewrite_callout_line(line) {
            Some(rewritten) => out.push_str(&rewritten),
            None => out.push_str(line),
        }
    }
    out
}

/// `> [!WARN] text` becomes `> **[!] WARN:** text`. The line ending and the
/// whitespace after `>` are kept as written.
fn rewrite_callout_line(line: &str) -> Option<String> {
    let after_quote = line.strip_prefix('>')?;
    let ws = after_quote.len() - after_quote.trim_start_matches([' ', '\t']).len();
    let prefix = &line[..1 + ws];
    let marker = after_quote[ws..].strip_prefix("[!")?;
    let close = marker.find(']')?;
    let kind = &marker[..close];
    if !CALLOUT_KINDS.contains(&kind) {
        return None;
    }

    let rest = marker[close + 1..].trim_start_matches([' ', '\t']);
    let (rest, ending) = match rest.strip_suffix('\n') {
        Some(r) => (r, "\n"),
        None => (rest, ""),
    };
    Some(format!("{prefix}**[!] {kind}:** {rest}{ending}"))
}

fn replace_images(text: &str, url: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("![") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match match_image(candidate) {
            Some((alt, len)) => {
                let alt = if alt.is_empty() { "image" } else { alt };
                out.push_str(&format!("[IMAGE: {alt}] — view at {url}"));
                rest = &candidate[len..];
            }
            None => {
                out.push('!');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Match `![alt](target)` at the start of `s`, returning the alt text and
/// the byte length of the whole reference.
fn match_image(s: &str) -> Option<(&str, usize)> {
    let after_open = s.strip_prefix("![")?;
    let alt_end = after_open.find(']')?;
    let alt = &after_open[..alt_end];
    let target = after_open[alt_end + 1..].strip_prefix('(')?;
    let target_end = target.find(')')?;
    if target_end == 0 {
        return None;
    }
    // "![" + alt + "](" + target + ")"
    Some((alt, 2 + alt_end + 2 + target_end + 1))
}

/// Replace every `<tag ...>...</tag>` block with `replacement`.
fn replace_tag_blocks(text: &str, tag: &str, replacement: &str) -> String {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(&open) {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let block_len = candidate[open.len()..].find('>').and_then(|gt| {
            let body_start = open.len() + gt + 1;
            candidate[body_start..]
                .find(&close)
                .map(|end| body_start + end + close.len())
        });
        match block_len {
            Some(len) => {
                out.push_str(replacement);
                rest = &candidate[len..];
            }
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
