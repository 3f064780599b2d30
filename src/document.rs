// ABOUTME: Reads the note to publish from disk
// ABOUTME: Derives title, wiki path, and frontmatter tags from a Markdown file

use crate::model::{Document, TagValue};
use crate::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path};

#[derive(Debug, Default, Deserialize)]
struct NoteFrontmatter {
    #[serde(default)]
    tags: Option<TagValue>,
}

pub fn load_document(file: &Path, root: &Path) -> Result<Document> {
    let is_markdown = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false);

    if !is_markdown || !file.is_file() {
        return Err(Error::Document(format!(
            "No Markdown file to publish: {}",
            file.display()
        )));
    }

    let content = fs::read_to_string(file)?;
    let title = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Resolve symlinks and `..` so the prefix check is reliable.
    let file_abs = fs::canonicalize(file)?;
    let root_abs = fs::canonicalize(root)?;
    let path = wiki_path(&file_abs, &root_abs)?;

    let tags = read_tags(&content)?;

    Ok(Document {
        title,
        path,
        content,
        tags,
    })
}

/// `/` + path relative to `root`, forward slashes, no `.md` suffix.
pub fn wiki_path(file: &Path, root: &Path) -> Result<String> {
    let relative = file.strip_prefix(root).map_err(|_| {
        Error::Document(format!(
            "{} is not under root {}",
            file.display(),
            root.display()
        ))
    })?;

    let joined = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let trimmed = joined.strip_suffix(".md").unwrap_or(&joined);
    Ok(format!("/{}", trimmed))
}

fn frontmatter_block(content: &str) -> Option<&str> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    if let Some(end_pos) = rest.find("\n---") {
        let after = &rest[end_pos + 4..];
        if after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n") {
            return Some(&rest[..end_pos]);
        }
    }
    None
}

pub fn read_tags(content: &str) -> Result<Vec<String>> {
    let yaml = match frontmatter_block(content) {
        Some(yaml) if !yaml.trim().is_empty() => yaml,
        _ => return Ok(Vec::new()),
    };

    let fm: NoteFrontmatter = serde_yaml::from_str(yaml)
        .map_err(|e| Error::Document(format!("Failed to parse frontmatter: {}", e)))?;

    Ok(fm.tags.map(TagValue::into_vec).unwrap_or_default())
}
