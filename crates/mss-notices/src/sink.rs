use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::Notice;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize notices: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No notices-data placeholder in {}", .0.display())]
    PlaceholderMissing(PathBuf),
}

static RE_NOTICES_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(<script type="application/json" id="notices-data">)(.*?)(</script>)"#)
        .expect("invalid regex: notices-data placeholder")
});

/// Receives the finished notice collection.
pub trait NoticeSink {
    fn publish(&self, notices: &[Notice]) -> Result<(), SinkError>;
}

/// Pretty-printed JSON array of `{title, date, content}` objects.
pub fn to_json(notices: &[Notice]) -> Result<String, SinkError> {
    Ok(serde_json::to_string_pretty(notices)?)
}

/// Replaces the body of every `notices-data` script block with `json`.
///
/// Returns `None` when the document has no such block.
pub fn embed_json(document: &str, json: &str) -> Option<String> {
    if !RE_NOTICES_DATA.is_match(document) {
        return None;
    }
    let replaced = RE_NOTICES_DATA.replace_all(document, |caps: &Captures| {
        format!("{}\n{}\n{}", &caps[1], json, &caps[3])
    });
    Some(replaced.into_owned())
}

fn read(path: &Path) -> Result<String, SinkError> {
    fs::read_to_string(path).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), SinkError> {
    fs::write(path, contents).map_err(|source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the collection to a standalone JSON file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NoticeSink for JsonFile {
    fn publish(&self, notices: &[Notice]) -> Result<(), SinkError> {
        let json = to_json(notices)?;
        write(&self.path, &json)?;
        log::info!("Wrote {} notice(s) to {}", notices.len(), self.path.display());
        Ok(())
    }
}

/// Splices the collection into the `notices-data` block of an existing page.
///
/// The page is only rewritten when the block exists.
#[derive(Debug, Clone)]
pub struct HtmlEmbed {
    path: PathBuf,
}

impl HtmlEmbed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NoticeSink for HtmlEmbed {
    fn publish(&self, notices: &[Notice]) -> Result<(), SinkError> {
        let document = read(&self.path)?;
        let json = to_json(notices)?;
        let updated = embed_json(&document, &json)
            .ok_or_else(|| SinkError::PlaceholderMissing(self.path.clone()))?;
        write(&self.path, &updated)?;
        log::info!("Embedded {} notice(s) into {}", notices.len(), self.path.display());
        Ok(())
    }
}
