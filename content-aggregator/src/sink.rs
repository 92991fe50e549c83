use crate::types::{ContentItem, ItemSink};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the whole collection as pretty JSON, replacing the previous file.
/// The new content goes to a sibling temp file first and is renamed over
/// the target, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemSink for JsonFileSink {
    fn write_items(&self, items: &[ContentItem]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_string_pretty(items).map_err(io::Error::other)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;

        info!("Wrote {} items to {}", items.len(), self.path.display());
        Ok(())
    }
}
