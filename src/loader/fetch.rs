//! Byte sources for image loading.

use std::path::{Path, PathBuf};

use super::LoadError;

/// Retrieves the raw bytes behind an image URL.
///
/// Implementations must be shareable with the decoder thread.
pub trait ImageFetcher: Send + 'static {
    /// Short identifier used in log messages.
    fn id(&self) -> &'static str;

    /// Whether this fetcher understands `url`.
    fn can_fetch(&self, url: &str) -> bool;

    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError>;
}

/// Reads images from the local filesystem.
///
/// Accepts plain paths and `file://` URLs. Relative paths resolve against
/// `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    root: Option<PathBuf>,
}

impl FileFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let raw = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(raw);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageFetcher for FileFetcher {
    fn id(&self) -> &'static str {
        "file"
    }

    fn can_fetch(&self, url: &str) -> bool {
        url.starts_with("file://") || !url.contains("://")
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        if !self.can_fetch(url) {
            return Err(LoadError::Fetch {
                url: url.to_string(),
                reason: "unsupported URL scheme".to_string(),
            });
        }
        let path = self.resolve(url);
        std::fs::read(&path).map_err(|e| LoadError::Fetch {
            url: url.to_string(),
            reason: format!("{} ({})", e, path.display()),
        })
    }
}
