// ── Poster draft ──

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// What the poster tab shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterPreview {
    None,
    /// The poster currently stored on the server.
    Remote(String),
    /// A local file selected but not yet saved.
    Local(PathBuf),
}

/// A pending poster file plus the event's current remote poster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosterDraft {
    remote: Option<String>,
    pending: Option<PathBuf>,
}

impl PosterDraft {
    pub fn new(remote: Option<String>) -> Self {
        Self {
            remote: remote.filter(|url| !url.is_empty()),
            pending: None,
        }
    }

    /// Select a local image to upload. The file must exist.
    pub fn select_file(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CoreError::validation(format!(
                "{} is not a readable file",
                path.display()
            )));
        }
        self.pending = Some(path.to_path_buf());
        Ok(())
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&Path> {
        self.pending.as_deref()
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    pub fn preview(&self) -> PosterPreview {
        match (&self.pending, &self.remote) {
            (Some(path), _) => PosterPreview::Local(path.clone()),
            (None, Some(url)) => PosterPreview::Remote(url.clone()),
            (None, None) => PosterPreview::None,
        }
    }

    /// Record a completed upload + association of `uploaded`. A different
    /// file picked meanwhile stays pending.
    pub fn commit(&mut self, poster_url: String, uploaded: &Path) {
        self.remote = Some(poster_url);
        if self.pending.as_deref() == Some(uploaded) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn preview_prefers_pending_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("new.png");
        std::fs::write(&file, b"png").unwrap();

        let mut draft = PosterDraft::new(Some("https://cdn/old.png".into()));
        assert_eq!(draft.preview(), PosterPreview::Remote("https://cdn/old.png".into()));

        draft.select_file(&file).unwrap();
        assert_eq!(draft.preview(), PosterPreview::Local(file.clone()));
        assert!(draft.is_dirty());

        draft.commit("https://cdn/new.png".into(), &file);
        assert_eq!(draft.preview(), PosterPreview::Remote("https://cdn/new.png".into()));
        assert!(!draft.is_dirty());
    }

    #[test]
    fn missing_file_is_rejected() {
        let mut draft = PosterDraft::new(None);
        assert!(draft.select_file("/nonexistent/poster.png").is_err());
        assert_eq!(draft.preview(), PosterPreview::None);
    }

    #[test]
    fn empty_remote_url_means_no_poster() {
        assert_eq!(PosterDraft::new(Some(String::new())).preview(), PosterPreview::None);
    }
}
