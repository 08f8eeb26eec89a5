//! Working-directory layout for local-disk mode.

use std::fs;
use std::path::PathBuf;

use crate::config::DirsConfig;
use crate::error::Result;

/// The fixed set of working directories the server expects.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    pub data_dir: PathBuf,
    pub models_dir: PathBuf,
    pub nltk_data_dir: PathBuf,
}

impl WorkspaceLayout {
    #[must_use]
    pub fn from_dirs(dirs: &DirsConfig) -> Self {
        Self {
            data_dir: dirs.data_dir.clone(),
            models_dir: dirs.models_dir.clone(),
            nltk_data_dir: dirs.nltk_data_dir.clone(),
        }
    }

    /// Create every directory, idempotently. Memory-only mode never calls
    /// this; no directories exist in that mode.
    pub fn prepare(&self) -> Result<()> {
        for dir in [&self.data_dir, &self.models_dir, &self.nltk_data_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout_in(root: &std::path::Path) -> WorkspaceLayout {
        WorkspaceLayout {
            data_dir: root.join("data"),
            models_dir: root.join("models"),
            nltk_data_dir: root.join("nltk_data"),
        }
    }

    #[test]
    fn prepare_creates_all_directories() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(dir.path());

        layout.prepare().unwrap();
        assert!(layout.data_dir.is_dir());
        assert!(layout.models_dir.is_dir());
        assert!(layout.nltk_data_dir.is_dir());
    }

    #[test]
    fn prepare_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let layout = layout_in(dir.path());

        layout.prepare().unwrap();
        layout.prepare().unwrap();
        assert!(layout.data_dir.is_dir());
    }
}
