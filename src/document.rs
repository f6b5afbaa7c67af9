use crate::error::LoadError;
use crate::{ResValue, statics};
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Raw text of a resource file, read but not yet parsed.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: Option<PathBuf>,
    pub text: String,
}

impl SourceText {
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|e| LoadError::FileUnreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        debug!(path = %path.display(), len = text.len(), "read resource");
        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
        })
    }
}

/// A parsed resource document held for the length of an edit session.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub source_path: Option<PathBuf>,
    pub root: ResValue,
    pub dirty: bool,
}

impl LoadedDocument {
    pub fn parse(source: SourceText) -> Result<Self, LoadError> {
        let root = ResValue::parse(&source.text).map_err(LoadError::InvalidJson)?;
        Ok(Self {
            source_path: source.path,
            root,
            dirty: false,
        })
    }

    pub fn load_path(path: &Path) -> Result<Self, LoadError> {
        Self::parse(SourceText::read(path)?)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// File name offered when saving: the loaded file's name, or the default.
    pub fn file_name(&self) -> String {
        self.source_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| statics::DEFAULT_FILE_NAME.to_string())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.root.to_pretty_json().into_bytes()
    }

    pub fn save_to_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let bytes = self.to_bytes();
        fs::write(path, &bytes).with_context(|| format!("writing {path:?}"))?;
        info!(path = %path.display(), bytes = bytes.len(), "saved resource");

        self.source_path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }
}
