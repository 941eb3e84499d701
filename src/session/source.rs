// SPDX-License-Identifier: MPL-2.0
//! Normalization of user selections into loadable document sources.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::application::port::DocumentPayload;
use crate::domain::document::FileMetadata;
use crate::error::SessionError;

/// Where a document selection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    LocalFile,
    Gallery,
    Sample,
    /// A remote document addressed directly by URL.
    Url,
}

impl SourceOrigin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceOrigin::LocalFile => "local_file",
            SourceOrigin::Gallery => "gallery",
            SourceOrigin::Sample => "sample",
            SourceOrigin::Url => "url",
        }
    }
}

/// A file picked by the user, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    name: String,
    bytes: Arc<[u8]>,
}

impl LocalFile {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, keeping only its final path component as name.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::FileRead`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, SessionError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = fs::read(path).map_err(|err| SessionError::FileRead {
            filename: name.clone(),
            cause: err.to_string(),
        })?;
        Ok(Self::new(name, bytes))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Payload plus the filename used for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub payload: DocumentPayload,
    pub filename: String,
    pub origin: SourceOrigin,
}

impl DocumentSource {
    /// A catalog or gallery entry, fetched by the engine from its path.
    #[must_use]
    pub fn from_metadata(meta: &FileMetadata, origin: SourceOrigin) -> Self {
        Self {
            payload: DocumentPayload::Url(meta.path().to_string()),
            filename: meta.file_name(),
            origin,
        }
    }

    #[must_use]
    pub fn from_local(file: LocalFile) -> Self {
        Self {
            payload: DocumentPayload::Bytes(file.bytes),
            filename: file.name,
            origin: SourceOrigin::LocalFile,
        }
    }

    /// A remote document addressed by URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            payload: DocumentPayload::Url(url.into()),
            filename: filename.into(),
            origin: SourceOrigin::Url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn metadata_source_uses_path_and_full_file_name() {
        let meta = FileMetadata::new("budget", "Budget", "/files/budget.xlsx", "xlsx");
        let source = DocumentSource::from_metadata(&meta, SourceOrigin::Gallery);

        assert_eq!(source.filename, "budget.xlsx");
        assert_eq!(
            source.payload,
            DocumentPayload::Url("/files/budget.xlsx".to_string())
        );
        assert_eq!(source.origin, SourceOrigin::Gallery);
    }

    #[test]
    fn local_source_keeps_bytes_and_name() {
        let source = DocumentSource::from_local(LocalFile::new("notes.csv", b"a,b\n1,2".to_vec()));

        assert_eq!(source.filename, "notes.csv");
        assert_eq!(source.origin, SourceOrigin::LocalFile);
        assert_eq!(source.payload.describe(), "7 bytes");
    }

    #[test]
    fn url_source_is_labelled_as_url() {
        let source = DocumentSource::from_url("https://cdn.test/q3.xlsx", "q3.xlsx");

        assert_eq!(source.origin, SourceOrigin::Url);
        assert_eq!(source.origin.as_str(), "url");
    }

    #[test]
    fn read_loads_file_contents() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("ledger.xlsx");
        let mut file = fs::File::create(&path).expect("create file");
        file.write_all(b"PK\x03\x04").expect("write file");

        let local = LocalFile::read(&path).expect("read file");
        assert_eq!(local.name(), "ledger.xlsx");
        assert_eq!(local.len(), 4);
    }

    #[test]
    fn read_missing_file_reports_name() {
        let dir = tempdir().expect("temp dir");
        let err = LocalFile::read(&dir.path().join("missing.pdf")).expect_err("missing");

        assert!(matches!(
            err,
            SessionError::FileRead { ref filename, .. } if filename == "missing.pdf"
        ));
    }
}
