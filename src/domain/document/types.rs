// SPDX-License-Identifier: MPL-2.0
//! Core document types for the domain layer.
//!
//! These types describe documents without any knowledge of how the viewer
//! engine renders them.

use std::hash::{Hash, Hasher};

/// Kind of document, derived from the filename extension on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Workbook or delimited sheet (XLSX, XLS, CSV).
    Spreadsheet,
    /// Anything the engine renders with its generic loader (PDF, DOCX, images...).
    GenericDocument,
}

impl DocumentKind {
    /// Returns true if the spreadsheet editor applies to this kind.
    #[must_use]
    pub fn is_spreadsheet(self) -> bool {
        matches!(self, Self::Spreadsheet)
    }
}

/// Metadata describing one selectable document.
///
/// Instances are immutable once built. Two records describe the same document
/// when their `path` matches, regardless of display fields.
///
/// # Example
///
/// ```
/// use viewer_session::domain::document::FileMetadata;
///
/// let meta = FileMetadata::new(
///     "annual_financial_report",
///     "Annual Financial Report",
///     "/files/annual_financial_report.xlsx",
///     "xlsx",
/// )
/// .with_id(1);
///
/// assert_eq!(meta.file_name(), "annual_financial_report.xlsx");
/// assert_eq!(meta.id(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct FileMetadata {
    name: String,
    display_name: String,
    /// Local blob reference or remote URL.
    path: String,
    extension: String,
    display_extension: Option<String>,
    id: Option<u32>,
    thumbnail: Option<String>,
}

impl FileMetadata {
    /// Creates metadata with the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        path: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            path: path.into(),
            extension: extension.into(),
            display_extension: None,
            id: None,
            thumbnail: None,
        }
    }

    /// Sets the extension label shown to users (e.g. "Excel").
    #[must_use]
    pub fn with_display_extension(mut self, display_extension: impl Into<String>) -> Self {
        self.display_extension = Some(display_extension.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[must_use]
    pub fn display_extension(&self) -> Option<&str> {
        self.display_extension.as_deref()
    }

    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.thumbnail.as_deref()
    }

    /// Returns the filename handed to the engine.
    ///
    /// The `name` is used as-is when it already ends with `.{extension}`,
    /// otherwise the extension is appended. An empty extension leaves the
    /// name untouched.
    #[must_use]
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            return self.name.clone();
        }
        let suffix = format!(".{}", self.extension);
        if self
            .name
            .to_lowercase()
            .ends_with(&suffix.to_lowercase())
        {
            self.name.clone()
        } else {
            format!("{}{suffix}", self.name)
        }
    }
}

impl PartialEq for FileMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FileMetadata {}

impl Hash for FileMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
