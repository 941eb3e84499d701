// SPDX-License-Identifier: MPL-2.0
//! Filename-based document classification.
//!
//! The session never looks at document bytes: the extension of the filename
//! decides whether the spreadsheet editor applies and which MIME type the
//! engine should be told about.

use crate::domain::document::DocumentKind;

/// Supported spreadsheet extensions and their MIME types.
pub mod extensions {
    /// Spreadsheet file extensions (lowercase).
    pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

    pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
    pub const XLS_MIME: &str = "application/vnd.ms-excel";
    pub const CSV_MIME: &str = "text/csv";

    /// Returns the MIME type for a lowercase spreadsheet extension.
    #[must_use]
    pub fn spreadsheet_mime(extension: &str) -> Option<&'static str> {
        match extension {
            "xlsx" => Some(XLSX_MIME),
            "xls" => Some(XLS_MIME),
            "csv" => Some(CSV_MIME),
            _ => None,
        }
    }
}

/// Result of classifying a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: DocumentKind,
    /// Lowercase extension, empty when the filename has none.
    pub extension: String,
    /// Explicit MIME type; `None` leaves the choice to the engine's default loader.
    pub mime_type: Option<&'static str>,
}

impl Classification {
    #[must_use]
    pub fn is_spreadsheet(&self) -> bool {
        self.kind.is_spreadsheet()
    }
}

/// Returns the lowercase text after the last `.` of `filename`.
///
/// A filename without a dot has no extension and yields an empty string.
#[must_use]
pub fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Classifies a filename into a document kind and MIME type.
///
/// # Example
///
/// ```
/// use viewer_session::document::classify;
/// use viewer_session::domain::document::DocumentKind;
///
/// let sheet = classify("Q3.CSV");
/// assert_eq!(sheet.kind, DocumentKind::Spreadsheet);
/// assert_eq!(sheet.mime_type, Some("text/csv"));
///
/// let pdf = classify("contract.pdf");
/// assert_eq!(pdf.kind, DocumentKind::GenericDocument);
/// assert_eq!(pdf.mime_type, None);
/// ```
#[must_use]
pub fn classify(filename: &str) -> Classification {
    let extension = extension_of(filename);
    match extensions::spreadsheet_mime(&extension) {
        Some(mime) => Classification {
            kind: DocumentKind::Spreadsheet,
            extension,
            mime_type: Some(mime),
        },
        None => Classification {
            kind: DocumentKind::GenericDocument,
            extension,
            mime_type: None,
        },
    }
}

/// Returns true if the filename names a spreadsheet.
#[must_use]
pub fn is_spreadsheet_file(filename: &str) -> bool {
    classify(filename).is_spreadsheet()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xlsx_is_spreadsheet_with_openxml_mime() {
        let result = classify("annual_financial_report.xlsx");
        assert_eq!(result.kind, DocumentKind::Spreadsheet);
        assert_eq!(result.mime_type, Some(extensions::XLSX_MIME));
        assert_eq!(result.extension, "xlsx");
    }

    #[test]
    fn xls_is_spreadsheet_with_excel_mime() {
        let result = classify("legacy.xls");
        assert_eq!(result.kind, DocumentKind::Spreadsheet);
        assert_eq!(result.mime_type, Some("application/vnd.ms-excel"));
    }

    #[test]
    fn csv_is_spreadsheet_with_text_mime() {
        let result = classify("report.csv");
        assert_eq!(result.kind, DocumentKind::Spreadsheet);
        assert_eq!(result.mime_type, Some("text/csv"));
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(classify("X.XLSX"), classify("x.xlsx"));
        assert!(is_spreadsheet_file("Budget.XlS"));
    }

    #[test]
    fn pdf_is_generic_with_engine_default() {
        let result = classify("report.pdf");
        assert_eq!(result.kind, DocumentKind::GenericDocument);
        assert_eq!(result.mime_type, None);
    }

    #[test]
    fn missing_extension_is_generic_and_empty() {
        let result = classify("report");
        assert_eq!(result.kind, DocumentKind::GenericDocument);
        assert_eq!(result.extension, "");
        assert_eq!(result.mime_type, None);
    }

    #[test]
    fn bare_extension_word_is_not_an_extension() {
        assert_eq!(classify("xlsx").kind, DocumentKind::GenericDocument);
    }

    #[test]
    fn only_last_segment_counts() {
        assert_eq!(classify("data.csv.pdf").kind, DocumentKind::GenericDocument);
        assert_eq!(classify("notes.pdf.csv").kind, DocumentKind::Spreadsheet);
    }

    #[test]
    fn trailing_dot_and_empty_name() {
        assert_eq!(extension_of("report."), "");
        assert_eq!(classify("").kind, DocumentKind::GenericDocument);
        assert_eq!(classify(".csv").kind, DocumentKind::Spreadsheet);
    }

    #[test]
    fn classification_is_deterministic() {
        for name in ["a.xlsx", "b.docx", "c", "d.CSV", "ü.xls"] {
            assert_eq!(classify(name), classify(name));
        }
    }
}
