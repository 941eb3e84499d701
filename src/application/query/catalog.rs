// SPDX-License-Identifier: MPL-2.0
//! Document source catalog.
//!
//! Holds the ordered sample set offered at startup and the gallery entries
//! shown in the picker. The catalog only hands out [`FileMetadata`]; it never
//! talks to the engine.

use crate::domain::document::FileMetadata;

/// Ordered registry of selectable documents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleCatalog {
    samples: Vec<FileMetadata>,
    gallery: Vec<FileMetadata>,
}

impl SampleCatalog {
    /// Creates a catalog from explicit entries.
    #[must_use]
    pub fn new(samples: Vec<FileMetadata>, gallery: Vec<FileMetadata>) -> Self {
        Self { samples, gallery }
    }

    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let samples = vec![
            FileMetadata::new(
                "annual_financial_report.xlsx",
                "Annual Financial Report",
                "/files/samples/annual_financial_report.xlsx",
                "xlsx",
            )
            .with_id(1)
            .with_display_extension("Excel")
            .with_thumbnail("/files/thumbnails/annual_financial_report.png"),
            FileMetadata::new(
                "quarterly_sales.csv",
                "Quarterly Sales",
                "/files/samples/quarterly_sales.csv",
                "csv",
            )
            .with_id(2)
            .with_display_extension("CSV")
            .with_thumbnail("/files/thumbnails/quarterly_sales.png"),
            FileMetadata::new(
                "inventory_2019.xls",
                "Inventory 2019",
                "/files/samples/inventory_2019.xls",
                "xls",
            )
            .with_id(3)
            .with_display_extension("Excel 97-2003"),
            FileMetadata::new(
                "service_agreement.pdf",
                "Service Agreement",
                "/files/samples/service_agreement.pdf",
                "pdf",
            )
            .with_id(4)
            .with_display_extension("PDF"),
        ];

        let gallery = vec![
            FileMetadata::new(
                "budget_template.xlsx",
                "Budget Template",
                "/files/gallery/budget_template.xlsx",
                "xlsx",
            )
            .with_id(101)
            .with_thumbnail("/files/thumbnails/budget_template.png"),
            FileMetadata::new(
                "project_plan.docx",
                "Project Plan",
                "/files/gallery/project_plan.docx",
                "docx",
            )
            .with_id(102)
            .with_display_extension("Word"),
        ];

        Self::new(samples, gallery)
    }

    /// Ordered sample documents.
    #[must_use]
    pub fn samples(&self) -> &[FileMetadata] {
        &self.samples
    }

    /// Gallery picker entries.
    #[must_use]
    pub fn gallery(&self) -> &[FileMetadata] {
        &self.gallery
    }

    /// The document loaded automatically once the engine is ready: the first sample.
    #[must_use]
    pub fn default_selection(&self) -> Option<&FileMetadata> {
        self.samples.first()
    }

    /// Looks up a sample or gallery entry by path.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&FileMetadata> {
        self.samples
            .iter()
            .chain(self.gallery.iter())
            .find(|meta| meta.path() == path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.gallery.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::classify;
    use crate::domain::document::DocumentKind;

    #[test]
    fn builtin_default_is_annual_report() {
        let catalog = SampleCatalog::builtin();
        let default = catalog.default_selection().expect("builtin has samples");
        assert_eq!(default.file_name(), "annual_financial_report.xlsx");
        assert_eq!(
            classify(&default.file_name()).kind,
            DocumentKind::Spreadsheet
        );
    }

    #[test]
    fn default_selection_is_first_sample() {
        let first = FileMetadata::new("a.pdf", "A", "/a.pdf", "pdf");
        let second = FileMetadata::new("b.csv", "B", "/b.csv", "csv");
        let catalog = SampleCatalog::new(vec![first.clone(), second], Vec::new());
        assert_eq!(catalog.default_selection(), Some(&first));
    }

    #[test]
    fn empty_catalog_has_no_default() {
        let catalog = SampleCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.default_selection().is_none());
    }

    #[test]
    fn samples_keep_declared_order() {
        let catalog = SampleCatalog::builtin();
        let ids: Vec<_> = catalog.samples().iter().filter_map(FileMetadata::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn find_searches_samples_and_gallery() {
        let catalog = SampleCatalog::builtin();
        assert!(catalog.find("/files/gallery/project_plan.docx").is_some());
        assert!(catalog.find("/files/samples/quarterly_sales.csv").is_some());
        assert!(catalog.find("/nowhere.pdf").is_none());
    }
}
