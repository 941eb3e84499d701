// SPDX-License-Identifier: MPL-2.0
use super::source::LocalFile;
use crate::domain::document::FileMetadata;

/// Input accepted by [`ViewerSession::run`](super::ViewerSession::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// The user picked a file from disk.
    FileSelected(LocalFile),
    /// The user picked a gallery entry.
    GallerySelected(FileMetadata),
    /// The user picked a sample document.
    SampleSelected(FileMetadata),
    /// Tear the session down and leave the loop.
    Shutdown,
}
