//! Native file sharing seam.

use crate::error::Result;
use crate::models::config::ExportConfig;

/// A file offered to the platform share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub text: String,
}

impl SharedFile {
    /// Exported PDF with the configured file name and share texts.
    pub fn pdf(bytes: Vec<u8>, export: &ExportConfig) -> Self {
        Self {
            name: export.file_name.clone(),
            mime_type: "application/pdf".to_string(),
            bytes,
            title: export.share_title.clone(),
            text: export.share_text.clone(),
        }
    }
}

/// How a share attempt ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The platform accepted the file.
    Shared,
    /// The user dismissed the share sheet.
    Cancelled,
}

/// Platform share action.
#[allow(async_fn_in_trait)]
pub trait ShareTarget {
    /// Whether the platform can share files of this kind at all.
    fn can_share(&self, file: &SharedFile) -> bool;

    /// Hand the file to the platform. A dismissed sheet is
    /// [`ShareOutcome::Cancelled`], not an error.
    async fn share(&self, file: SharedFile) -> Result<ShareOutcome>;
}
