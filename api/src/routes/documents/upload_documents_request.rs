use base64::{Engine, engine::general_purpose::STANDARD};
use contextor::IngestReport;
use doc_prep::PdfSource;
use serde::{Deserialize, Serialize};

use crate::error_handler::AppError;

/// JSON form of /documents for several PDFs at once.
#[derive(Debug, Deserialize)]
pub struct UploadBatch {
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    /// Standard base64 of the PDF bytes.
    pub content_base64: String,
}

impl UploadBatch {
    /// Decodes every file, keeping upload order.
    pub fn into_sources(self) -> Result<Vec<PdfSource>, AppError> {
        if self.files.is_empty() {
            return Err(AppError::BadRequest("no files in upload".into()));
        }
        self.files
            .into_iter()
            .map(|f| {
                let bytes = STANDARD.decode(f.content_base64.trim()).map_err(|e| {
                    AppError::BadRequest(format!("{}: invalid base64 content: {e}", f.name))
                })?;
                Ok(PdfSource::bytes(f.name, bytes))
            })
            .collect()
    }
}

/// Response payload for /documents.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub report: IngestReport,
}
