use std::io::Write;
use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use odonto_core::report::{write_xlsx, ReportLayout, REPORT_FILE_NAME, XLSX_CONTENT_TYPE};
use serde::Deserialize;

use super::{ApiError, ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct ProcessQuery {
    #[serde(default)]
    pub layout: ReportLayout,
}

/// `POST /process_pdf` with a multipart `file` field.
///
/// The upload is staged under the upload directory for the duration of the
/// request and removed afterwards, whatever the outcome.
pub async fn process_pdf(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ProcessQuery>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((filename, bytes.to_vec()));
    }

    let (filename, bytes) = upload.ok_or_else(|| ApiError::BadRequest("no file uploaded".into()))?;
    if !filename.ends_with(".pdf") {
        return Err(ApiError::BadRequest(
            "invalid file, only PDFs are accepted".into(),
        ));
    }

    tracing::info!(%filename, size = bytes.len(), layout = %query.layout, "processing upload");

    let layout = query.layout;
    let workbook = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let mut staged = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile_in(&state.upload_dir)?;
        staged.write_all(&bytes)?;
        staged.flush()?;

        let report =
            odonto_core::process_pdf_file(staged.path(), state.extractor.as_ref(), &state.options)?;
        Ok(write_xlsx(&report, layout)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("processing task failed: {e}")))??;

    let disposition = format!("attachment; filename=\"{REPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        workbook,
    )
        .into_response())
}
