use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::export::export_pdf;
use crate::models::ResumeDraft;
use crate::preview::handlers::draft_rejection;

/// POST /api/export
///
/// Returns the posted draft as a PDF attachment.
pub async fn handle_export(
    payload: Result<Json<ResumeDraft>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(draft) = payload.map_err(draft_rejection)?;

    let export = tokio::task::spawn_blocking(move || export_pdf(&draft))
        .await
        .map_err(|e| anyhow::anyhow!("PDF export task failed: {e}"))??;

    info!(
        filename = %export.filename,
        bytes = export.bytes.len(),
        clipped_lines = export.clipped_lines,
        "Exported resume PDF"
    );

    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.bytes,
    )
        .into_response())
}
