use axum::{
    extract::{rejection::JsonRejection, Query},
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::ResumeDraft;
use crate::preview::html::{render_document, FrameStyle};
use crate::preview::render;

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// Render with print framing (no rounded corners or shadow).
    #[serde(default)]
    pub print: bool,
}

/// POST /api/preview
///
/// Renders the posted draft as a standalone HTML page.
pub async fn handle_preview(
    Query(query): Query<PreviewQuery>,
    payload: Result<Json<ResumeDraft>, JsonRejection>,
) -> Result<Html<String>, AppError> {
    let Json(draft) = payload.map_err(draft_rejection)?;

    let frame = if query.print {
        FrameStyle::print()
    } else {
        FrameStyle::screen()
    };
    let preview = render(&draft);
    debug!(placeholder = preview.layout().is_none(), "Rendering preview");

    Ok(Html(render_document(&preview, frame)))
}

/// Maps a body that is not a draft to a 400 carrying the parser's reason.
pub fn draft_rejection(rejection: JsonRejection) -> AppError {
    AppError::Validation(format!("Invalid resume draft: {}", rejection.body_text()))
}
