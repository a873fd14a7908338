use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use common::prelude::DocumentError;

use super::page::{redirect_home, Documents, HtmlError};
use crate::daemon::http_server::session::Session;
use crate::ServiceState;

/// Serve a document in its own format: plain text as-is, markdown as HTML.
#[instrument(skip(state, session, documents))]
pub async fn handler(
    State(state): State<ServiceState>,
    mut session: Session,
    documents: Documents,
    Path(name): Path<String>,
) -> Result<Response, HtmlError> {
    if !documents.contains(&name) {
        session.set_flash(DocumentError::NotFound(name).to_string());
        return Ok((session, redirect_home()).into_response());
    }

    match state.documents().render(&name).await {
        Ok(rendered) => Ok((
            StatusCode::OK,
            [(CONTENT_TYPE, rendered.content_type)],
            rendered.body,
        )
            .into_response()),
        // removed between the listing and the read
        Err(e @ DocumentError::NotFound(_)) => {
            session.set_flash(e.to_string());
            Ok((session, redirect_home()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
