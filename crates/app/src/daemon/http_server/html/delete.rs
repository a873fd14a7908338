use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use super::page::{redirect_home, HtmlError};
use crate::daemon::http_server::session::{Session, SignedIn};
use crate::ServiceState;

#[instrument(skip(state, session))]
pub async fn handler(
    SignedIn(user): SignedIn,
    State(state): State<ServiceState>,
    mut session: Session,
    Path(name): Path<String>,
) -> Result<Response, HtmlError> {
    state.documents().delete(&name).await?;
    tracing::info!(user = %user, document = %name, "document deleted");

    session.set_flash(format!("{} was deleted.", name));
    Ok((session, redirect_home()).into_response())
}
