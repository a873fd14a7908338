use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::instrument;

use common::prelude::DocumentError;

use super::page::{redirect_home, HtmlError, HtmlPage};
use crate::daemon::http_server::session::{Session, SignedIn};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub flash: Option<String>,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    #[serde(default)]
    pub updated_text: String,
}

#[instrument(skip(state, session))]
pub async fn show(
    SignedIn(_user): SignedIn,
    State(state): State<ServiceState>,
    mut session: Session,
    Path(name): Path<String>,
) -> Result<Response, HtmlError> {
    let document = match state.documents().read(&name).await {
        Ok(document) => document,
        Err(e @ DocumentError::NotFound(_)) => {
            session.set_flash(e.to_string());
            return Ok((session, redirect_home()).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let template = EditTemplate {
        flash: session.take_flash(),
        content: document.text().into_owned(),
        name,
    };
    Ok((session, HtmlPage::ok(template)).into_response())
}

/// Replace the document content; a missing document is created.
#[instrument(skip(state, session, form))]
pub async fn update(
    SignedIn(user): SignedIn,
    State(state): State<ServiceState>,
    mut session: Session,
    Path(name): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<Response, HtmlError> {
    match state
        .documents()
        .write(&name, form.updated_text.as_bytes())
        .await
    {
        Ok(()) => {}
        // something other than a document sits at that name
        Err(e @ DocumentError::NotFound(_)) => {
            session.set_flash(e.to_string());
            return Ok((session, redirect_home()).into_response());
        }
        Err(e) => return Err(e.into()),
    }
    tracing::info!(user = %user, document = %name, "document updated");

    session.set_flash(format!("{} has been updated.", name));
    Ok((session, redirect_home()).into_response())
}
