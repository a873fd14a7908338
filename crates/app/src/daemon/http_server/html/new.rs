use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::instrument;

use common::prelude::{validate_new_name, DocumentError, NameError};

use super::page::{redirect_home, HtmlError, HtmlPage};
use crate::daemon::http_server::session::{Session, SignedIn};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "new.html")]
pub struct NewTemplate {
    pub flash: Option<String>,
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewForm {
    #[serde(default)]
    pub new_name: String,
}

#[instrument(skip_all)]
pub async fn show(SignedIn(_user): SignedIn, mut session: Session) -> impl IntoResponse {
    let template = NewTemplate {
        flash: session.take_flash(),
        new_name: String::new(),
    };
    (session, HtmlPage::ok(template))
}

#[instrument(skip(state, session))]
pub async fn create(
    SignedIn(user): SignedIn,
    State(state): State<ServiceState>,
    mut session: Session,
    Form(form): Form<NewForm>,
) -> Result<Response, HtmlError> {
    let name = match validate_new_name(&form.new_name) {
        Ok(name) => name,
        Err(e) => return Ok(rejected(session, &form.new_name, e.to_string())),
    };

    match state.documents().create(name).await {
        Ok(()) => {}
        Err(e @ DocumentError::AlreadyExists(_)) => {
            return Ok(rejected(session, name, e.to_string()))
        }
        Err(DocumentError::InvalidName(_)) => {
            return Ok(rejected(session, name, NameError::PathSeparator.to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user = %user, document = %name, "document created");
    session.set_flash(format!("{} has been created.", name));
    Ok((session, redirect_home()).into_response())
}

/// Re-render the form with `message` in place of any pending flash.
fn rejected(mut session: Session, new_name: &str, message: String) -> Response {
    tracing::info!(name = new_name, "new document rejected: {}", message);
    session.take_flash();
    let template = NewTemplate {
        flash: Some(message),
        new_name: new_name.to_string(),
    };
    (session, HtmlPage::unprocessable(template)).into_response()
}
