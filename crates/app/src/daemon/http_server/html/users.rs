use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::instrument;

use super::page::{redirect_home, HtmlError, HtmlPage};
use crate::daemon::http_server::session::Session;
use crate::ServiceState;

const INVALID_CREDENTIALS: &str = "Invalid Credentials.";

#[derive(Template)]
#[template(path = "signin.html")]
pub struct SignInTemplate {
    pub flash: Option<String>,
    pub username: String,
}

#[derive(Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[instrument(skip_all)]
pub async fn show(mut session: Session) -> impl IntoResponse {
    let template = SignInTemplate {
        flash: session.take_flash(),
        username: String::new(),
    };
    (session, HtmlPage::ok(template))
}

#[instrument(skip_all)]
pub async fn sign_in(
    State(state): State<ServiceState>,
    mut session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Response, HtmlError> {
    if state
        .credentials()
        .verify(&form.username, &form.password)
        .await?
    {
        tracing::info!(user = %form.username, "user signed in");
        session.sign_in(form.username);
        session.set_flash("Welcome!");
        return Ok((session, redirect_home()).into_response());
    }

    tracing::warn!(user = %form.username, "failed sign-in attempt");
    session.take_flash();
    let template = SignInTemplate {
        flash: Some(INVALID_CREDENTIALS.to_string()),
        username: form.username,
    };
    Ok((session, HtmlPage::unprocessable(template)).into_response())
}

#[instrument(skip_all)]
pub async fn sign_out(mut session: Session) -> Response {
    if let Some(user) = session.current_user() {
        tracing::info!(user, "user signed out");
    }
    session.sign_out();
    session.set_flash("You have signed out.");
    (session, redirect_home()).into_response()
}
