//! Response building blocks shared by the HTML routes

use askama::Template;
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use common::prelude::{CredentialError, DocumentError, HTML_CONTENT_TYPE, TEXT_CONTENT_TYPE};

use crate::ServiceState;

/// 302 back to the document list.
pub fn redirect_home() -> Response {
    (StatusCode::FOUND, [(LOCATION, "/")]).into_response()
}

/// A rendered askama template served as `text/html;charset=utf-8`.
pub struct HtmlPage<T> {
    status: StatusCode,
    template: T,
}

impl<T: Template> HtmlPage<T> {
    pub fn new(status: StatusCode, template: T) -> Self {
        Self { status, template }
    }

    pub fn ok(template: T) -> Self {
        Self::new(StatusCode::OK, template)
    }

    pub fn unprocessable(template: T) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, template)
    }
}

impl<T: Template> IntoResponse for HtmlPage<T> {
    fn into_response(self) -> Response {
        match self.template.render() {
            Ok(body) => (self.status, [(CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response(),
            Err(e) => HtmlError::Template(e).into_response(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
    #[error("credential error: {0}")]
    Credentials(#[from] CredentialError),
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = match &self {
            HtmlError::Document(DocumentError::InvalidName(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("bad request: {}", self);
        }

        (
            status,
            [(CONTENT_TYPE, TEXT_CONTENT_TYPE)],
            format!("Error: {}", self),
        )
            .into_response()
    }
}

/// Names of every document, listed fresh for this request.
#[derive(Debug, Clone)]
pub struct Documents(pub Vec<String>);

impl Documents {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Documents
where
    ServiceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HtmlError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ServiceState::from_ref(state);
        Ok(Documents(state.documents().list().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Template)]
    #[template(source = "<p>{{ message }}</p>", ext = "html")]
    struct Snippet<'a> {
        message: &'a str,
    }

    #[test]
    fn test_redirect_home_is_302() {
        let response = redirect_home();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[test]
    fn test_page_status_and_content_type() {
        let response = HtmlPage::unprocessable(Snippet {
            message: "<b>nope</b>",
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html;charset=utf-8");
    }

    #[test]
    fn test_error_status() {
        let response = HtmlError::from(DocumentError::InvalidName("../x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let response = HtmlError::from(DocumentError::Io(io)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
