use askama::Template;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use common::prelude::TEXT_CONTENT_TYPE;

use super::super::html::page::HtmlPage;

#[derive(Template)]
#[template(path = "pages/not_found.html")]
struct NotFoundTemplate {
    flash: Option<String>,
}

/// Fallback for unrouted paths, answering in whatever format the client asked for.
pub async fn not_found_handler(headers: HeaderMap) -> Response {
    let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());

    match accept {
        Some(accept_str) if accept_str.contains("application/json") => {
            let err_msg = serde_json::json!({"msg": "not found"});
            (StatusCode::NOT_FOUND, Json(err_msg)).into_response()
        }
        Some(accept_str) if accept_str.contains("text/html") => {
            HtmlPage::new(StatusCode::NOT_FOUND, NotFoundTemplate { flash: None }).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, TEXT_CONTENT_TYPE)],
            "not found",
        )
            .into_response(),
    }
}
