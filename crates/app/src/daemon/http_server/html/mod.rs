use axum::routing::{get, post};
use axum::Router;

mod delete;
mod document;
mod editor;
mod index;
mod new;
pub mod page;
mod users;

use crate::ServiceState;

/// Document and account pages.
///
/// Static segments win over `:name` during matching, so a document literally
/// named `new` can't be viewed through `/new`.
pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/new", get(new::show).post(new::create))
        .route("/users/signin", get(users::show).post(users::sign_in))
        .route("/users/signout", post(users::sign_out))
        .route("/delete/:name", post(delete::handler))
        .route("/:name", get(document::handler))
        .route("/:name/edit", get(editor::show).post(editor::update))
        .with_state(state)
}
