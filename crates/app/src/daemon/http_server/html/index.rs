use askama::Template;
use tracing::instrument;

use super::page::{Documents, HtmlPage};
use crate::daemon::http_server::session::Session;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub flash: Option<String>,
    pub documents: Vec<String>,
    pub username: Option<String>,
}

#[instrument(skip_all)]
pub async fn handler(
    mut session: Session,
    Documents(documents): Documents,
) -> (Session, HtmlPage<IndexTemplate>) {
    let template = IndexTemplate {
        flash: session.take_flash(),
        documents,
        username: session.current_user().map(str::to_string),
    };

    (session, HtmlPage::ok(template))
}
