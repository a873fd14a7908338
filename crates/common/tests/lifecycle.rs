//! A document's life from creation to deletion, through the public API

mod common;

use ::common::prelude::{validate_new_name, DocumentError, DocumentKind, NameError};

#[tokio::test]
async fn test_create_edit_render_delete() {
    let (documents, _, _temp) = common::setup_test_env().await;

    let name = validate_new_name(" notes.md ").unwrap();
    documents.create(name).await.unwrap();
    assert_eq!(documents.list().await.unwrap(), vec!["notes.md"]);

    documents
        .write(name, b"Some **bold** words and a ~~mistake~~.")
        .await
        .unwrap();
    let document = documents.read(name).await.unwrap();
    assert_eq!(document.kind, Some(DocumentKind::Markdown));

    let rendered = documents.render(name).await.unwrap();
    let html = String::from_utf8(rendered.body).unwrap();
    assert!(html.contains("<strong>bold</strong>"));
    assert!(html.contains("<del>mistake</del>"));

    documents.delete(name).await.unwrap();
    assert!(documents.list().await.unwrap().is_empty());
    assert!(matches!(
        documents.read(name).await,
        Err(DocumentError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_rejected_names_never_reach_the_disk() {
    let (documents, _, _temp) = common::setup_test_env().await;

    assert_eq!(validate_new_name(""), Err(NameError::Required));
    assert_eq!(validate_new_name("new"), Err(NameError::MissingExtension));
    assert_eq!(
        validate_new_name("../up.txt"),
        Err(NameError::PathSeparator)
    );

    assert!(documents.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_kind_renders_empty_html() {
    let (documents, _, _temp) = common::setup_test_env().await;

    documents.write("data.json", b"{\"a\": 1}").await.unwrap();
    let rendered = documents.render("data.json").await.unwrap();
    assert_eq!(rendered.content_type, "text/html;charset=utf-8");
    assert!(rendered.body.is_empty());
}

#[tokio::test]
async fn test_credentials_round_trip_through_the_file() {
    let (_, credentials, _temp) = common::setup_test_env().await;

    assert!(!credentials.verify("admin", "secret").await.unwrap());
    credentials.set("admin", "secret", 4).await.unwrap();

    let raw = std::fs::read_to_string(credentials.path()).unwrap();
    assert!(raw.contains("[users]"));
    assert!(!raw.contains("secret"));
    assert!(credentials.verify("admin", "secret").await.unwrap());
}
