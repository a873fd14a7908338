//! Shared test utilities for store integration tests
#![allow(dead_code)]

use common::prelude::{CredentialStore, DocumentStore};
use tempfile::TempDir;

/// Set up a document store and an empty credential file in a fresh directory
pub async fn setup_test_env() -> (DocumentStore, CredentialStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();

    let documents = DocumentStore::open(temp_dir.path().join("data"))
        .await
        .unwrap();
    let credentials = CredentialStore::new(temp_dir.path().join("users.toml"));

    (documents, credentials, temp_dir)
}
