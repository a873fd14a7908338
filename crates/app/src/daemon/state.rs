use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use common::prelude::{CredentialStore, DocumentError, DocumentStore};

use super::config::Config;

/// Main service state, shared by every request handler
#[derive(Clone)]
pub struct State {
    documents: DocumentStore,
    credentials: CredentialStore,
    session_key: Key,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup document store (creates the data directory if missing)
        let documents = DocumentStore::open(&config.data_dir).await?;
        tracing::info!(path = %documents.root().display(), "Serving documents");

        // 2. Setup credential store; the file is read per sign-in, not here
        let credentials = CredentialStore::new(&config.users_path);
        if !credentials.path().exists() {
            tracing::warn!(
                path = %credentials.path().display(),
                "credential file not found, nobody can sign in"
            );
        }

        Ok(Self::new(documents, credentials, config.session_key.clone()))
    }

    pub fn new(documents: DocumentStore, credentials: CredentialStore, session_key: Key) -> Self {
        Self {
            documents,
            credentials,
            session_key,
        }
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}

impl FromRef<State> for Key {
    fn from_ref(state: &State) -> Self {
        state.session_key.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Document store error: {0}")]
    DocumentStore(#[from] DocumentError),
}
