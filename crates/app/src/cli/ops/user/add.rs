use clap::Args;

use common::prelude::{CredentialError, CredentialStore};
use flatcms::state::{AppState, Environment, StateError};

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// Username to create or update
    pub username: String,

    /// Plaintext password; hashed before it is stored
    #[arg(long, env = "FLATCMS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Which storage tree's credential file to write
    #[arg(long, value_enum, default_value_t = Environment::Production)]
    pub env: Environment,

    /// bcrypt work factor
    #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
    pub cost: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AddError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("credential error: {0}")]
    Credentials(#[from] CredentialError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Add {
    type Error = AddError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let store = CredentialStore::new(state.users_path(self.env));

        store.set(&self.username, &self.password, self.cost).await?;

        Ok(format!(
            "Stored credentials for {} in {}",
            self.username,
            store.path().display()
        ))
    }
}
