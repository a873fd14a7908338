use std::net::SocketAddr;

use clap::Args;

use flatcms::state::{AppConfig, AppState, Environment, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Web server listen address
    #[arg(long, default_value = "127.0.0.1:4567")]
    pub listen_addr: SocketAddr,

    /// Storage tree `serve` uses by default
    #[arg(long, value_enum, default_value_t = Environment::Production)]
    pub env: Environment,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            listen_addr: self.listen_addr,
            environment: self.env,
            session_secret: None,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized flatcms directory at: {}\n\
             - Config: {}\n\
             - Documents: {}\n\
             - Users: {}\n\
             - Test documents: {}\n\
             - Test users: {}\n\
             - Listen address: {}\n\
             - Environment: {}\n\
             Add a user with `flatcms user add <name>` before signing in.",
            state.root_dir.display(),
            state.config_path.display(),
            state.data_dir(Environment::Production).display(),
            state.users_path(Environment::Production).display(),
            state.data_dir(Environment::Test).display(),
            state.users_path(Environment::Test).display(),
            state.config.listen_addr,
            state.config.environment,
        );

        Ok(output)
    }
}
