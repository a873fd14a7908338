use std::net::SocketAddr;

use clap::Args;

use flatcms::state::{AppState, Environment, StateError, ENV_VAR};
use flatcms::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Override the listen address (default from config)
    #[arg(long)]
    pub listen_addr: Option<SocketAddr>,

    /// Storage tree to serve (default from config)
    #[arg(long, value_enum, env = ENV_VAR)]
    pub env: Option<Environment>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let environment = self.env.unwrap_or(state.config.environment);

        let config = ServiceConfig {
            listen_addr: self.listen_addr.unwrap_or(state.config.listen_addr),
            data_dir: state.data_dir(environment),
            users_path: state.users_path(environment),
            session_key: state.session_key()?,
            log_level: tracing::Level::DEBUG,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;
        Ok(format!("flatcms ({}) stopped", environment))
    }
}
