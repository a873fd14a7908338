// Library exports for the binary and the integration tests

// Service modules (HTTP server, session, process lifecycle)
pub mod daemon;
// On-disk state directory (~/.flatcms)
pub mod state;

pub use daemon::http_server;
pub use daemon::spawn_service;
pub use daemon::ServiceConfig;
pub use daemon::ServiceState;
pub use state::{AppConfig, AppState, Environment, StateError};
