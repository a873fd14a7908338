pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flatcms")]
#[command(about = "A flat-file content manager served over HTTP")]
#[command(version)]
pub struct Args {
    /// Path to the flatcms state directory (defaults to ~/.flatcms)
    #[arg(long, global = true, env = "FLATCMS_HOME")]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
