use clap::Parser;
use std::path::PathBuf;

/// carbrowse - drive the paged browse engine against a catalog file 🚗
#[derive(Parser, Debug)]
#[command(name = "carbrowse", version, about)]
pub struct Args {
    /// Catalog file (TOML) to browse
    #[arg(long, short = 'c')]
    pub catalog: Option<PathBuf>,

    /// Config file (defaults to the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the loading timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Print surface calls as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Log to stderr instead of the log file
    #[arg(long)]
    pub log_stderr: bool,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,
}
