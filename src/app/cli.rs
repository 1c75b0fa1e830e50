use clap::Parser;
use std::path::PathBuf;

/// Tunebar - search, preview and collect songs from your terminal 🎵
#[derive(Parser, Debug, Default)]
#[command(name = "tunebar", version, about)]
pub struct Args {
    /// Config file (default: <config dir>/tunebar/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Liked songs + playlists file, overrides the config
    #[arg(long)]
    pub library: Option<PathBuf>,

    /// Search endpoint, overrides the config
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "tunebar=trace")
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,

    /// Start with this search already typed
    pub query: Option<String>,
}
