//! Command-line arguments

use std::path::{Path, PathBuf};

use clap::Parser;

/// Singer tap that extracts WooCommerce orders incrementally
#[derive(Parser, Debug)]
#[command(name = "tap-woocommerce", version, about)]
pub struct CliArgs {
    /// Connector config file (defaults to ~/.config/tap-woocommerce/config.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// State file from a previous run
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Catalog selecting the streams to sync
    #[arg(long, conflicts_with = "properties")]
    pub catalog: Option<PathBuf>,

    /// Legacy name for --catalog
    #[arg(short, long)]
    pub properties: Option<PathBuf>,

    /// Print the catalog of available streams and exit
    #[arg(short, long)]
    pub discover: bool,
}

impl CliArgs {
    /// Catalog path, whichever flag supplied it
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog.as_deref().or(self.properties.as_deref())
    }
}
