//! tap-woocommerce - Singer tap for WooCommerce orders
//!
//! Singer messages go to stdout; logs go to stderr.

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info};
use woocommerce::config::CONFIG_FILE;
use woocommerce::{Catalog, SingerWriter, SyncState, TapConfig, WooClient, discover, do_sync};

mod cli;

use cli::CliArgs;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = CliArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TapConfig::load(path)?,
        None if config::config_exists(CONFIG_FILE) => TapConfig::load_default()?,
        None => {
            let hint = config::config_path(CONFIG_FILE)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the tap config directory".to_string());
            bail!("No config given. Pass --config or place one at {}", hint);
        }
    };

    if args.discover {
        info!("Starting discover");
        let catalog = serde_json::to_string_pretty(&discover()).context("Failed to serialize catalog")?;
        println!("{}", catalog);
        info!("Finished discover");
        return Ok(());
    }

    let Some(catalog_path) = args.catalog_path() else {
        info!("No Streams were selected");
        return Ok(());
    };
    let catalog = Catalog::from_value(config::load_json_file(catalog_path)?)
        .with_context(|| format!("Invalid catalog {}", catalog_path.display()))?;
    let state: SyncState = config::load_optional_json_file(args.state.as_deref())?;

    let client = WooClient::new(&config);
    let mut writer = SingerWriter::stdout();
    do_sync(&client, &mut writer, &config, state, &catalog)?;
    Ok(())
}
