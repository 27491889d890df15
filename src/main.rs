mod api;
mod app;
mod cli;
mod color;
mod config;
mod db;
mod error;
mod event;
mod export;
mod icons;
mod logging;
mod month;
mod tui;
mod types;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use api::{ExpenseApi, LocalStore, RestClient};
use app::{ACCOUNT_DELETED, App, AppOptions};
use config::{Backend, Config, ConfigManager};
use month::YearMonth;

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();

    let manager = ConfigManager::with_default_path();
    let mut config = manager
        .load()
        .with_context(|| format!("reading {}", manager.config_path().display()))?;
    config.apply_env();
    if cli_opts.local {
        config.backend = Backend::Local;
    }
    if let Some(url) = cli_opts.server.as_deref() {
        config.backend = Backend::Remote;
        config.server_url = url.trim().to_string();
    }

    logging::init(&config.log_path(), config.log_filter.as_deref());

    let api = connect(&config)?;
    if let Some(command) = cli_opts.command {
        return cli::run(command, api.as_ref(), &config);
    }

    let options = AppOptions {
        export_dir: config.export_dir(),
        export_scale: config.export_scale,
        currency_symbol: config.currency_symbol.clone(),
        backend_label: backend_label(&config),
        start_month: YearMonth::current(),
        new_category: cli_opts.new_category,
    };
    let mut app = App::new(api, options)?;
    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    if app.session_ended {
        manager.clear_token()?;
        println!("{ACCOUNT_DELETED}");
    }

    result
}

fn connect(config: &Config) -> Result<Arc<dyn ExpenseApi>> {
    let api: Arc<dyn ExpenseApi> = match config.backend {
        Backend::Local => {
            let path = config.database_path();
            tracing::info!(path = %path.display(), "using local database");
            Arc::new(
                LocalStore::open(&path)
                    .with_context(|| format!("opening database {}", path.display()))?,
            )
        }
        Backend::Remote => {
            tracing::info!(url = %config.server_url, "using server");
            Arc::new(RestClient::new(&config.server_url, config.token.clone())?)
        }
    };
    Ok(api)
}

fn backend_label(config: &Config) -> String {
    match config.backend {
        Backend::Local => "local".to_string(),
        Backend::Remote => config.server_url.clone(),
    }
}
