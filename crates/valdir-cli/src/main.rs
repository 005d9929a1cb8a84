mod admin;
mod catalog;
mod store;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use valdir_backend::BackendClient;
use valdir_core::{AppConfig, ClientStorage, FileStorage, LocatorData};
use valdir_locator::{Locator, NominatimClient, ViaCepClient};

use crate::{admin::AdminCommands, catalog::CatalogCommands, store::StoreCommands};

#[derive(Debug, Parser)]
#[command(name = "valdir-cli")]
#[command(about = "Valdir Móveis storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find the store serving a postal code (CEP) and remember it
    Locate {
        /// Postal code, with or without the dash
        postal_code: String,
        /// Pick this store instead of the suggested one
        #[arg(long)]
        store: Option<String>,
        /// Use the default store when the area is not served
        #[arg(long)]
        anyway: bool,
        /// Show the suggestion without saving it
        #[arg(long)]
        dry_run: bool,
    },
    /// Show, switch or forget the selected store
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Admin session and product management
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

/// Everything a command needs, built once from [`AppConfig`].
pub(crate) struct Context {
    pub config: AppConfig,
    pub data: Arc<LocatorData>,
    pub storage: Arc<dyn ClientStorage>,
}

impl Context {
    fn load() -> anyhow::Result<Self> {
        let config = valdir_core::load_app_config()?;
        let data = Arc::new(valdir_core::load_locator_data(&config.locator_path)?);
        let storage: Arc<dyn ClientStorage> = Arc::new(FileStorage::new(&config.storage_path));
        tracing::debug!(path = %config.storage_path.display(), "using client storage");
        Ok(Self {
            config,
            data,
            storage,
        })
    }

    fn timeout(&self) -> Option<Duration> {
        self.config.http_timeout_secs.map(Duration::from_secs)
    }

    pub(crate) fn locator(&self) -> anyhow::Result<Locator> {
        let addresses = ViaCepClient::with_base_url(&self.config.viacep_base_url, self.timeout())?;
        let geocoder = NominatimClient::with_base_url(
            &self.config.nominatim_base_url,
            &self.config.geocoder_user_agent,
            self.timeout(),
        )?;
        Ok(Locator::new(
            Arc::clone(&self.data),
            Arc::new(addresses),
            Arc::new(geocoder),
        ))
    }

    pub(crate) fn backend(&self) -> anyhow::Result<BackendClient> {
        Ok(BackendClient::new(
            &self.config.backend_url,
            &self.config.backend_api_key,
            self.timeout(),
        )?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("valdir-cli: run with --help to list commands");
        return Ok(());
    };

    let ctx = Context::load()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(ctx.config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Locate {
            postal_code,
            store,
            anyway,
            dry_run,
        } => {
            store::run_locate(
                &ctx,
                &postal_code,
                store::LocateOptions {
                    store: store.as_deref(),
                    anyway,
                    dry_run,
                },
            )
            .await?;
        }
        Commands::Store { command } => store::run(&ctx, command)?,
        Commands::Catalog { command } => catalog::run(&ctx, command).await?,
        Commands::Admin { command } => admin::run(&ctx, command).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
