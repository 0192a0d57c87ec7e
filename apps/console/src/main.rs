//! Clavis administration console.
//!
//! Command-line front end for the IAM backend. Covers permission catalog
//! upkeep and role/user administration, plus the per-role permission matrix.

#![forbid(unsafe_code)]

mod cli;
mod commands;
mod console_config;
mod demo_seed;
mod output;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clavis_application::{
    CatalogService, GrantReconciler, GrantStore, PermissionCatalog, RoleAdminService,
    RoleDirectory, UserAdminService, UserDirectory,
};
use clavis_core::{AppError, AppResult};
use clavis_infrastructure::{
    ApiCredentials, HttpGrantStore, HttpPermissionCatalog, HttpRoleDirectory, HttpUserDirectory,
    InMemoryAccessStore, RestApiClient,
};

use crate::cli::Cli;
use crate::commands::ConsoleContext;
use crate::console_config::ConsoleConfig;
use crate::output::OutputFormat;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = %error, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;
    let context = build_context(&config, &cli).await?;

    commands::dispatch(&context, cli.command).await
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn build_context(config: &ConsoleConfig, cli: &Cli) -> AppResult<ConsoleContext> {
    let output = OutputFormat::from_flag(cli.json);
    let batch_timeout = Duration::from_millis(config.batch_timeout_ms);

    if cli.demo {
        let store = Arc::new(InMemoryAccessStore::new());
        demo_seed::run(store.as_ref()).await?;
        info!("running against a seeded in-memory backend");

        return Ok(ConsoleContext {
            catalog: CatalogService::new(Arc::clone(&store) as Arc<dyn PermissionCatalog>),
            roles: RoleAdminService::new(Arc::clone(&store) as Arc<dyn RoleDirectory>),
            users: UserAdminService::new(Arc::clone(&store) as Arc<dyn UserDirectory>),
            reconciler: GrantReconciler::with_batch_timeout(
                Arc::clone(&store) as Arc<dyn GrantStore>,
                batch_timeout,
            ),
            output,
        });
    }

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_seconds))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let credentials = match config.api_token.as_deref() {
        Some(token) => ApiCredentials::bearer(token),
        None => ApiCredentials::anonymous(),
    };
    let client = RestApiClient::new(http_client, config.api_base_url.as_str(), credentials)?;

    Ok(ConsoleContext {
        catalog: CatalogService::new(Arc::new(HttpPermissionCatalog::new(client.clone()))),
        roles: RoleAdminService::new(Arc::new(HttpRoleDirectory::new(client.clone()))),
        users: UserAdminService::new(Arc::new(HttpUserDirectory::new(client.clone()))),
        reconciler: GrantReconciler::with_batch_timeout(
            Arc::new(HttpGrantStore::new(client)),
            batch_timeout,
        ),
        output,
    })
}
