//! paybridge - Funds Transfer Orchestration Service
//!
//! Startup wiring. Architecture:
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────┐    ┌───────────────┐
//! │ Gateway  │───▶│ Orchestrator │───▶│   Rail   │    │ Ledger Stores │
//! │  (axum)  │    │  (transfer)  │    │ (extern) │    │  pg + doc     │
//! └──────────┘    └──────────────┘    └──────────┘    └───────────────┘
//! ```
//!
//! Every handle (pool, HTTP clients, orchestrator) is constructed here once
//! and injected; nothing in the business logic reaches for globals.

use std::sync::Arc;

use anyhow::Context;
use url::Url;

use paybridge::bank::PgBankDirectory;
use paybridge::config::AppConfig;
use paybridge::gateway::{self, AppState};
use paybridge::ledger::document::DocumentStoreConfig;
use paybridge::ledger::{DocumentLedgerStore, LedgerStore, PgLedgerStore};
use paybridge::logging::init_logging;
use paybridge::rail::{RailClient, TransferRail};
use paybridge::transfer::TransferOrchestrator;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    tracing::info!(
        env = %env,
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        "Starting paybridge"
    );

    // Primary store: PostgreSQL pool, owned here, injected everywhere else.
    let primary = Arc::new(
        PgLedgerStore::connect(
            &config.primary_store.database_url,
            config.primary_store.op_timeout(),
        )
        .await
        .context("Failed to connect to primary store")?,
    );
    primary
        .ensure_schema()
        .await
        .context("Failed to bootstrap ledger schema")?;

    let directory = Arc::new(PgBankDirectory::new(primary.pool().clone()));
    directory
        .ensure_schema()
        .await
        .context("Failed to bootstrap bank directory schema")?;

    // Fallback store: only consulted when the primary fails, but constructed
    // up front so a failover never waits on client setup.
    let fallback_endpoint = Url::parse(&config.fallback_store.endpoint)
        .context("Invalid fallback store endpoint")?;
    let fallback = Arc::new(
        DocumentLedgerStore::new(DocumentStoreConfig {
            endpoint: fallback_endpoint,
            project_id: config.fallback_store.project_id.clone(),
            api_key: config.fallback_store.api_key.clone(),
            database_id: config.fallback_store.database_id.clone(),
            collection_id: config.fallback_store.collection_id.clone(),
            timeout: config.fallback_store.timeout(),
        })
        .map_err(|e| anyhow::anyhow!("Failed to build fallback store client: {e}"))?,
    );

    let rail_base = Url::parse(&config.rail.base_url).context("Invalid rail base URL")?;
    let rail = Arc::new(
        RailClient::new(
            rail_base,
            &config.rail.key,
            &config.rail.secret,
            config.rail.timeout(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to build rail client: {e}"))?,
    );

    let orchestrator = Arc::new(TransferOrchestrator::new(
        directory,
        Arc::clone(&rail) as Arc<dyn TransferRail>,
        Arc::clone(&primary) as Arc<dyn LedgerStore>,
        Arc::clone(&fallback) as Arc<dyn LedgerStore>,
    ));

    let state = Arc::new(AppState::new(
        orchestrator,
        primary,
        fallback as Arc<dyn LedgerStore>,
    ));
    let app = gateway::router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Gateway listening");

    axum::serve(listener, app)
        .await
        .context("Gateway server exited")?;

    Ok(())
}
