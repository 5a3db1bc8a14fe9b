pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export the query engine
pub use logic::{
    CatalogQuery, ListAlgorithmsRequest, ListCommandsRequest, ListParametersRequest, ListRequest,
    Page, PageRequest, PageToken, ParameterMatch, PrivilegeGate, PrivilegeTable,
};

pub use error::{CatalogError, CatalogResult};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{CatalogStore, MemoryStore};

/// Build the shared state from `config`: load the configured catalogs,
/// optionally the seed catalog, and the privilege table.
pub fn build_state(
    config: &crate::config::AppConfig,
    load_seed: bool,
) -> anyhow::Result<api::AppState<MemoryStore>> {
    let store = MemoryStore::new();
    store.load_sources(&config.catalogs)?;
    if load_seed {
        seed::load_seed_data(&store)?;
    }
    let gate = config.privilege_table();
    log::info!(
        "Serving {} catalog instance(s), {} user(s) with privileges",
        store.list_instances().len(),
        gate.user_count()
    );
    Ok(std::sync::Arc::new(api::MdbState {
        store,
        gate: Box::new(gate),
        default_limit: config.query.default_limit,
    }))
}

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = crate::config::AppConfig::load()?;
    let load_seed = std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true";
    let state = build_state(&config, load_seed)?;

    let app = crate::api::routes::create_router().with_state(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}
