use axum::serve;
use mdb_catalog::api::routes::create_router;
use mdb_catalog::build_state;
use mdb_catalog::config::AppConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    println!("MDB catalog server");

    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}, {} catalog(s)",
        config.server.host,
        config.server.port,
        config.catalogs.len()
    );

    // Load seed data for demonstration (optional)
    let load_seed = std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true";
    if load_seed {
        println!("Loading seed catalog...");
    }
    let state = build_state(&config, load_seed)?;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("MDB catalog server running on http://{}", bind_address);

    serve(listener, create_router().with_state(state)).await?;

    Ok(())
}
