use expensewise::{
    config::{self, database},
    context::AppContext,
    errors::Result,
    store::{SeaOrmStore, SharedStore},
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect the Record Store and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to record store: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Record store tables ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;
    let store: SharedStore = Arc::new(SeaOrmStore::new(db));

    // 5. Start the session; everything past the PIN gate stays locked until unlocked
    let context = AppContext::start(app_config, store, true).await;
    info!(
        "ExpenseWise ready. PIN state: {:?}, export currency: {}",
        context.auth().state(),
        context.config().export.currency_symbol
    );

    context.shutdown();
    Ok(())
}
