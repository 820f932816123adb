use forms_abilities::middleware::auth::AdminCredentials;
use forms_abilities::router::{FormsState, forms_router};
use forms_abilities::{AbilityRegistry, FormsOps, FormsStorage};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &forms_abilities::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        abilities_api = cfg.abilities_api,
        admin = cfg.admin_username.as_deref().unwrap_or("<none>")
    );

    let storage = FormsStorage::connect(&cfg.database_url).await?;
    storage.initialize().await?;

    let admin = AdminCredentials::from_parts(
        cfg.admin_username.as_deref(),
        cfg.admin_app_password.as_deref(),
    );
    if admin.is_none() {
        warn!("admin credentials not configured; only public abilities are reachable");
    }

    let registry = AbilityRegistry::new()?;
    let state = FormsState::new(FormsOps::new(storage), registry, admin)
        .with_abilities_api(cfg.abilities_api);
    let app = forms_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
