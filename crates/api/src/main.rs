use std::sync::Arc;

use anyhow::Context;

use tollgate_api::app::{AppState, build_app};
use tollgate_api::config::AppConfig;
use tollgate_api::workers;
use tollgate_auth::{AuthService, InMemoryDirectory, RoleCode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    tollgate_observability::init(&config.log_level, config.log_format);

    if config.auth.uses_default_secret() {
        tracing::warn!("JWT_SECRET not set; using the insecure placeholder secret");
    }

    let auth = Arc::new(AuthService::new(&config.auth));
    let directory = Arc::new(InMemoryDirectory::with_default_roles());

    if let Some(seed) = &config.seed_admin {
        let admin = directory
            .register(&seed.email, "Administrator", &seed.password, &RoleCode::ADMIN)
            .context("failed to seed admin user")?;
        tracing::info!(user_id = %admin.id, "seeded admin user");
    }

    let tick = config
        .auth
        .sweep_interval()
        .to_std()
        .context("REVOCATION_SWEEP_SECS must be positive")?;
    let sweeper = workers::spawn_revocation_sweeper(auth.revocations().clone(), tick);

    let app = build_app(AppState::new(auth, directory));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sweeper.shutdown().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
