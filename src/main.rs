use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use subcost::app;
use subcost::repo::PgSubscriptionRepo;
use subcost::settings::Settings;
use subcost::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber(telemetry::env_filter(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let pool = settings.database.pool();
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    let repo = Arc::new(PgSubscriptionRepo::new(pool));

    app::run(listener, repo)?.await.context("Failed to run app")
}
