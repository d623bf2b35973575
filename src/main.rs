use std::sync::Arc;

use anyhow::Context;
use folio_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "folio-app bootstrap starting"
    );

    let registry = Arc::new(folio_app::build_registry());
    folio_http::start_server(registry, &settings).await
}
