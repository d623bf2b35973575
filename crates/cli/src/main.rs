use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_kernel::settings::Settings;

/// Operator commands for the Folio books service
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print the OpenAPI document as JSON
    Openapi,
    /// Print the resolved settings
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let settings = load_settings()?;
            tracing::info!(env = ?settings.environment, "folio serve");
            let registry = Arc::new(folio_app::build_registry());
            folio_http::start_server(registry, &settings).await
        }
        Command::Migrate => {
            let settings = load_settings()?;
            let registry = folio_app::build_registry();
            let pool = folio_db::bootstrap(&settings.database, &registry)
                .await
                .with_context(|| "migration failed")?;
            pool.close().await;
            tracing::info!(db = %settings.database.url, "database is up to date");
            Ok(())
        }
        // Stdout must stay clean JSON, so no settings or logging here.
        Command::Openapi => {
            let registry = folio_app::build_registry();
            let document = folio_http::openapi::openapi_document(&registry)?;
            println!("{}", document.to_pretty_json()?);
            Ok(())
        }
        Command::Config => {
            let settings = load_settings()?;
            println!("{settings:#?}");
            Ok(())
        }
    }
}

fn load_settings() -> anyhow::Result<Settings> {
    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;
    Ok(settings)
}
