use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::resource::{ResourceRequest, ResourceResponse};

/// Context provided to modules during initialization
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    pub db: &'a SqlitePool,
}

/// Migration definition for modules
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Core module trait that all Folio modules must implement
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module, also the resource name it serves
    /// (the first path segment, e.g. `books`)
    fn name(&self) -> &'static str;

    /// Initialize the module with the provided context
    /// Called during application startup after migrations
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Handle a request addressed to this module's resource.
    ///
    /// Client-side problems (bad input, missing rows, unsupported methods) are
    /// returned as `Ok` responses carrying the matching status. `Err` is
    /// reserved for storage faults and is turned into a generic 500 by the
    /// HTTP layer.
    async fn handle(
        &self,
        db: &SqlitePool,
        request: ResourceRequest,
    ) -> anyhow::Result<ResourceResponse>;

    /// Return OpenAPI specification fragment for this module as JSON
    /// Paths are relative to `/{module_name}`
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Return migrations contributed by this module
    /// Migrations are executed in the order returned
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start background tasks for this module
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and clean up resources
    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
