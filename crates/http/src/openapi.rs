//! OpenAPI document assembled from module fragments.

use anyhow::Context;
use serde_json::json;

use folio_kernel::ModuleRegistry;

/// Merge every module's OpenAPI fragment into one document.
///
/// Module paths are prefixed with `/{module_name}` and a shared
/// `ErrorResponse` schema (`{"error": string}`) is always present.
pub fn openapi_json(registry: &ModuleRegistry) -> serde_json::Value {
    let mut openapi_spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Folio API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "CRUD service over relational resources"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    openapi_spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "error": {
                "type": "string"
            }
        },
        "required": ["error"]
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(|paths| paths.as_object()) {
            for (path, path_item) in paths {
                let prefixed_path = if path == "/" {
                    format!("/{}", module.name())
                } else {
                    format!("/{}{}", module.name(), path)
                };
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(|schemas| schemas.as_object())
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// Typed form of [`openapi_json`].
pub fn openapi_document(registry: &ModuleRegistry) -> anyhow::Result<utoipa::openapi::OpenApi> {
    serde_json::from_value(openapi_json(registry))
        .context("module OpenAPI fragments do not form a valid document")
}
