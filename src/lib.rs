//! Folio application library
//!
//! Hosts the resource modules served by the Folio HTTP layer.

pub mod modules;

use folio_kernel::ModuleRegistry;

/// Build a registry with every application module registered
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}
