//! Core traits, settings, and module registry shared by every Folio crate.

pub mod module;
pub mod registry;
pub mod resource;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
pub use resource::{parse_int, ResourceRequest, ResourceResponse};
