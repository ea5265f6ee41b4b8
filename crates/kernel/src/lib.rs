//! Boek console kernel.
//!
//! Holds the pieces every feature module builds on: layered [`settings`],
//! the [`module::Module`] lifecycle trait, the [`registry::ModuleRegistry`]
//! that drives startup/shutdown, and the protected-route role table.

pub mod module;
pub mod registry;
pub mod roles;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use roles::{Role, RouteAccess};
