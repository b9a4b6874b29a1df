//! Core building blocks shared by every crate of the library API: layered
//! settings, the [`Module`] trait and the [`ModuleRegistry`].

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
