//! Library management application
//!
//! Wires the users, books, loans and reviews modules onto a shared in-memory
//! store and serves them over HTTP.

pub mod modules;
pub mod utils;

use anyhow::Context;

use biblio_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use biblio_store::{Library, Store};

/// Create the store, seeded with the sample catalogue when configured
pub fn build_store(settings: &Settings) -> Store {
    if settings.store.seed_sample_data {
        Store::sample()
    } else {
        Store::new(Library::new())
    }
}

/// Registry holding every resource module backed by `store`
pub fn build_registry(store: &Store) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store).context("failed to register modules")?;
    Ok(registry)
}

/// Full HTTP application over `store`, without binding a socket
pub fn app(settings: &Settings, store: &Store) -> anyhow::Result<biblio_http::App> {
    let registry = build_registry(store)?;
    Ok(biblio_http::build_app(&registry, settings))
}

/// Initialize and start every module, serve until a shutdown signal, then stop
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = build_store(&settings);
    let registry = build_registry(&store)?;
    let ctx = InitCtx {
        settings: &settings,
        store: &store,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served =
        biblio_http::start_server(&registry, &settings, biblio_http::shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}
