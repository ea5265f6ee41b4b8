pub mod authors;
pub mod books;
pub mod categories;
pub mod genres;
pub mod publishers;
pub mod series;

use std::sync::Arc;
use std::time::Duration;

use boek_catalog::{CatalogSource, RemoteCatalog};
use boek_kernel::settings::{Environment, Settings};
use boek_kernel::ModuleRegistry;

/// Register all console modules with the registry.
///
/// Locally the series wizard picks candidates from the console's own book
/// repository; staging/production read the shared catalog API instead.
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let books = books::BooksModule::new();

    let catalog: Arc<dyn CatalogSource> = match settings.environment {
        Environment::Local => Arc::new(series::ConsoleCatalog::new(
            books.repo(),
            genres::seed(),
        )),
        _ => Arc::new(RemoteCatalog::new(
            settings.catalog.base_url.clone(),
            Duration::from_millis(settings.catalog.request_timeout_ms),
        )?),
    };

    registry.register(Arc::new(books));
    registry.register(Arc::new(series::SeriesModule::new(
        catalog,
        settings.catalog.listing_size,
    )));
    registry.register(Arc::new(categories::CategoriesModule::new()));
    registry.register(Arc::new(publishers::PublishersModule::new()));
    registry.register(Arc::new(authors::AuthorsModule::new()));
    registry.register(Arc::new(genres::GenresModule::new()));

    Ok(())
}
