mod bootstrap;
mod render;

use anyhow::{Context, Result};
use catalog_core::error::CatalogError;
use catalog_core::settings::Settings;
use catalog_runtime::cache::CatalogCache;
use catalog_runtime::session::DashboardSession;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("catalog-dash v{} starting", env!("CARGO_PKG_VERSION"));

    let input = settings.input.as_deref().ok_or(CatalogError::MissingInput)?;
    let options = bootstrap::load_options(&settings)?;

    let mut catalogs = CatalogCache::default();
    let catalog = catalogs.load(input, options)?;
    let spec = bootstrap::filter_spec(&settings, &catalog)?;

    let (requests, mut replies, handle) = DashboardSession::new(catalog.clone()).start();
    requests
        .send(spec)
        .await
        .context("dashboard session stopped before accepting the filter")?;
    drop(requests);

    let snapshot = replies
        .recv()
        .await
        .context("dashboard session ended without a reply")??;
    handle.join().await?;

    tracing::info!(
        "{} of {} titles match the filter",
        snapshot.filtered_rows,
        catalog.len()
    );

    let options = render::RenderOptions::from_settings(&settings);
    let output = if settings.wants_json() {
        render::render_json(&snapshot.analysis, &catalog, options)?
    } else {
        render::render_text(&snapshot.analysis, &catalog, options)
    };
    println!("{output}");

    Ok(())
}
