//! Condition catalog generator
//!
//! Scans the generated images folder and writes the catalog document the
//! gallery front-end loads. Run once after generating images.
//!
//! **Usage:**
//! ```bash
//! generate-conditions [--images-dir <dir>] [--output <file>] [--config <file>]
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use circl_common::OsLister;
use circl_server::cli::GenerateArgs;
use circl_server::services::{write_catalog, CatalogBuilder};
use clap::Parser;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = GenerateArgs::parse()
        .resolve()
        .context("Failed to resolve configuration")?;

    let builder = CatalogBuilder::new(Arc::new(OsLister), &config.images_dir);
    let build = builder
        .build()
        .with_context(|| format!("Failed to scan {}", config.images_dir.display()))?;

    write_catalog(&build.catalog, &config.catalog_file)
        .with_context(|| format!("Failed to write {}", config.catalog_file.display()))?;

    let catalog = &build.catalog;
    info!("Generated {}", config.catalog_file.display());
    info!("  - Total conditions: {}", catalog.meta.total_conditions);
    info!("  - Skipped directories: {}", build.skipped.len());
    info!("  - Age groups: {}", catalog.filters.age_groups.join(", "));
    info!("  - Genders: {}", catalog.filters.genders.join(", "));
    info!("  - Policy issues: {}", catalog.filters.policy_issues.len());
    info!("  - Ideologies: {}", catalog.filters.ideologies.join(", "));

    Ok(())
}
