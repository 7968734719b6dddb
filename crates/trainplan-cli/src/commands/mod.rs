pub mod config;
pub mod plan;
pub mod today;

use std::path::PathBuf;

use clap::Args;
use trainplan_core::{Config, MetadataCache};

/// Path overrides shared by the plan and today commands.
#[derive(Args)]
pub struct SourceArgs {
    /// Plan document path (overrides config)
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Cache file path (overrides config)
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

/// Build a metadata cache from config with CLI overrides applied.
pub fn open_cache(source: &SourceArgs) -> Result<MetadataCache, Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(plan) = &source.plan {
        config.plan.path = plan.clone();
    }
    if let Some(cache) = &source.cache {
        config.cache.path = Some(cache.clone());
    }
    Ok(MetadataCache::from_config(&config)?)
}
