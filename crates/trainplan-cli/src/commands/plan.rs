//! Plan parsing and cache commands for CLI.

use clap::Subcommand;
use trainplan_core::WorkoutMetadata;

use super::{open_cache, SourceArgs};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Parse the plan document and write the metadata cache
    Parse {
        #[command(flatten)]
        source: SourceArgs,
        /// Print the raw JSON record instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print the cached metadata record
    Show {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Reparse if the cache is stale or missing
    Refresh {
        #[command(flatten)]
        source: SourceArgs,
        /// Reparse even if the cache is fresh
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Parse { source, json } => {
            let cache = open_cache(&source)?;
            let metadata = cache.refresh()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                print_summary(&metadata);
                println!();
                println!("Metadata saved to: {}", cache.cache_path().display());
            }
        }
        PlanAction::Show { source } => {
            let cache = open_cache(&source)?;
            match cache.load()? {
                Some(metadata) => println!("{}", serde_json::to_string_pretty(&metadata)?),
                None => println!("No cached metadata. Run 'plan parse' first."),
            }
        }
        PlanAction::Refresh { source, force } => {
            let cache = open_cache(&source)?;
            let before = cache.load().ok().flatten().map(|m| m.parsed_at);
            let metadata = cache.get_or_refresh(force)?;
            if before == Some(metadata.parsed_at) {
                println!("Cache is fresh, nothing to do.");
            } else {
                println!("Cache regenerated from {}", metadata.plan_file.display());
            }
        }
    }
    Ok(())
}

fn print_summary(metadata: &WorkoutMetadata) {
    println!("Phase: {}", metadata.current_phase);
    let dates = match (metadata.phase_start, metadata.phase_end) {
        (Some(start), Some(end)) => format!("{start} to {end}"),
        _ => "unknown".to_string(),
    };
    println!("Dates: {dates}");
    println!("Volume target: {}", metadata.weekly_volume_target);
    println!();
    println!("Weekly template:");
    for (day, workout) in &metadata.weekly_template {
        println!("  {day}: {workout}");
    }
}
