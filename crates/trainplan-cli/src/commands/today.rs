//! Today's workout, resolved from the cached weekly template.

use chrono::{Datelike, Local};
use clap::Args;
use trainplan_core::Day;

use super::{open_cache, SourceArgs};

#[derive(Args)]
pub struct TodayArgs {
    #[command(flatten)]
    source: SourceArgs,
}

pub fn run(args: TodayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cache = open_cache(&args.source)?;
    let metadata = cache.get_or_refresh(false)?;

    let now = Local::now();
    let day = Day::from_weekday(now.weekday());

    println!("Phase: {}", metadata.current_phase);
    if let (Some(start), Some(end)) = (metadata.phase_start, metadata.phase_end) {
        let total = (end - start).num_days() + 1;
        let elapsed = (now.date_naive() - start).num_days() + 1;
        if total > 0 && (1..=total).contains(&elapsed) {
            println!("Day {elapsed} of {total}");
        }
    }
    let workout = metadata.workout_for(day).unwrap_or("Not specified");
    println!("Today ({day}): {workout}");
    println!("Volume target: {}", metadata.weekly_volume_target);
    Ok(())
}
