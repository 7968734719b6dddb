//! Persisted metadata cache with a staleness-refresh policy.
//!
//! The cache holds exactly one record. [`MetadataCache::get_or_refresh`] is
//! the entry point callers want: it loads the persisted record, applies the
//! staleness predicate, and reparses the source document when the record is
//! stale or missing. Writes are plain overwrites; concurrent processes race
//! last-writer-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::plan::{PlanParser, WorkoutMetadata};
use crate::storage::Config;

/// Default staleness threshold in days.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// JSON-persisted cache of the extracted plan metadata.
pub struct MetadataCache {
    plan_path: PathBuf,
    cache_path: PathBuf,
    max_age_days: i64,
    parser: PlanParser,
}

impl MetadataCache {
    pub fn new(plan_path: PathBuf, cache_path: PathBuf, max_age_days: i64) -> Self {
        Self {
            plan_path,
            cache_path,
            max_age_days,
            parser: PlanParser::new(),
        }
    }

    /// Build a cache from the application config, resolving the default
    /// cache location when none is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.plan.path.clone(),
            config.cache_path()?,
            config.cache.max_age_days,
        ))
    }

    pub fn plan_path(&self) -> &Path {
        &self.plan_path
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Load the persisted record. A missing cache file is `None`, not an
    /// error; malformed JSON propagates.
    pub fn load(&self) -> Result<Option<WorkoutMetadata>> {
        let content = match std::fs::read_to_string(&self.cache_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Persist the record, creating parent directories as needed.
    pub fn save(&self, metadata: &WorkoutMetadata) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.cache_path, serde_json::to_string_pretty(metadata)?)?;
        Ok(())
    }

    /// Staleness predicate against the current wall clock.
    pub fn is_stale(&self, metadata: &WorkoutMetadata) -> bool {
        self.is_stale_at(metadata, Local::now())
    }

    /// Staleness predicate evaluated as of `now`.
    ///
    /// Stale when any of: record age strictly beyond the threshold, the
    /// phase already over, or the phase not yet begun (the plan was
    /// rewritten under us).
    fn is_stale_at(&self, metadata: &WorkoutMetadata, now: DateTime<Local>) -> bool {
        if (now - metadata.parsed_at).num_days() > self.max_age_days {
            return true;
        }

        let today = now.date_naive();
        if metadata.phase_end.is_some_and(|end| today > end) {
            return true;
        }
        if metadata.phase_start.is_some_and(|start| today < start) {
            return true;
        }

        false
    }

    /// Reparse the source document and overwrite the persisted record.
    pub fn refresh(&self) -> Result<WorkoutMetadata> {
        let metadata = self.parser.parse_file(&self.plan_path)?;
        self.save(&metadata)?;
        Ok(metadata)
    }

    /// Return a fresh record, reparsing when the cache is stale or missing.
    /// `force` bypasses the staleness predicate entirely.
    pub fn get_or_refresh(&self, force: bool) -> Result<WorkoutMetadata> {
        if !force {
            match self.load()? {
                Some(metadata) if !self.is_stale(&metadata) => {
                    tracing::info!("workout metadata is fresh, reusing cached record");
                    return Ok(metadata);
                }
                Some(_) => tracing::info!("workout metadata is stale, reparsing plan"),
                None => tracing::info!("workout metadata not found, parsing plan"),
            }
        }
        self.refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ParseError};
    use crate::plan::Day;
    use chrono::{Duration, NaiveDate};
    use indoc::{formatdoc, indoc};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn sample_metadata(parsed_at: DateTime<Local>) -> WorkoutMetadata {
        WorkoutMetadata {
            plan_file: PathBuf::from("plan.md"),
            current_phase: "Phase 2: Build".to_string(),
            phase_start: None,
            phase_end: None,
            weekly_template: WorkoutMetadata::default_weekly_template(),
            weekly_volume_target: "40-50 miles".to_string(),
            parsed_at,
        }
    }

    fn cache_in(dir: &Path) -> MetadataCache {
        MetadataCache::new(
            dir.join("plan.md"),
            dir.join("metadata.json"),
            DEFAULT_MAX_AGE_DAYS,
        )
    }

    fn write_plan(dir: &Path, phase: &str) {
        std::fs::write(
            dir.join("plan.md"),
            formatdoc! {"
                ## {phase} — **Nov 18 - Dec 15, 2025**

                **Weekly Volume:** 35 miles
            "},
        )
        .unwrap();
    }

    #[test]
    fn round_trip_is_field_for_field_equal() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let meta = sample_metadata(Local::now());

        cache.save(&meta).unwrap();
        let loaded = cache.load().unwrap().unwrap();
        assert_eq!(loaded, meta);
    }

    #[test]
    fn missing_cache_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        assert_eq!(cache.load().unwrap(), None);
    }

    #[test]
    fn malformed_cache_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        std::fs::write(dir.path().join("metadata.json"), "{not json").unwrap();

        let err = cache.load().unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn record_31_days_old_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let meta = sample_metadata(Local::now() - Duration::days(31));
        assert!(cache.is_stale(&meta));
    }

    #[test]
    fn record_29_days_old_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let meta = sample_metadata(Local::now() - Duration::days(29));
        assert!(!cache.is_stale(&meta));
    }

    #[test]
    fn threshold_is_exceeded_not_reached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let meta = sample_metadata(Local::now() - Duration::days(30));
        assert!(!cache.is_stale(&meta));
    }

    #[test]
    fn ended_phase_is_stale_regardless_of_age() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let mut meta = sample_metadata(Local::now());
        meta.phase_end = Some(Local::now().date_naive() - Duration::days(1));
        assert!(cache.is_stale(&meta));
    }

    #[test]
    fn unstarted_phase_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let mut meta = sample_metadata(Local::now());
        meta.phase_start = Some(Local::now().date_naive() + Duration::days(1));
        assert!(cache.is_stale(&meta));
    }

    #[test]
    fn phase_spanning_today_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        let mut meta = sample_metadata(Local::now());
        meta.phase_start = Some(Local::now().date_naive() - Duration::days(7));
        meta.phase_end = Some(Local::now().date_naive() + Duration::days(7));
        assert!(!cache.is_stale(&meta));
    }

    #[test]
    fn get_or_refresh_parses_when_cache_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        write_plan(dir.path(), "Phase 1: Base");

        let meta = cache.get_or_refresh(false).unwrap();
        assert_eq!(meta.current_phase, "Phase 1: Base");
        assert!(cache.cache_path().exists());
    }

    #[test]
    fn get_or_refresh_reuses_fresh_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        write_plan(dir.path(), "Phase 2: On Disk");

        let mut cached = sample_metadata(Local::now());
        cached.current_phase = "Phase 9: Cached".to_string();
        cache.save(&cached).unwrap();

        let meta = cache.get_or_refresh(false).unwrap();
        assert_eq!(meta.current_phase, "Phase 9: Cached");
    }

    #[test]
    fn force_bypasses_fresh_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        write_plan(dir.path(), "Phase 2: On Disk");

        let cached = sample_metadata(Local::now());
        cache.save(&cached).unwrap();

        let meta = cache.get_or_refresh(true).unwrap();
        assert_eq!(meta.current_phase, "Phase 2: On Disk");
    }

    #[test]
    fn stale_cache_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        write_plan(dir.path(), "Phase 2: On Disk");

        let mut stale = sample_metadata(Local::now() - Duration::days(45));
        stale.current_phase = "Phase 9: Cached".to_string();
        cache.save(&stale).unwrap();

        let meta = cache.get_or_refresh(false).unwrap();
        assert_eq!(meta.current_phase, "Phase 2: On Disk");

        let persisted = cache.load().unwrap().unwrap();
        assert_eq!(persisted.current_phase, "Phase 2: On Disk");
    }

    #[test]
    fn refresh_with_missing_plan_errors() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());

        let err = cache.get_or_refresh(false).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Parse(ParseError::PlanNotFound { .. })
        ));
    }

    #[test]
    fn refresh_extracts_template_days() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        std::fs::write(
            dir.path().join("plan.md"),
            indoc! {"
                ## Phase 2: Build — **Nov 18 - Dec 15, 2025**

                ### Weekly Template Structure

                | Day | Workout |
                |-----|---------|
                | Wed | Strength |
            "},
        )
        .unwrap();

        let meta = cache.get_or_refresh(false).unwrap();
        assert_eq!(
            meta.phase_start,
            Some(NaiveDate::from_ymd_opt(2025, 11, 18).unwrap())
        );
        assert_eq!(
            meta.weekly_template,
            BTreeMap::from([(Day::Wed, "Strength".to_string())])
        );
    }

    proptest! {
        #[test]
        fn age_alone_flips_staleness_exactly_at_the_threshold(age_days in 0i64..120) {
            let cache = MetadataCache::new(
                PathBuf::from("plan.md"),
                PathBuf::from("metadata.json"),
                DEFAULT_MAX_AGE_DAYS,
            );
            let meta = sample_metadata(Local::now() - Duration::days(age_days));
            prop_assert_eq!(cache.is_stale(&meta), age_days > DEFAULT_MAX_AGE_DAYS);
        }
    }
}
