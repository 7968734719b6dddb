//! # Trainplan Core Library
//!
//! Core logic for Trainplan, a utility that extracts structured metadata
//! from a free-text markdown training plan and keeps a cached copy of that
//! metadata fresh. All operations are available through the standalone CLI
//! binary; this crate carries everything the binary does.
//!
//! ## Architecture
//!
//! - **Plan Parser**: ordered pattern-matching strategies over the plan
//!   document; the first strategy to match wins per field, and every field
//!   except the phase name degrades to a default on a miss
//! - **Metadata Cache**: a single JSON-persisted record with an age- and
//!   phase-boundary-based staleness predicate
//! - **Storage**: TOML-based configuration under the user config directory
//!
//! ## Key Components
//!
//! - [`PlanParser`]: document-to-record extraction
//! - [`MetadataCache`]: load/save plus the `get_or_refresh` staleness loop
//! - [`Config`]: plan location and cache tuning

pub mod cache;
pub mod error;
pub mod plan;
pub mod storage;

pub use cache::MetadataCache;
pub use error::{ConfigError, CoreError, ParseError};
pub use plan::{Day, PlanParser, WorkoutMetadata};
pub use storage::Config;
