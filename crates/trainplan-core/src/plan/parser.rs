//! Training-plan document parser.
//!
//! Extraction runs as an ordered list of strategies per field; the first
//! strategy that matches wins and later ones are not tried. Only the phase
//! name is required. Dates, the weekly table, and the volume target each
//! degrade to a default on their own, never failing the whole extraction.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::error::ParseError;

use super::{Day, WorkoutMetadata, VOLUME_NOT_SPECIFIED};

/// Plan document parser.
pub struct PlanParser {
    /// Compiled regex patterns
    patterns: PlanPatterns,
}

struct PlanPatterns {
    decision_phase: Regex,
    heading_phase: Regex,
    date_range: Regex,
    template_section: Regex,
    template_header: Regex,
    schedule_section: Regex,
    schedule_header: Regex,
    bold: Regex,
    volume: Regex,
}

impl PlanParser {
    pub fn new() -> Self {
        Self {
            patterns: PlanPatterns {
                decision_phase: Regex::new(
                    r"(?i)\*\*Decision:\*\*\s+Starting\s+(Phase \d+[^)\n]+?)\s+(?:fresh on|begins)\b",
                )
                .unwrap(),
                heading_phase: Regex::new(
                    r"(?m)^##[^\n]*?(Phase \d+:\s*[^—*(\n]+)",
                )
                .unwrap(),
                date_range: Regex::new(
                    r"(\w+ \d{1,2})\s*-\s*(\w+ \d{1,2}),?\s*(\d{4})",
                )
                .unwrap(),
                template_section: Regex::new(
                    r"(?i)^#+\s+.*Weekly Template Structure",
                )
                .unwrap(),
                template_header: Regex::new(
                    r"(?i)^\|\s*Day\s*\|\s*Workout\s*\|",
                )
                .unwrap(),
                schedule_section: Regex::new(
                    r"(?i)^#+\s+.*Week \d+ Schedule",
                )
                .unwrap(),
                schedule_header: Regex::new(
                    r"(?i)^\|\s*Day\s*\|\s*Workout\s*\|\s*Details\s*\|",
                )
                .unwrap(),
                bold: Regex::new(
                    r"\*\*([^*]+)\*\*",
                )
                .unwrap(),
                volume: Regex::new(
                    r"(?i)\*\*Weekly Volume[^*]*\*\*:?\s*~?(\d+\s*-\s*\d+\s*miles?|\d+\s*miles?)",
                )
                .unwrap(),
            },
        }
    }

    /// Read and parse the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::PlanNotFound`] when the document is missing and
    /// [`ParseError::PhaseNotFound`] when no phase indicator matches.
    pub fn parse_file(&self, path: &Path) -> Result<WorkoutMetadata, ParseError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(ParseError::PlanNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ParseError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.parse(&content, path)
    }

    /// Parse document text into a [`WorkoutMetadata`] record.
    pub fn parse(&self, content: &str, source: &Path) -> Result<WorkoutMetadata, ParseError> {
        let phase = self
            .extract_phase(content)
            .ok_or(ParseError::PhaseNotFound)?;

        let (phase_start, phase_end) = match self.extract_phase_dates(content, &phase) {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        if let (Some(start), Some(end)) = (phase_start, phase_end) {
            if start > end {
                tracing::warn!("phase dates are reversed: {} comes after {}", start, end);
            }
        }

        // Table search is scoped to the matched phase's section onward so a
        // document holding several phases resolves the right week.
        let region = match self.phase_heading_offset(content, &phase) {
            Some(offset) => &content[offset..],
            None => content,
        };
        let weekly_template = self
            .extract_weekly_template(region)
            .unwrap_or_else(WorkoutMetadata::default_weekly_template);

        let weekly_volume_target = self
            .extract_volume(content)
            .unwrap_or_else(|| VOLUME_NOT_SPECIFIED.to_string());

        Ok(WorkoutMetadata {
            plan_file: source.to_path_buf(),
            current_phase: phase,
            phase_start,
            phase_end,
            weekly_template,
            weekly_volume_target,
            parsed_at: Local::now(),
        })
    }

    /// Phase name, by the first matching strategy: an explicit decision
    /// sentence, then any phase heading.
    fn extract_phase(&self, content: &str) -> Option<String> {
        let strategies: [fn(&Self, &str) -> Option<String>; 2] =
            [Self::decision_sentence_phase, Self::heading_phase];
        strategies.iter().find_map(|extract| extract(self, content))
    }

    fn decision_sentence_phase(&self, content: &str) -> Option<String> {
        self.patterns
            .decision_phase
            .captures(content)
            .map(|caps| caps[1].trim().to_string())
    }

    fn heading_phase(&self, content: &str) -> Option<String> {
        self.patterns
            .heading_phase
            .captures(content)
            .map(|caps| caps[1].trim().to_string())
    }

    /// Byte offset of the heading line that names the phase.
    fn phase_heading_offset(&self, content: &str, phase: &str) -> Option<usize> {
        let heading = Regex::new(&format!(r"(?m)^##[^\n]*{}", regex::escape(phase))).ok()?;
        heading.find(content).map(|m| m.start())
    }

    /// Start/end dates from the phase's heading block.
    ///
    /// The block is the heading line plus following lines up to the next
    /// heading, so `## Phase 2: Build — **Nov 18 - Dec 15, 2025**` and a
    /// `**...**` date line under the heading both match. Any date that fails
    /// to parse leaves the pair absent.
    fn extract_phase_dates(&self, content: &str, phase: &str) -> Option<(NaiveDate, NaiveDate)> {
        let offset = self.phase_heading_offset(content, phase)?;
        let block = heading_block(&content[offset..]);
        let caps = self.patterns.date_range.captures(block)?;

        let year = &caps[3];
        let start = NaiveDate::parse_from_str(&format!("{} {year}", &caps[1]), "%b %d %Y").ok()?;
        let end = NaiveDate::parse_from_str(&format!("{} {year}", &caps[2]), "%b %d %Y").ok()?;
        Some((start, end))
    }

    /// Weekly template, by the first matching table shape.
    fn extract_weekly_template(&self, region: &str) -> Option<BTreeMap<Day, String>> {
        let shapes = [
            (&self.patterns.template_section, &self.patterns.template_header),
            (&self.patterns.schedule_section, &self.patterns.schedule_header),
        ];
        shapes
            .into_iter()
            .find_map(|(section, header)| self.table_under(region, section, header))
    }

    /// Parse the day/workout table under the section heading matched by
    /// `section`. Separator rows and rows whose day cell is not a weekday
    /// abbreviation are skipped; emphasis markup is stripped from cells.
    fn table_under(
        &self,
        region: &str,
        section: &Regex,
        header: &Regex,
    ) -> Option<BTreeMap<Day, String>> {
        let lines: Vec<&str> = region.lines().collect();
        let section_idx = lines.iter().position(|line| section.is_match(line))?;
        let header_idx = section_idx
            + lines[section_idx..]
                .iter()
                .position(|line| header.is_match(line.trim()))?;

        let mut template = BTreeMap::new();
        for line in &lines[header_idx + 1..] {
            let line = line.trim();
            if !line.starts_with('|') {
                break;
            }
            if is_separator_row(line) {
                continue;
            }
            let cells: Vec<&str> = line.split('|').map(str::trim).collect();
            if cells.len() < 3 {
                continue;
            }
            let day_cell = self.patterns.bold.replace_all(cells[1], "$1");
            let Ok(day) = day_cell.trim().parse::<Day>() else {
                continue;
            };
            let workout = self
                .patterns
                .bold
                .replace_all(cells[2], "$1")
                .trim()
                .to_string();
            template.insert(day, workout);
        }
        (!template.is_empty()).then_some(template)
    }

    fn extract_volume(&self, content: &str) -> Option<String> {
        self.patterns
            .volume
            .captures(content)
            .map(|caps| caps[1].trim().to_string())
    }
}

impl Default for PlanParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The heading line plus following lines up to (not including) the next
/// heading.
fn heading_block(tail: &str) -> &str {
    let mut end = 0;
    for (i, line) in tail.split_inclusive('\n').enumerate() {
        if i > 0 && line.trim_start().starts_with('#') {
            break;
        }
        end += line.len();
    }
    &tail[..end]
}

fn is_separator_row(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}
