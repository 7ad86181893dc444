use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::pipeline::processing::crossref::fold_cross_references;
use crate::pipeline::processing::sections::segment_description;
use crate::pipeline::processing::text::normalize_text;
use crate::pipeline::processing::title::parse_title;
use crate::types::RawEntry;

/// Occasional markup artifact that leaks into extracted text
const JUNK_ARTIFACT: &str = "non-javascript:;";

/// A fully normalized course record: parsed title fields, labeled sections,
/// and provenance back to the source page. Created once per raw entry and
/// never mutated; deduplication supersedes records rather than updating them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub section_title: String,
    pub course_code: String,
    pub class_name: String,
    pub credits_raw: String,
    pub credits_min: Option<f64>,
    pub credits_max: Option<f64>,
    pub description: String,
    pub prerequisites: String,
    pub corequisites: String,
    pub course_information: String,
    pub class_schedule_information: String,
    pub recommended_background: String,
    pub prereq_codes: Vec<String>,
    pub coreq_codes: Vec<String>,
    pub source_url: String,
    pub block_index: usize,
}

/// A recorded per-entry parse failure. Failures never abort the batch; they
/// ride alongside the surviving records as an explicit return value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseFailure {
    pub source_url: String,
    pub block_index: usize,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

impl ParseFailure {
    fn new(entry: &RawEntry, message: String) -> Self {
        Self {
            source_url: entry.source_url.clone(),
            block_index: entry.block_index,
            message,
            recorded_at: Utc::now(),
        }
    }
}

fn scrub(text: &str) -> String {
    text.replace(JUNK_ARTIFACT, "").trim().to_string()
}

/// Normalizes one raw entry into a course record.
///
/// Title parse failures degrade rather than abort: the failure is recorded,
/// the raw title becomes the class name, and code/credits stay empty. An
/// entry with neither code nor name is dropped since no document could be
/// keyed from it.
pub fn normalize_entry(entry: &RawEntry) -> (Option<CourseRecord>, Vec<ParseFailure>) {
    let mut failures = Vec::new();

    let (course_code, class_name, credits_raw, credits_min, credits_max) =
        match parse_title(&entry.title) {
            Ok(parsed) => (
                parsed.course_code,
                parsed.class_name,
                parsed.credits_raw,
                Some(parsed.credits_min),
                Some(parsed.credits_max),
            ),
            Err(err) => {
                failures.push(ParseFailure::new(entry, err.to_string()));
                // Best effort: keep a readable class name from the raw title
                (
                    String::new(),
                    normalize_text(&entry.title),
                    String::new(),
                    None,
                    None,
                )
            }
        };

    if course_code.is_empty() && class_name.is_empty() {
        failures.push(ParseFailure::new(
            entry,
            "empty entry: no course code or class name".to_string(),
        ));
        return (None, failures);
    }

    let mut sections = segment_description(&entry.description);
    fold_cross_references(&mut sections);

    let record = CourseRecord {
        section_title: normalize_text(&entry.section_title),
        course_code,
        class_name,
        credits_raw,
        credits_min,
        credits_max,
        description: scrub(&sections.clean_description),
        prerequisites: scrub(&sections.prerequisites),
        corequisites: scrub(&sections.corequisites),
        course_information: scrub(&sections.course_information),
        class_schedule_information: scrub(&sections.class_schedule_information),
        recommended_background: scrub(&sections.recommended_background),
        prereq_codes: sections.prereq_codes,
        coreq_codes: sections.coreq_codes,
        source_url: entry.source_url.clone(),
        block_index: entry.block_index,
    };

    (Some(record), failures)
}

/// Normalizes a batch of raw entries, returning the surviving records and
/// every recorded failure. Entries are independent, so callers may fan this
/// out; this fold is just the simplest merge.
pub fn normalize_batch(entries: &[RawEntry]) -> (Vec<CourseRecord>, Vec<ParseFailure>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for entry in entries {
        let (record, mut entry_failures) = normalize_entry(entry);
        for failure in &entry_failures {
            warn!(
                "parse failure at {} block {}: {}",
                failure.source_url, failure.block_index, failure.message
            );
        }
        failures.append(&mut entry_failures);
        if let Some(record) = record {
            records.push(record);
        }
    }

    debug!(
        "normalized {} entries into {} records with {} failures",
        entries.len(),
        records.len(),
        failures.len()
    );
    (records, failures)
}
