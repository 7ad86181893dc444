use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::pipeline::processing::normalize::CourseRecord;

static NON_ALPHANUMERIC_RX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").unwrap());

/// Leading alphabetic subject code, e.g. "MATH 220" -> "MATH"
static SUBJECT_CODE_RX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([A-Z&]+)\s*\d").unwrap());

/// Metadata carried by every document and inherited by its chunks. Field
/// names are stable; downstream retrieval keys on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub course_code: String,
    pub class_name: String,
    pub subject: String,
    pub subject_code: String,
    pub credits_raw: String,
    pub credits_min: Option<f64>,
    pub credits_max: Option<f64>,
    pub prereq_codes: Vec<String>,
    pub coreq_codes: Vec<String>,
    pub source_url: String,
}

/// The canonical rendered representation of one deduplicated course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDocument {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

pub fn slugify(text: &str) -> String {
    NON_ALPHANUMERIC_RX
        .replace_all(text, "-")
        .trim_matches('-')
        .to_lowercase()
}

/// Deterministic upsert key: a readable slug of the inputs joined with the
/// first 12 hex chars of their SHA-256 digest. Same inputs, same id.
pub fn stable_id(course_code: &str, class_name: &str) -> String {
    let base = format!("{}::{}", course_code, class_name);
    let digest = hex::encode(Sha256::digest(base.as_bytes()));
    format!("{}::{}", slugify(&base), &digest[..12])
}

pub fn subject_code_from_course(course_code: &str) -> String {
    SUBJECT_CODE_RX
        .captures(course_code)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Renders one course record into its canonical document: a fixed-order
/// textual body of blank-line separated blocks plus retrieval metadata.
pub fn assemble_document(record: &CourseRecord) -> CourseDocument {
    let subject_code = subject_code_from_course(&record.course_code);

    let mut header = vec![format!(
        "Course: {} — {}",
        record.course_code, record.class_name
    )];
    if !record.section_title.is_empty() {
        header.push(format!("Subject: {}", record.section_title));
    } else if !subject_code.is_empty() {
        header.push(format!("Subject Code: {}", subject_code));
    }
    if !record.credits_raw.is_empty() {
        header.push(format!("Credits: {}", record.credits_raw));
    }

    let mut blocks = vec![header.join("\n")];

    let description = if record.description.is_empty() {
        "(No description provided.)"
    } else {
        record.description.as_str()
    };
    blocks.push(format!("Description:\n{}", description));

    let labeled = [
        ("Prerequisites:", &record.prerequisites),
        ("Corequisites:", &record.corequisites),
        ("Course Information:", &record.course_information),
        (
            "Class Schedule Information:",
            &record.class_schedule_information,
        ),
        ("Recommended Background:", &record.recommended_background),
    ];
    for (label, content) in labeled {
        if !content.is_empty() {
            blocks.push(format!("{}\n{}", label, content));
        }
    }
    if !record.prereq_codes.is_empty() {
        blocks.push(format!(
            "Prereq Codes (parsed):\n{}",
            record.prereq_codes.join(", ")
        ));
    }
    if !record.coreq_codes.is_empty() {
        blocks.push(format!(
            "Coreq Codes (parsed):\n{}",
            record.coreq_codes.join(", ")
        ));
    }

    CourseDocument {
        id: stable_id(&record.course_code, &record.class_name),
        text: blocks.join("\n\n"),
        metadata: DocumentMetadata {
            course_code: record.course_code.clone(),
            class_name: record.class_name.clone(),
            subject: record.section_title.clone(),
            subject_code,
            credits_raw: record.credits_raw.clone(),
            credits_min: record.credits_min,
            credits_max: record.credits_max,
            prereq_codes: record.prereq_codes.clone(),
            coreq_codes: record.coreq_codes.clone(),
            source_url: record.source_url.clone(),
        },
    }
}
