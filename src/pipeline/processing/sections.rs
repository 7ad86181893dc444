use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pipeline::processing::text::normalize_text;

/// The fixed label vocabulary recognized inside description blocks, in any
/// order and case.
static LABEL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(Prerequisite\(s\):|Prerequisites?:|Corequisite\(s\):|Co[- ]?requisites?:|Requires concurrent registration in |Course Information:|Class Schedule Information:|Recommended background:)",
    )
    .unwrap()
});

/// Labeled sections split out of a course description, plus the leftover
/// plain description and any course codes folded in by the cross-reference
/// pass. Absent sections are empty strings, never missing keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledSections {
    pub prerequisites: String,
    pub corequisites: String,
    pub course_information: String,
    pub class_schedule_information: String,
    pub recommended_background: String,
    pub clean_description: String,
    pub prereq_codes: Vec<String>,
    pub coreq_codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LabelKind {
    Prerequisites,
    Corequisites,
    CourseInformation,
    ClassScheduleInformation,
    RecommendedBackground,
}

fn classify_label(label: &str) -> LabelKind {
    let label = label.to_lowercase();
    if label.contains("prereq") {
        LabelKind::Prerequisites
    } else if label.contains("requisite") || label.contains("requires concurrent registration") {
        // covers corequisite, co-requisite, and co requisite spellings
        LabelKind::Corequisites
    } else if label.contains("course information") {
        LabelKind::CourseInformation
    } else if label.contains("class schedule") {
        LabelKind::ClassScheduleInformation
    } else {
        LabelKind::RecommendedBackground
    }
}

fn join_accumulated(existing: &str, addition: &str) -> String {
    if existing.is_empty() {
        addition.to_string()
    } else if addition.is_empty() {
        existing.to_string()
    } else {
        format!("{} {}", existing, addition)
    }
}

/// Partitions normalized description text into labeled sections and the
/// leftover plain description.
///
/// Two passes: first locate every label occurrence by position, then cut the
/// text into a plain prefix run and one content run per label (label end up
/// to the next label start, or end of string). Corequisite-family content
/// accumulates space-joined; other repeated labels keep the last occurrence.
pub fn segment_description(description: &str) -> LabeledSections {
    let text = normalize_text(description);
    let mut sections = LabeledSections::default();

    let spans: Vec<(usize, usize, LabelKind)> = LABEL_RX
        .find_iter(&text)
        .map(|m| (m.start(), m.end(), classify_label(m.as_str())))
        .collect();

    if spans.is_empty() {
        sections.clean_description = text;
        return sections;
    }

    let mut plain_runs: Vec<&str> = Vec::new();
    if spans[0].0 > 0 {
        plain_runs.push(&text[..spans[0].0]);
    }

    for (i, (_, end, kind)) in spans.iter().enumerate() {
        let content_end = spans.get(i + 1).map(|next| next.0).unwrap_or(text.len());
        let content = text[*end..content_end].trim();
        match kind {
            LabelKind::Prerequisites => sections.prerequisites = content.to_string(),
            LabelKind::Corequisites => {
                sections.corequisites = join_accumulated(&sections.corequisites, content)
            }
            LabelKind::CourseInformation => sections.course_information = content.to_string(),
            LabelKind::ClassScheduleInformation => {
                sections.class_schedule_information = content.to_string()
            }
            LabelKind::RecommendedBackground => {
                sections.recommended_background = content.to_string()
            }
        }
    }

    sections.clean_description = normalize_text(&plain_runs.join(" "));
    sections
}
