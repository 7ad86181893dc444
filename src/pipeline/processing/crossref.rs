use once_cell::sync::Lazy;
use regex::Regex;

use crate::pipeline::processing::sections::LabeledSections;
use crate::pipeline::processing::text::{normalize_text, push_unique};

/// Detects "Credit or concurrent registration in <target>", with the target
/// running until the next '.' or ';'.
static CREDIT_OR_CONCURRENT_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)credit\s+or\s+concurrent\s+registration\s+in\s+(?P<target>[^.;]+)").unwrap()
});

/// Course code like CS 109, MATH 220, BIOS 399A
static COURSE_CODE_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2,}\s?\d{2,3}[A-Z]?\b").unwrap());

/// Extracts embedded course codes, deduplicated with order preserved.
pub fn extract_course_codes(text: &str) -> Vec<String> {
    let mut codes = Vec::new();
    for m in COURSE_CODE_RX.find_iter(text) {
        push_unique(&mut codes, m.as_str());
    }
    codes
}

fn append_phrase(field: &mut String, phrase: &str) {
    // Idempotent: the phrase may already sit in the field it was found in
    if field.contains(phrase) {
        return;
    }
    if field.is_empty() {
        field.push_str(phrase);
    } else {
        field.push(' ');
        field.push_str(phrase);
    }
}

/// Scans every labeled field and the provisional description for
/// "credit or concurrent registration in X" phrases.
///
/// Each referenced course code satisfies either requirement, so codes are
/// folded into both the prerequisite and corequisite code sets, and the
/// human-readable phrase is appended to both text fields. The phrase is
/// stripped from the visible description only; fields keep it as content.
pub fn fold_cross_references(sections: &mut LabeledSections) {
    // Snapshot before mutating so appended phrases are never re-scanned
    let scanned_fields = [
        sections.prerequisites.clone(),
        sections.corequisites.clone(),
        sections.course_information.clone(),
        sections.class_schedule_information.clone(),
        sections.recommended_background.clone(),
        sections.clean_description.clone(),
    ];

    for field in &scanned_fields {
        for caps in CREDIT_OR_CONCURRENT_RX.captures_iter(field) {
            let target = caps["target"].trim().to_string();
            for code in extract_course_codes(&target) {
                push_unique(&mut sections.prereq_codes, &code);
                push_unique(&mut sections.coreq_codes, &code);
            }
            let phrase = format!("Credit or concurrent registration in {}.", target);
            append_phrase(&mut sections.prerequisites, &phrase);
            append_phrase(&mut sections.corequisites, &phrase);
        }
    }

    // Remove matched spans from the description, highest offset first so
    // earlier deletions never invalidate later span boundaries
    let mut spans: Vec<(usize, usize)> = CREDIT_OR_CONCURRENT_RX
        .find_iter(&sections.clean_description)
        .map(|m| (m.start(), m.end()))
        .collect();
    spans.sort_by(|a, b| b.0.cmp(&a.0));

    let mut description = sections.clean_description.clone();
    for (start, end) in spans {
        description.replace_range(start..end, "");
    }
    sections.clean_description = normalize_text(&description);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::sections::segment_description;

    #[test]
    fn test_extract_course_codes_dedupes_in_order() {
        let codes = extract_course_codes("CS 211 and MATH 180 or CS 211");
        assert_eq!(codes, vec!["CS 211", "MATH 180"]);
    }

    #[test]
    fn test_code_grammar_variants() {
        assert_eq!(extract_course_codes("BIOS 399A"), vec!["BIOS 399A"]);
        assert_eq!(extract_course_codes("CS111"), vec!["CS111"]);
        // single letters and 1-digit numbers are not codes
        assert!(extract_course_codes("vitamin C 1 only").is_empty());
    }

    #[test]
    fn test_bare_phrase_feeds_both_fields_and_code_sets() {
        let mut sections = segment_description("Credit or concurrent registration in CS 211.");
        fold_cross_references(&mut sections);

        assert_eq!(
            sections.prerequisites,
            "Credit or concurrent registration in CS 211."
        );
        assert_eq!(
            sections.corequisites,
            "Credit or concurrent registration in CS 211."
        );
        assert_eq!(sections.prereq_codes, vec!["CS 211"]);
        assert_eq!(sections.coreq_codes, vec!["CS 211"]);
        assert!(!sections
            .clean_description
            .to_lowercase()
            .contains("concurrent registration"));
    }

    #[test]
    fn test_phrase_inside_prerequisites_field() {
        let mut sections = segment_description(
            "Study of data structures. Prerequisite(s): CS 141; and credit or concurrent registration in MATH 215.",
        );
        fold_cross_references(&mut sections);

        assert_eq!(sections.prereq_codes, vec!["MATH 215"]);
        assert_eq!(sections.coreq_codes, vec!["MATH 215"]);
        // The phrase stays in the prerequisites text and is mirrored into
        // corequisites
        assert!(sections.prerequisites.starts_with("CS 141;"));
        assert!(sections
            .corequisites
            .contains("Credit or concurrent registration in MATH 215."));
        assert_eq!(sections.clean_description, "Study of data structures.");
    }

    #[test]
    fn test_phrase_append_is_idempotent() {
        let mut sections = segment_description("Credit or concurrent registration in CS 211.");
        fold_cross_references(&mut sections);
        let first_pass = sections.clone();
        fold_cross_references(&mut sections);
        assert_eq!(sections.prerequisites, first_pass.prerequisites);
        assert_eq!(sections.corequisites, first_pass.corequisites);
        assert_eq!(sections.prereq_codes, first_pass.prereq_codes);
    }

    #[test]
    fn test_multiple_phrases_removed_back_to_front() {
        let mut sections = segment_description(
            "Credit or concurrent registration in CS 211. Also credit or concurrent registration in MATH 215. Fin.",
        );
        fold_cross_references(&mut sections);

        assert_eq!(sections.prereq_codes, vec!["CS 211", "MATH 215"]);
        assert!(!sections
            .clean_description
            .to_lowercase()
            .contains("concurrent registration"));
        assert!(sections.clean_description.contains("Fin."));
    }

    #[test]
    fn test_target_stops_at_semicolon() {
        let mut sections = segment_description(
            "Credit or concurrent registration in CS 211; instructor approval required.",
        );
        fold_cross_references(&mut sections);
        assert_eq!(
            sections.prerequisites,
            "Credit or concurrent registration in CS 211."
        );
        assert!(sections
            .clean_description
            .contains("instructor approval required."));
    }
}
