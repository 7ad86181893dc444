use tracing::debug;

use crate::pipeline::processing::normalize::CourseRecord;

/// Collapses records sharing an exact (course_code, class_name) key down to
/// the variant with the longest description, ties broken by first appearance.
///
/// Duplicates are expected, not errors: later catalog pages legitimately
/// re-list cross-listed courses. Output is ordered by (course_code,
/// class_name).
pub fn dedupe_records(mut records: Vec<CourseRecord>) -> Vec<CourseRecord> {
    let before = records.len();

    // Stable sort: key ascending, description length descending. Stability
    // preserves first-seen order among equal-length descriptions.
    records.sort_by(|a, b| {
        a.course_code
            .cmp(&b.course_code)
            .then_with(|| a.class_name.cmp(&b.class_name))
            .then_with(|| b.description.len().cmp(&a.description.len()))
    });
    records.dedup_by(|later, kept| {
        later.course_code == kept.course_code && later.class_name == kept.class_name
    });

    debug!("deduplicated {} records down to {}", before, records.len());
    records
}
