use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::processing::text::normalize_text;

/// Credit-hours clause anchored at the end of a title line.
/// Accepts single values (3), ranges (1-3 / 1–3), or "3 or 4", with optional
/// decimals and an optional trailing period.
static HOURS_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<credits_raw>\d+(?:\.\d+)?(?:\s*(?:or|-|–)\s*\d+(?:\.\d+)?)?)\s*hour(?:s)?\.?\s*$",
    )
    .unwrap()
});

/// Course code prefix like "PHIL 106." or "MATH 220."
static CODE_PREFIX_RX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<course_code>[A-Z& ]+\d+[A-Z]?)\.\s*").unwrap());

static CREDIT_SEPARATOR_RX: Lazy<Regex> = Lazy::new(|| Regex::new(r"or|-|–").unwrap());

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TitleError {
    #[error("no credit-hours clause found: {0}")]
    MalformedTitle(String),

    #[error("no course code found: {0}")]
    MissingCourseCode(String),
}

/// Structured fields parsed out of a course title line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTitle {
    pub course_code: String,
    pub class_name: String,
    pub credits_raw: String,
    pub credits_min: f64,
    pub credits_max: f64,
}

/// Parses a title line like:
///   PHIL 106. What Is Religion? 3 hours.
///   BIOS 399. Independent Research. 1–3 hours.
///   MATH 220. Calculus. 3 or 4 hours.
/// Works regardless of whether the class name ends in '.', '?', ':', etc.
pub fn parse_title(title: &str) -> Result<ParsedTitle, TitleError> {
    let text = normalize_text(title);

    // Credits come off the tail first
    let hours = HOURS_RX
        .captures(&text)
        .ok_or_else(|| TitleError::MalformedTitle(text.clone()))?;
    let hours_span = hours.get(0).unwrap();
    let credits_raw = normalize_text(&hours["credits_raw"]);

    let numbers: Vec<f64> = CREDIT_SEPARATOR_RX
        .split(&credits_raw)
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .collect();
    if numbers.is_empty() {
        return Err(TitleError::MalformedTitle(text.clone()));
    }
    let credits_min = numbers.iter().cloned().fold(f64::INFINITY, f64::min);
    let credits_max = numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // Course code prefix on what remains
    let left = text[..hours_span.start()].trim();
    let code = CODE_PREFIX_RX
        .captures(left)
        .ok_or_else(|| TitleError::MissingCourseCode(text.clone()))?;
    let course_code = normalize_text(&code["course_code"]);

    // Everything between the code prefix and the credit clause is the class
    // name, minus trailing punctuation
    let class_name = left[code.get(0).unwrap().end()..]
        .trim()
        .trim_end_matches(|c: char| matches!(c, ' ' | '.' | ';' | ':' | '?' | '—' | '–' | '-'));
    let class_name = normalize_text(class_name);

    Ok(ParsedTitle {
        course_code,
        class_name,
        credits_raw,
        credits_min,
        credits_max,
    })
}
