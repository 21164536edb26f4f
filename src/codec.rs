//! Line codec for the flat assignment file.
//!
//! One record per line: `name|course|due_date|repeat_type`. The repeat tag is
//! optional on read and always written.

use crate::assignment::{Assignment, RepeatType};
use chrono::NaiveDate;

pub const DELIMITER: char = '|';
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strict `YYYY-MM-DD`; surrounding whitespace is rejected.
pub fn parse_due_date(input: &str) -> Option<NaiveDate> {
    // chrono skips whitespace ahead of numeric fields
    if input.len() != input.trim().len() {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

/// Encodes a record as a single terminated line.
///
/// The format has no escaping, so a delimiter or line break inside `name` or
/// `course` is replaced with a space.
pub fn encode(record: &Assignment) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}\n",
        sanitize_field(&record.name),
        sanitize_field(&record.course),
        record.due_date_iso(),
        record.repeat_type.as_str()
    )
}

/// Decodes one line. Returns `None` for anything that is not a record.
pub fn decode(line: &str) -> Option<Assignment> {
    let parts: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if parts.len() < 3 {
        return None;
    }
    let due_date = parse_due_date(parts[2])?;
    let repeat_type = parts
        .get(3)
        .map(|tag| RepeatType::coerce(tag))
        .unwrap_or_default();
    Some(Assignment::new(parts[0], parts[1], due_date, repeat_type))
}

fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            DELIMITER | '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}
