//! Duration entry parsing: "SS", "MM:SS", "H:MM" and "H:MM:SS".

use crate::error::{DurationError, ParseError, ValidationError};

/// Parse entry text into whole seconds.
///
/// Empty fields between colons are ignored, so "::12" reads as "12". With two
/// fields the second decides the layout: 60 or more means "H:MM", otherwise
/// "MM:SS".
pub fn parse_duration(text: &str) -> Result<u64, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let fields = text
        .split(':')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(parse_field)
        .collect::<Result<Vec<u64>, ParseError>>()?;

    match fields.as_slice() {
        [secs] => Ok(*secs),
        [a, b] if *b >= 60 => hms(*a, *b, 0),
        [a, b] => hms(0, *a, *b),
        [h, m, s] => hms(*h, *m, *s),
        other => Err(ParseError::FieldCount { count: other.len() }),
    }
}

/// Parse entry text into a duration that can arm a countdown.
pub fn parse_countdown_duration(text: &str) -> Result<u64, DurationError> {
    let seconds = parse_duration(text)?;
    validate_duration(seconds)?;
    Ok(seconds)
}

pub fn validate_duration(seconds: u64) -> Result<u64, ValidationError> {
    if seconds == 0 {
        return Err(ValidationError::NonPositive { seconds });
    }
    Ok(seconds)
}

fn parse_field(field: &str) -> Result<u64, ParseError> {
    field.parse::<u64>().map_err(|source| ParseError::InvalidField {
        field: field.to_string(),
        source,
    })
}

fn hms(hours: u64, minutes: u64, seconds: u64) -> Result<u64, ParseError> {
    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or(ParseError::OutOfRange)
}
