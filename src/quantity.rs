//! Parsing of numeric-as-text parameter values and duration labels.
//!
//! Upstream rows deliver measured values as text, sometimes with a
//! decimal comma, sometimes with surrounding annotations; deployment
//! listings carry human-readable duration labels like `"10 days"` that
//! need a numeric sort key. This module extracts the numbers those
//! consumers need.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{opt, recognize},
    IResult, Parser,
};

use crate::error::ParseError;

/// A number together with the unit word that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    /// Unit spelling as written, e.g. `"mS/cm"`; empty when absent.
    pub unit: String,
}

fn digits(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_digit()).parse(input)
}

/// A signed decimal literal; the decimal separator may be `.` or `,`.
fn number_literal(input: &str) -> IResult<&str, f64> {
    let (rest, text) = recognize((
        opt(alt((char('-'), char('+')))),
        alt((
            recognize((digits, opt((alt((char('.'), char(','))), digits)))),
            recognize((alt((char('.'), char(','))), digits)),
        )),
    ))
    .parse(input)?;
    let value = text.replace(',', ".").parse().unwrap_or(0.0);
    Ok((rest, value))
}

/// A unit spelling: letters plus the separators common in sensor units.
fn unit_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphabetic() || c == '/' || c == '%').parse(input)
}

/// First numeric literal found anywhere in `text`.
pub fn parse_scalar(text: &str) -> Result<f64, ParseError> {
    parse_quantity(text).map(|quantity| quantity.value)
}

/// First numeric literal in `text` together with the unit word following
/// it, e.g. `"30m"`, `"12.5 mS/cm"`, `"ca. 10 days"`.
pub fn parse_quantity(text: &str) -> Result<Quantity, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut rest = trimmed;
    loop {
        if let Ok((after, value)) = number_literal(rest) {
            let unit = match unit_word(after.trim_start()) {
                Ok((_, word)) => word.to_string(),
                Err(_) => String::new(),
            };
            return Ok(Quantity { value, unit });
        }
        let mut chars = rest.chars();
        if chars.next().is_none() {
            return Err(ParseError::NoNumber(text.to_string()));
        }
        rest = chars.as_str();
    }
}

/// Seconds represented by a duration label, the sort key for
/// human-readable deployment durations.
pub fn duration_to_seconds(text: &str) -> Result<f64, ParseError> {
    let quantity = parse_quantity(text)?;
    let factor = match quantity.unit.to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
        "min" | "mins" | "minute" | "minutes" => 60.0,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600.0,
        "d" | "day" | "days" => 86_400.0,
        "w" | "week" | "weeks" => 604_800.0,
        other => return Err(ParseError::UnknownTimeUnit(other.to_string())),
    };
    Ok(quantity.value * factor)
}
