//! Item-level parsing.
//!
//! The upstream API reports item levels as localized strings such as
//! `"1,620.00"`. Comparisons and filtering need a plain `f64`.

/// Error returned when an item-level string cannot be parsed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid item level '{raw}'")]
pub struct LevelParseError {
    /// The original string as received from the API.
    pub raw: String,
}

/// Parse an upstream item-level string (e.g. `"1,620.00"`) into an `f64`.
///
/// Thousands separators are stripped before parsing. Negative or
/// non-numeric values are rejected.
pub fn parse_item_level(raw: &str) -> Result<f64, LevelParseError> {
    let cleaned = raw.trim().replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(level) if level.is_finite() && level >= 0.0 => Ok(level),
        _ => Err(LevelParseError {
            raw: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_number() {
        assert_eq!(parse_item_level("1620.00").unwrap(), 1620.0);
    }

    #[test]
    fn strips_thousands_separator() {
        assert_eq!(parse_item_level("1,620.00").unwrap(), 1620.0);
        assert_eq!(parse_item_level("1,000,000.50").unwrap(), 1_000_000.5);
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(parse_item_level(" 1580.0 ").unwrap(), 1580.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_item_level("abc").is_err());
        assert!(parse_item_level("").is_err());
        assert!(parse_item_level("NaN").is_err());
    }

    #[test]
    fn rejects_negative() {
        assert!(parse_item_level("-5.0").is_err());
    }

    #[test]
    fn error_carries_original_string() {
        let err = parse_item_level("1.2.3").unwrap_err();
        assert_eq!(err.raw, "1.2.3");
    }
}
