//! Form field validation.

use crate::sell::errors::SellGuiError;

/// Parse a "positive integer" text field: the whole string must be ASCII
/// digits (no sign, no whitespace, no decimal point) and fit in a u32.
/// Anything else is `InvalidInput` naming the offending field.
pub fn parse_positive_integer(raw: &str, field: &'static str) -> Result<u32, SellGuiError> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(SellGuiError::InvalidInput { field });
    }
    raw.parse::<u32>()
        .map_err(|_| SellGuiError::InvalidInput { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_digit_strings() {
        assert_eq!(parse_positive_integer("0", "Score ID").unwrap(), 0);
        assert_eq!(parse_positive_integer("42", "Score ID").unwrap(), 42);
        // Leading zeros are digits too.
        assert_eq!(parse_positive_integer("007", "Score ID").unwrap(), 7);
    }

    #[test]
    fn rejects_everything_else() {
        for raw in ["", "-1", "+1", "1.5", " 5", "5 ", "abc", "1e3"] {
            let err = parse_positive_integer(raw, "Item Sell Value").unwrap_err();
            assert!(
                matches!(err, SellGuiError::InvalidInput { field: "Item Sell Value" }),
                "{raw:?} should be invalid"
            );
        }
    }

    #[test]
    fn rejects_values_past_u32() {
        assert!(parse_positive_integer("99999999999999999999", "Score ID").is_err());
    }

    #[test]
    fn error_message_names_the_field() {
        let err = parse_positive_integer("nope", "Score ID").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a positive integer for Score ID.");
    }
}
