//! # Phone Number Normalization
//!
//! M-Pesa expects MSISDNs in international form without the `+`
//! (`2547XXXXXXXX`). Payers type local numbers (`07XXXXXXXX`) or drop the
//! leading zero, so every number is normalized before submission.

/// Kenyan country calling code
pub const COUNTRY_CODE: &str = "254";

/// Normalize a payer phone number to `254...` form.
///
/// - leading `0` is replaced by `254`
/// - numbers starting with `254` are left alone
/// - anything else gets `254` prepended
///
/// Surrounding whitespace is trimmed first. Every output starts with `254`,
/// so the function is idempotent.
pub fn normalize_phone_number(input: &str) -> String {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix('0') {
        format!("{}{}", COUNTRY_CODE, rest)
    } else if trimmed.starts_with(COUNTRY_CODE) {
        trimmed.to_string()
    } else {
        format!("{}{}", COUNTRY_CODE, trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_examples() {
        assert_eq!(normalize_phone_number("0712345678"), "254712345678");
        assert_eq!(normalize_phone_number("712345678"), "254712345678");
        assert_eq!(normalize_phone_number("254712345678"), "254712345678");
        assert_eq!(normalize_phone_number("  0712345678 "), "254712345678");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "",
            "0",
            "00",
            "254",
            "2",
            "25",
            "0254712345678",
            "0712345678",
            "712345678",
            "254712345678",
            " 0712 ",
            "+254712345678",
            "abc",
        ];
        for input in inputs {
            let once = normalize_phone_number(input);
            assert_eq!(normalize_phone_number(&once), once, "input: {:?}", input);
            assert!(once.starts_with(COUNTRY_CODE));
        }
    }
}
