//! Display and normalization helpers for free-typed survey input.

/// Insert thousands separators into the digits of `value`.
///
/// Every non-digit is dropped first, so formatting an already formatted
/// amount is a no-op.
pub fn format_money(value: &str) -> String {
    let digits = digits_only(value);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Reduce an amount to its bare digits for in-progress editing.
/// Returns text, not a number.
pub fn parse_money(value: &str) -> String {
    digits_only(value)
}

/// Coerce a possibly separated amount to an integer for the final payload.
///
/// Returns `None` when no digits remain or the amount does not fit.
pub fn parse_money_to_number(value: &str) -> Option<u64> {
    let digits = parse_money(value);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Keep only ASCII digits; used for phone numbers as they are typed.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Join the selected dialling prefix with the cleaned national number.
///
/// A number already carrying the selected prefix (`+234 803...` or
/// `234803...`) loses it, then the national trunk prefix (one leading `0`)
/// is dropped. An empty number stays empty so optional contact details are
/// not invented.
pub fn whatsapp_with_country_code(country_code: &str, number: &str) -> String {
    let digits = digits_only(number);
    let code_digits = digits_only(country_code);
    let national = match digits.strip_prefix(code_digits.as_str()) {
        Some(rest) if !code_digits.is_empty() => rest,
        _ => digits.as_str(),
    };
    let national = national.strip_prefix('0').unwrap_or(national);
    if national.is_empty() {
        return String::new();
    }
    format!("{country_code}{national}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_money_groups_by_three_from_the_right() {
        assert_eq!(format_money("1200000"), "1,200,000");
        assert_eq!(format_money("999"), "999");
        assert_eq!(format_money("1000"), "1,000");
        assert_eq!(format_money("₦ 45000abc"), "45,000");
        assert_eq!(format_money(""), "");
        assert_eq!(format_money("no digits"), "");
    }

    #[test]
    fn format_money_is_idempotent() {
        for raw in ["1", "12", "1234", "1,2,3,4,5", "007000", "₦1 200 000.50"] {
            let once = format_money(raw);
            assert_eq!(format_money(&once), once, "{raw}");
            assert_eq!(format_money(&parse_money(&once)), once, "{raw}");
        }
    }

    #[test]
    fn parse_undoes_format_for_digit_strings() {
        for raw in ["5", "123456", "1,200,000", "₦1 200", "12a3", " 45 000 ", "N350,000.00"] {
            assert_eq!(parse_money(&format_money(raw)), parse_money(raw), "{raw}");
        }
        assert_eq!(parse_money("₦1 200"), "1200");
        assert_eq!(parse_money("12a3"), "123");
    }

    #[test]
    fn money_to_number_handles_separators_and_empty() {
        assert_eq!(parse_money_to_number("1,200,000"), Some(1_200_000));
        assert_eq!(parse_money_to_number("350000"), Some(350_000));
        assert_eq!(parse_money_to_number(""), None);
        assert_eq!(parse_money_to_number(",,,"), None);
        assert_eq!(parse_money_to_number("₦ 75,000"), Some(75_000));
    }

    #[test]
    fn whatsapp_combines_code_and_digits() {
        assert_eq!(
            whatsapp_with_country_code("+234", "0803 123 4567"),
            "+2348031234567"
        );
        assert_eq!(whatsapp_with_country_code("+254", "712345678"), "+254712345678");
        assert_eq!(whatsapp_with_country_code("+234", ""), "");
    }

    #[test]
    fn whatsapp_already_in_international_form_keeps_one_prefix() {
        for typed in ["+234 803 123 4567", "2348031234567", "+234 0803 123 4567"] {
            assert_eq!(
                whatsapp_with_country_code("+234", typed),
                "+2348031234567",
                "{typed}"
            );
        }
        assert_eq!(whatsapp_with_country_code("+254", "254712345678"), "+254712345678");
        assert_eq!(digits_only("(0803) 123-4567"), "08031234567");
    }
}
