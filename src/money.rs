// 💵 Money helpers - cents in, display text out (and back)

use crate::entities::Cents;

/// Render cents as a dollar string with two decimals: 1234 → "$12.34"
pub fn print_price(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a decimal amount typed by a user into cents.
///
/// Accepts "12", "12.5", "12.50" and ".5"; digits past the second decimal
/// place are dropped, not rounded. Returns None for anything else,
/// including negative amounts.
pub fn parse_price(text: &str) -> Option<Cents> {
    let text = text.trim().trim_start_matches('$');
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let dollars: Cents = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut cents: Cents = 0;
    let mut digits = fraction.chars().take(2).filter_map(|c| c.to_digit(10));
    if let Some(tens) = digits.next() {
        cents += Cents::from(tens) * 10;
    }
    if let Some(units) = digits.next() {
        cents += Cents::from(units);
    }

    dollars.checked_mul(100)?.checked_add(cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_price_pads_cents() {
        assert_eq!(print_price(5), "$0.05");
        assert_eq!(print_price(1234), "$12.34");
        assert_eq!(print_price(1200), "$12.00");
        assert_eq!(print_price(0), "$0.00");
        assert_eq!(print_price(10), "$0.10");
    }

    #[test]
    fn test_print_price_negative() {
        assert_eq!(print_price(-250), "-$2.50");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12"), Some(1200));
        assert_eq!(parse_price("12.5"), Some(1250));
        assert_eq!(parse_price("12.50"), Some(1250));
        assert_eq!(parse_price("0.05"), Some(5));
        assert_eq!(parse_price(".5"), Some(50));
        assert_eq!(parse_price("3."), Some(300));
        assert_eq!(parse_price(" $4.20 "), Some(420));
    }

    #[test]
    fn test_parse_price_truncates_extra_decimals() {
        assert_eq!(parse_price("1.999"), Some(199));
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("."), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("-3"), None);
        assert_eq!(parse_price("1.2.3"), None);
        assert_eq!(parse_price("1,50"), None);
    }
}
