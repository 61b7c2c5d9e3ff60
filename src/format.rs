//! Price formatting using the Indian digit grouping convention
//!
//! The last three integer digits form the first group and every group to
//! the left of it has two digits: `12,34,567.89`.

/// Format a price with two fractional digits and Indian grouping.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    // "-0.00" is not a price
    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');

    let mut out = String::with_capacity(fixed.len() + integer.len() / 2 + 1);
    if negative {
        out.push('-');
    }
    out.push_str(&group_indian(integer));
    out.push('.');
    out.push_str(fraction);
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
