/// Shown wherever a price or text field is absent.
pub const PLACEHOLDER: &str = "-";

/// Format a yen amount as `1,234円`, or the placeholder when absent.
pub fn format_price(price: Option<i64>) -> String {
    match price {
        Some(value) => format!("{}円", group_thousands(value)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Insert `,` every three digits, keeping the sign.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Truncate to at most `limit` characters (not bytes).
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
