//! pt-BR numeric codec.
//!
//! Brazilian Portuguese formatting uses `.` as the thousands separator and
//! `,` as the decimal separator, so `1.234,56` reads as `1234.56`.

/// Decodes a pt-BR formatted decimal string.
///
/// Absent, blank, or malformed input decodes to `0.0`; the capture and
/// dashboard forms treat an empty field and an unreadable field the same
/// way. Known limitation: callers cannot distinguish an explicit `"0"` from
/// garbage input; the dashboard flow has no error surface for numeric
/// fields, so the ambiguity is part of the contract.
#[must_use]
pub fn parse_decimal_br(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    let normalized = s.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Formats a monetary value as `R$ 1.234,56`.
///
/// Always two decimal digits; the integer part is grouped in threes with
/// `.`. Non-finite input renders as the zero value instead of failing.
#[must_use]
pub fn format_currency_brl(value: f64) -> String {
    if !value.is_finite() {
        return "R$ 0,00".to_string();
    }
    let negative = value < 0.0;
    // Cents as an integer; `as` saturates, so absurdly large magnitudes
    // still format without overflow.
    let cents = (value.abs() * 100.0).round() as u128;
    let units = cents / 100;
    let frac = cents % 100;
    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if negative && cents > 0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac:02}")
}
