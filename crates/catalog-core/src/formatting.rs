//! Number formatting for metric cards and text tables.

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use catalog_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(8807), "8,807");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Format a floating-point value with thousands separators and a fixed
/// number of decimals. Non-finite values render as `"n/a"`.
///
/// # Examples
///
/// ```
/// use catalog_core::formatting::format_decimal;
///
/// assert_eq!(format_decimal(99.577, 1), "99.6");
/// assert_eq!(format_decimal(1234.5, 2), "1,234.50");
/// assert_eq!(format_decimal(-0.25, 2), "-0.25");
/// ```
pub fn format_decimal(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let formatted = format!("{:.prec$}", value.abs(), prec = decimals);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    // Rounding may turn e.g. -0.001 into "0.00"; drop the sign then.
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Share of `part` in `whole` as a percentage string with one decimal.
///
/// An empty `whole` renders as `"0.0%"`.
///
/// # Examples
///
/// ```
/// use catalog_core::formatting::format_share;
///
/// assert_eq!(format_share(1, 4), "25.0%");
/// assert_eq!(format_share(0, 0), "0.0%");
/// ```
pub fn format_share(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 * 100.0 / whole as f64)
}

/// Format a runtime in minutes as `"1h 30m"`.
///
/// # Examples
///
/// ```
/// use catalog_core::formatting::format_runtime;
///
/// assert_eq!(format_runtime(45.0), "45m");
/// assert_eq!(format_runtime(120.0), "2h");
/// assert_eq!(format_runtime(99.6), "1h 40m");
/// ```
pub fn format_runtime(minutes: f64) -> String {
    if !minutes.is_finite() || minutes < 0.0 {
        return "n/a".to_string();
    }
    let total = minutes.round() as u64;
    match (total / 60, total % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
