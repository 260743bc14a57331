//! Formatting helpers for presenting dataset statistics.

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        "—".to_string()
    }
}

/// A summary value the backend could not compute arrives as `None`.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "—".to_string(), |value| format_number(value, decimals))
}

/// Signed coefficient, e.g. `+0.91` / `-0.42`.
pub fn format_coefficient(value: f64) -> String {
    if value.is_finite() {
        format!("{value:+.2}")
    } else {
        "—".to_string()
    }
}

/// Bar width in percent for a coefficient in `[-1, 1]`.
pub fn coefficient_width(value: f64) -> f64 {
    if value.is_finite() {
        (value.abs() * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn format_bytes(len: usize) -> String {
    const KIB: f64 = 1024.0;
    let len = len as f64;
    if len < KIB {
        format!("{len:.0} B")
    } else if len < KIB * KIB {
        format!("{:.1} KB", len / KIB)
    } else {
        format!("{:.1} MB", len / (KIB * KIB))
    }
}
