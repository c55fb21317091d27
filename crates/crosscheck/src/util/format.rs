/// Format a probability or ratio as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format hours (or hour-denominated cost) with thousands separators
pub fn format_hours(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let abs_value = value.abs();
    let whole = abs_value.trunc() as i64;
    let frac = ((abs_value - whole as f64) * 100.0).round() as i64;
    // Rounding can carry into the whole part
    let (whole, frac) = if frac == 100 { (whole + 1, 0) } else { (whole, frac) };

    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let grouped: String = result.chars().rev().collect();

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac:02}h")
}

/// Format a sensitivity index; NaN renders as "n/a"
pub fn format_index(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.4}")
    }
}

/// Format an optional ± confidence half-width
pub fn format_conf(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("±{v:.4}"),
        None => "-".to_string(),
    }
}

/// Horizontal bar of `width` cells scaled to `value / max`
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if !(value.is_finite() && max.is_finite()) || max <= 0.0 {
        return String::new();
    }
    let cells = ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(cells)
}
