use chrono::{Local, TimeZone};

/// Abbreviates large values: `1500` -> `1.5K`, `2300000` -> `2.3M`.
pub fn format_number(num: i64) -> String {
    let value = num as f64;
    if value >= 1_000_000_000.0 {
        return format!("{:.1}B", value / 1_000_000_000.0);
    }
    if value >= 1_000_000.0 {
        return format!("{:.1}M", value / 1_000_000.0);
    }
    if value >= 1_000.0 {
        return format!("{:.1}K", value / 1_000.0);
    }
    num.to_string()
}

/// `HH:MM:SS`; hours keep growing past 99.
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Non-negative integer with thousands separators. Fractions are truncated.
pub fn format_grouped(value: f64) -> String {
    let whole = if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    };
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Local wall-clock time for an epoch-seconds timestamp, `-` when absent.
pub fn format_clock(timestamp: Option<f64>) -> String {
    timestamp
        .filter(|ts| ts.is_finite() && *ts > 0.0)
        .and_then(|ts| Local.timestamp_opt(ts.trunc() as i64, 0).single())
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_numbers() {
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_300_000), "2.3M");
        assert_eq!(format_number(4_000_000_000), "4.0B");
        assert_eq!(format_number(1_000), "1.0K");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(-2_500), "-2500");
    }

    #[test]
    fn formats_uptime() {
        assert_eq!(format_uptime(3661), "01:01:01");
        assert_eq!(format_uptime(0), "00:00:00");
        assert_eq!(format_uptime(360_000), "100:00:00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.9), "999");
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
        assert_eq!(format_grouped(-5.0), "0");
        assert_eq!(format_grouped(f64::NAN), "0");
    }

    #[test]
    fn clock_placeholder_for_missing_timestamps() {
        assert_eq!(format_clock(None), "-");
        assert_eq!(format_clock(Some(0.0)), "-");
        assert_eq!(format_clock(Some(1_700_000_000.0)).len(), 8);
    }
}
