use std::time::Duration;

const UNIT: u64 = 1024;
const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Binary-scaled size with two decimals, e.g. `1.50 KB`. Below 1024 the count
/// is printed whole: `1023 B`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.2} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

pub fn format_percent(v: f64) -> String {
    format!("{v:.2}%")
}

pub fn format_uptime(seconds: u64) -> String {
    humantime::format_duration(Duration::from_secs(seconds)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_below_one_unit_are_whole() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn bytes_scale_by_1024() {
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
        assert_eq!(format_bytes(u64::MAX), "16.00 EB");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(12.5), "12.50%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn uptime_is_human_readable() {
        assert_eq!(format_uptime(90_061), "1day 1h 1m 1s");
        assert_eq!(format_uptime(0), "0s");
    }
}
