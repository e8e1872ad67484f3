//! Human-friendly duration values for CLI flags

use std::time::Duration;

/// Parse `500ms`, `1.5s`, `2m`, `1h` or bare seconds
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();

    let parse = |number: &str| {
        number
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid duration '{value}'"))
    };

    let secs = if let Some(n) = value.strip_suffix("ms") {
        parse(n)? / 1000.0
    } else if let Some(n) = value.strip_suffix('s') {
        parse(n)?
    } else if let Some(n) = value.strip_suffix('m') {
        parse(n)? * 60.0
    } else if let Some(n) = value.strip_suffix('h') {
        parse(n)? * 3600.0
    } else {
        parse(value)?
    };

    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("duration '{value}' must be finite and not negative"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn test_bare_seconds() {
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration(" 0 ").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
        assert!(parse_duration("10d").is_err());
        assert!(parse_duration("-1s").is_err());
        assert!(parse_duration("NaNs").is_err());
    }
}
