//! ISO-8601 duration parsing.
//!
//! The YouTube Data API reports video lengths as ISO-8601 duration strings
//! (e.g. `PT4M13S`, `PT1H2M`, `P1DT2H`).

use regex::Regex;

/// Parser for ISO-8601 duration strings.
pub struct IsoDuration {
    pattern: Regex,
}

impl IsoDuration {
    pub fn new() -> Self {
        // Days and weeks appear for very long videos; fractional seconds
        // are allowed by the standard.
        let pattern = Regex::new(
            r"(?x)
            ^P
            (?:(\d+)W)?
            (?:(\d+)D)?
            (?:T
                (?:(\d+)H)?
                (?:(\d+)M)?
                (?:(\d+(?:\.\d+)?)S)?
            )?$
        ",
        )
        .expect("Invalid regex");

        Self { pattern }
    }

    /// Parse a duration string into total minutes.
    ///
    /// Returns None for strings that are not valid ISO-8601 durations,
    /// including the bare "P"/"PT" forms that carry no components.
    pub fn minutes(&self, duration: &str) -> Option<f64> {
        let caps = self.pattern.captures(duration.trim())?;

        if (1..=5).all(|i| caps.get(i).is_none()) {
            return None;
        }

        let component = |i: usize| -> f64 {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };

        let seconds = component(1) * 7.0 * 86_400.0
            + component(2) * 86_400.0
            + component(3) * 3_600.0
            + component(4) * 60.0
            + component(5);

        Some(seconds / 60.0)
    }
}

impl Default for IsoDuration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_only() {
        let parser = IsoDuration::new();
        assert_eq!(parser.minutes("PT10M"), Some(10.0));
        assert_eq!(parser.minutes("PT4M"), Some(4.0));
        assert_eq!(parser.minutes("PT25M"), Some(25.0));
    }

    #[test]
    fn test_mixed_components() {
        let parser = IsoDuration::new();
        assert_eq!(parser.minutes("PT1H2M3S"), Some(62.05));
        assert_eq!(parser.minutes("PT45S"), Some(0.75));
        assert_eq!(parser.minutes("PT4M30S"), Some(4.5));
    }

    #[test]
    fn test_day_bearing_durations() {
        let parser = IsoDuration::new();
        assert_eq!(parser.minutes("P1DT2H"), Some(24.0 * 60.0 + 120.0));
        assert_eq!(parser.minutes("P1W"), Some(7.0 * 24.0 * 60.0));
    }

    #[test]
    fn test_malformed() {
        let parser = IsoDuration::new();
        assert_eq!(parser.minutes("10:00"), None);
        assert_eq!(parser.minutes("PT"), None);
        assert_eq!(parser.minutes("P"), None);
        assert_eq!(parser.minutes(""), None);
        assert_eq!(parser.minutes("PTXM"), None);
    }
}
