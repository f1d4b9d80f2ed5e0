//! Display helpers shared by the HUD and the headless log

use crate::sim::{HORSE_COLORS, RaceResult};

/// Human names for the roster palette, index-aligned with `HORSE_COLORS`
const COLOR_NAMES: [&str; 20] = [
    "Red", "Teal", "Yellow", "Mint", "Pink", "Lavender", "Peach", "Green", "Cream", "Aqua",
    "Rose", "Purple", "Apricot", "Lime", "Coral", "Sky Blue", "Salmon", "Dusty Rose", "Sage",
    "Blush",
];

/// 1 -> "1st", 2 -> "2nd", 11 -> "11th", 23 -> "23rd"
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Round header, e.g. "1ST"
pub fn round_label(round: u32) -> String {
    ordinal(round).to_uppercase()
}

/// Palette name of a hex color tag
pub fn color_name(color: &str) -> &'static str {
    HORSE_COLORS
        .iter()
        .position(|c| c.eq_ignore_ascii_case(color))
        .and_then(|index| COLOR_NAMES.get(index).copied())
        .unwrap_or("Unknown")
}

/// Milliseconds as seconds with two decimals, e.g. "12.34s"
pub fn finish_seconds(ms: f64) -> String {
    format!("{:.2}s", ms / 1000.0)
}

/// One results line, e.g. "1st  Grace Hopper  12.34s"
pub fn result_line(result: &RaceResult) -> String {
    format!(
        "{:<5}{:<22}{}",
        ordinal(result.position),
        result.horse_name,
        finish_seconds(result.time)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (10, "10th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (101, "101st"),
            (111, "111th"),
            (0, "0th"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected, "ordinal({n})");
        }
    }

    #[test]
    fn test_round_label() {
        assert_eq!(round_label(1), "1ST");
        assert_eq!(round_label(6), "6TH");
    }

    #[test]
    fn test_color_name() {
        assert_eq!(color_name("#FF6B6B"), "Red");
        assert_eq!(color_name("#a8dadc"), "Sky Blue");
        assert_eq!(color_name("#FFB6B9"), "Blush");
        assert_eq!(color_name("#000000"), "Unknown");
        assert_eq!(color_name(""), "Unknown");
    }

    #[test]
    fn test_finish_seconds() {
        assert_eq!(finish_seconds(12340.0), "12.34s");
        assert_eq!(finish_seconds(500.0), "0.50s");
        assert_eq!(finish_seconds(0.0), "0.00s");
    }

    #[test]
    fn test_result_line() {
        let result = RaceResult {
            position: 2,
            horse_name: "Grace Hopper".to_string(),
            horse_id: 2,
            time: 9500.0,
        };
        let line = result_line(&result);
        assert!(line.starts_with("2nd"));
        assert!(line.contains("Grace Hopper"));
        assert!(line.ends_with("9.50s"));
    }
}
