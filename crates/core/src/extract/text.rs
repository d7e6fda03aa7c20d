//! Free-text temperature extraction.
//!
//! Used for HTML pages and loosely formatted info endpoints. Markup is
//! stripped first, then an ordered list of patterns is scanned. Labeled
//! patterns ("temp", "temperature", "thermal") come before bare numeric ones
//! so unrelated numbers on a page are less likely to win. Within a pattern
//! every match is tried in document order; the first candidate accepted by
//! the calibration wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::hardware::calibration::Calibration;
use crate::types::Celsius;

/// One extraction pattern. Capture group 1 must be the numeric candidate.
pub struct TextPattern {
    pub label: &'static str,
    pub regex: Regex,
}

fn pattern(label: &'static str, source: &str) -> TextPattern {
    TextPattern {
        label,
        regex: Regex::new(source).expect("valid regex"),
    }
}

/// Ordered extraction patterns, most specific first.
pub static TEXT_PATTERNS: LazyLock<Vec<TextPattern>> = LazyLock::new(|| {
    vec![
        pattern("temp", r"(?i)temp[^\d]*(\d+)\s*°?\s*c(?:elsius)?\b"),
        pattern("temperature", r"(?i)temperature[^\d]*(\d+)\s*°?\s*c(?:elsius)?\b"),
        pattern("thermal", r"(?i)thermal[^\d]*(\d+)\s*°?\s*c(?:elsius)?\b"),
        pattern("degree-marker", r"(?i)(\d+)\s*°?\s*c(?:elsius)?\b"),
        pattern("degrees-word", r"(?i)(\d+)\s*degrees"),
        pattern("reading-celsius-key", r"(?i)ReadingCelsius[^\d]*(\d+)"),
    ]
});

static SCRIPT_OR_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").expect("valid regex")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

static HTML_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\s*/?\s*[a-z!][^>]*>").expect("valid regex"));

/// Extract a calibrated temperature from free text (or HTML).
pub fn extract(text: &str, calibration: &Calibration) -> Option<Celsius> {
    let text = strip_markup(text);
    TEXT_PATTERNS
        .iter()
        .find_map(|p| scan(p, &text, calibration))
}

/// Like [`extract`], but also reports which pattern matched.
pub fn extract_labeled(text: &str, calibration: &Calibration) -> Option<(&'static str, Celsius)> {
    let text = strip_markup(text);
    TEXT_PATTERNS
        .iter()
        .find_map(|p| scan(p, &text, calibration).map(|t| (p.label, t)))
}

fn scan(pattern: &TextPattern, text: &str, calibration: &Calibration) -> Option<Celsius> {
    pattern
        .regex
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .find_map(|raw| calibration.normalize(f64::from(raw)))
}

/// Reduce an HTML document to its visible text.
///
/// Input that does not look like markup is returned unchanged.
pub fn strip_markup(input: &str) -> String {
    if !HTML_HINT_RE.is_match(input) {
        return decode_entities(input);
    }
    let without_scripts = SCRIPT_OR_STYLE_RE.replace_all(input, " ");
    let without_tags = TAG_RE.replace_all(&without_scripts, " ");
    decode_entities(&without_tags)
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&deg;", "°")
        .replace("&#176;", "°")
        .replace("&#xB0;", "°")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal() -> Calibration {
        Calibration::default()
    }

    #[test]
    fn labeled_temperature_in_plain_text() {
        assert_eq!(extract("Inlet Temp: 87°C", &cal()), Some(27));
    }

    #[test]
    fn labeled_pattern_beats_earlier_bare_number() {
        // "150 C" appears first but only the bare pattern would take it.
        let text = "PSU rated 150 C max. System temperature 88 C";
        assert_eq!(extract_labeled(text, &cal()), Some(("temp", 28)));
    }

    #[test]
    fn skips_candidates_the_calibration_rejects() {
        // 20 -> -40 is rejected, 90 -> 30 accepted.
        assert_eq!(extract("temp 20C, temp 90C", &cal()), Some(30));
    }

    #[test]
    fn falls_back_to_degrees_word() {
        assert_eq!(
            extract_labeled("Chassis at 85 degrees", &cal()),
            Some(("degrees-word", 25))
        );
    }

    #[test]
    fn reads_json_like_reading_celsius_key() {
        assert_eq!(
            extract_labeled(r#"{"ReadingCelsius": 84}"#, &cal()),
            Some(("reading-celsius-key", 24))
        );
    }

    #[test]
    fn strips_html_and_entities() {
        let html = r#"<html><head><style>.t{width:99c}</style>
            <script>var temp = "150C";</script></head>
            <body><table><tr><td>Ambient Temp</td><td>86&deg;C</td></tr></table></body></html>"#;
        assert_eq!(extract(html, &cal()), Some(26));
    }

    #[test]
    fn strip_markup_leaves_plain_text_alone() {
        assert_eq!(strip_markup("temp 3 < 5"), "temp 3 < 5");
    }

    #[test]
    fn unit_must_stand_alone() {
        assert_eq!(extract("Processor: 2 x 128 cores", &cal()), None);
        assert_eq!(extract("Active sessions: 95 connections", &cal()), None);
        assert_eq!(extract("CPU temp: 8 cores at 88C", &cal()), Some(28));
    }

    #[test]
    fn unit_spellings() {
        for text in ["88 C", "88°C", "88C", "88 ° c", "88 Celsius", "(88C)"] {
            assert_eq!(
                extract_labeled(text, &cal()),
                Some(("degree-marker", 28)),
                "{text}"
            );
        }
    }

    #[test]
    fn no_candidate_in_unrelated_text() {
        assert_eq!(extract("firmware version 2.81.81.81", &cal()), None);
        assert_eq!(extract("", &cal()), None);
    }
}
