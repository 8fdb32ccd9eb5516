//! Rate extraction from free-form model output.
//!
//! Stages run in a fixed order and the first one yielding both rates wins:
//!
//! 1. [`parse_strict_json`]: the whole text is a JSON object.
//! 2. [`parse_brace_substring`]: JSON between the first `{` and the last `}`.
//! 3. [`parse_fragments`]: `usd: 36,85` / `euro 40.10` style fragments.
//!
//! If no stage yields both rates, the result is [`SourceErrorKind::UnparsableOutput`](crate::SourceErrorKind).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::adapters::{number_at, parse_decimal};
use crate::data_source::SourceError;

const USD_KEYS: [&str; 4] = ["/usd", "/USD", "/dolar", "/bcv/usd"];
const EUR_KEYS: [&str; 4] = ["/eur", "/EUR", "/euro", "/bcv/eur"];

static USD_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        fragment_regex(r#"usd(?:\s+bcv)?["']?[:\s]+["']?(\d+[,.]\d+)"#),
        fragment_regex(r#"d[óo]lar(?:es)?(?:\s+bcv)?["']?[:\s]+["']?(\d+[,.]\d+)"#),
    ]
});

static EUR_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        fragment_regex(r#"eur(?:\s+bcv)?["']?[:\s]+["']?(\d+[,.]\d+)"#),
        fragment_regex(r#"euros?(?:\s+bcv)?["']?[:\s]+["']?(\d+[,.]\d+)"#),
    ]
});

fn fragment_regex(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("fragment pattern is a valid regex")
}

/// Stage that produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    StrictJson,
    BraceSubstring,
    Fragments,
}

/// USD/EUR pair recovered from model text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedRates {
    pub usd: f64,
    pub eur: f64,
    pub stage: ExtractionStage,
}

/// Runs every stage in order and returns the first complete pair.
pub fn extract_rates(text: &str) -> Result<ExtractedRates, SourceError> {
    let stages: [(ExtractionStage, fn(&str) -> Option<(f64, f64)>); 3] = [
        (ExtractionStage::StrictJson, parse_strict_json),
        (ExtractionStage::BraceSubstring, parse_brace_substring),
        (ExtractionStage::Fragments, parse_fragments),
    ];

    stages
        .into_iter()
        .find_map(|(stage, parse)| parse(text).map(|(usd, eur)| ExtractedRates { usd, eur, stage }))
        .ok_or_else(|| {
            SourceError::unparsable(format!(
                "no usd/eur rates found in model output ({} chars)",
                text.len()
            ))
        })
}

pub fn parse_strict_json(text: &str) -> Option<(f64, f64)> {
    let value = serde_json::from_str::<Value>(text.trim()).ok()?;
    rates_from_json(&value)
}

pub fn parse_brace_substring(text: &str) -> Option<(f64, f64)> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_strict_json(&text[start..=end])
}

pub fn parse_fragments(text: &str) -> Option<(f64, f64)> {
    let usd = first_capture(USD_PATTERNS.as_slice(), text)?;
    let eur = first_capture(EUR_PATTERNS.as_slice(), text)?;
    Some((usd, eur))
}

fn rates_from_json(value: &Value) -> Option<(f64, f64)> {
    Some((number_at(value, &USD_KEYS)?, number_at(value, &EUR_KEYS)?))
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<f64> {
    patterns
        .iter()
        .filter_map(|pattern| pattern.captures(text))
        .filter_map(|captures| captures.get(1))
        .filter_map(|matched| parse_decimal(matched.as_str()))
        .find(|value| *value > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceErrorKind;

    #[test]
    fn strict_json_wins_when_text_is_an_object() {
        let extracted = extract_rates(r#" {"usd": 36.85, "eur": 40.12} "#).expect("parses");
        assert_eq!(extracted.stage, ExtractionStage::StrictJson);
        assert_eq!((extracted.usd, extracted.eur), (36.85, 40.12));
    }

    #[test]
    fn brace_substring_handles_markdown_fences() {
        let text = "Aquí están las tasas:\n```json\n{\"usd\": \"36,85\", \"eur\": 40.1}\n```\nSaludos";
        let extracted = extract_rates(text).expect("parses");
        assert_eq!(extracted.stage, ExtractionStage::BraceSubstring);
        assert_eq!((extracted.usd, extracted.eur), (36.85, 40.1));
    }

    #[test]
    fn fragments_cover_spanish_prose() {
        let text = "Según el BCV, el Dólar: 36,92 Bs y el Euro: 40,07 Bs al día de hoy.";
        let extracted = extract_rates(text).expect("parses");
        assert_eq!(extracted.stage, ExtractionStage::Fragments);
        assert_eq!((extracted.usd, extracted.eur), (36.92, 40.07));
    }

    #[test]
    fn fragments_accept_bcv_qualified_labels() {
        let text = "Dólar BCV: 36,50 Bs y Euro BCV: 39,80 Bs";
        let extracted = extract_rates(text).expect("parses");
        assert_eq!(extracted.stage, ExtractionStage::Fragments);
        assert_eq!((extracted.usd, extracted.eur), (36.5, 39.8));
        assert_eq!(parse_fragments("USD BCV 36.50, EUR BCV 39.80"), Some((36.5, 39.8)));
    }

    #[test]
    fn fragments_accept_ticker_style_labels() {
        assert_eq!(parse_fragments("USD: 36.50 | EUR: 39.75"), Some((36.5, 39.75)));
    }

    #[test]
    fn brace_stage_falls_through_to_fragments_on_broken_json() {
        let text = "{usd: 36.50, eur: 39.75}";
        assert_eq!(parse_brace_substring(text), None);
        let extracted = extract_rates(text).expect("parses");
        assert_eq!(extracted.stage, ExtractionStage::Fragments);
    }

    #[test]
    fn partial_answers_are_unparsable() {
        let error = extract_rates("El dólar está en 36,50 según el BCV.").expect_err("no euro");
        assert_eq!(error.kind(), SourceErrorKind::UnparsableOutput);

        let error = extract_rates("").expect_err("empty text");
        assert_eq!(error.kind(), SourceErrorKind::UnparsableOutput);
    }

    #[test]
    fn reversed_braces_do_not_panic() {
        assert_eq!(parse_brace_substring("} nothing here {"), None);
    }
}
