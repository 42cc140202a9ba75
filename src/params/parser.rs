//! Annotation splitter: prompt block, negative prompt, style references,
//! settings line.

use super::tokenizer::{tokenize_settings, SettingEntry};

/// Literal marker separating positive from negative prompt text.
pub const NEGATIVE_MARKER: &str = "Negative prompt:";

/// Punctuation pairs stripped from prompt edges when they wrap the whole text.
const EDGE_WRAPPERS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('(', ')'), ('[', ']')];

/// Parsed annotation: prompts, style references, ordered settings.
///
/// `style_refs` keeps the order of appearance in the positive prompt and is
/// never reordered. Derived per parse; nothing is shared across files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedAnnotation {
    pub positive: String,
    pub negative: String,
    pub style_refs: Vec<String>,
    pub settings: Vec<SettingEntry>,
}

/// Parse a full annotation blob.
///
/// With more than one line, the last line is the settings line and the rest,
/// rejoined, is the prompt block; a single line is solely the prompt block.
/// Within the prompt block, text after [`NEGATIVE_MARKER`] is the negative
/// prompt. Angle-bracket style references are lifted out of the positive
/// prompt before edge cleanup.
pub fn parse_annotation(text: &str) -> ParsedAnnotation {
    let lines: Vec<&str> = text.lines().collect();
    let (prompt_block, settings_line) = match lines.len() {
        0 => (String::new(), None),
        1 => (lines[0].to_string(), None),
        n => (lines[..n - 1].join("\n"), Some(lines[n - 1])),
    };

    let (positive_raw, negative_raw) = match prompt_block.find(NEGATIVE_MARKER) {
        Some(at) => (
            prompt_block[..at].to_string(),
            prompt_block[at + NEGATIVE_MARKER.len()..].to_string(),
        ),
        None => (prompt_block, String::new()),
    };

    let (positive_stripped, style_refs) = extract_style_refs(&positive_raw);

    ParsedAnnotation {
        positive: clean_edges(&positive_stripped).to_string(),
        negative: clean_edges(&negative_raw).to_string(),
        style_refs,
        settings: settings_line.map(tokenize_settings).unwrap_or_default(),
    }
}

/// Lift all non-overlapping `<...>` spans out of `text`, in order of
/// appearance. Returns the text with the spans removed plus the spans
/// themselves, angle brackets included. A `<` with no closing `>` is left in
/// place.
fn extract_style_refs(text: &str) -> (String, Vec<String>) {
    let mut refs = Vec::new();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>').map(|rel| open + rel) else {
            break;
        };
        out.push_str(&rest[..open]);
        refs.push(rest[open..=close].to_string());
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    (out, refs)
}

/// Trim surrounding whitespace plus one layer of matched wrapping
/// punctuation. Only the edges change: a pair is stripped only when the
/// closing character does not also occur inside, so `(foo) and (bar)` keeps
/// its parentheses.
fn clean_edges(text: &str) -> &str {
    let trimmed = text.trim();
    for (open, close) in EDGE_WRAPPERS {
        if trimmed.len() >= 2 && trimmed.starts_with(open) && trimmed.ends_with(close) {
            let inner = &trimmed[open.len_utf8()..trimmed.len() - close.len_utf8()];
            if !inner.contains(close) {
                return inner.trim();
            }
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_negative_marker_means_empty_negative() {
        let parsed = parse_annotation("a quiet forest\nSteps: 20");
        assert_eq!(parsed.positive, "a quiet forest");
        assert_eq!(parsed.negative, "");
        assert_eq!(parsed.settings.len(), 1);
    }

    #[test]
    fn single_line_is_prompt_only() {
        let parsed = parse_annotation("  lone prompt without settings  ");
        assert_eq!(parsed.positive, "lone prompt without settings");
        assert!(parsed.settings.is_empty());
        assert!(parsed.negative.is_empty());
    }

    #[test]
    fn negative_prompt_split() {
        let parsed = parse_annotation("sunny beach\nNegative prompt: rain, fog\nSteps: 30");
        assert_eq!(parsed.positive, "sunny beach");
        assert_eq!(parsed.negative, "rain, fog");
        assert_eq!(parsed.settings[0].key, "Steps");
    }

    #[test]
    fn style_refs_extracted_in_order_and_stripped() {
        let parsed = parse_annotation("a <lora:one:0.5> b <lora:two:1.0> c\nSteps: 1");
        assert_eq!(parsed.style_refs, vec!["<lora:one:0.5>", "<lora:two:1.0>"]);
        assert_eq!(parsed.positive, "a  b  c");
    }

    #[test]
    fn unclosed_angle_bracket_stays_in_text() {
        let parsed = parse_annotation("broken <lora:x\nSteps: 1");
        assert!(parsed.style_refs.is_empty());
        assert_eq!(parsed.positive, "broken <lora:x");
    }

    #[test]
    fn edge_cleanup_strips_one_wrapping_pair_only() {
        let parsed = parse_annotation("\"wrapped prompt\"\nSteps: 1");
        assert_eq!(parsed.positive, "wrapped prompt");
        let parsed = parse_annotation("(foo) and (bar)\nSteps: 1");
        assert_eq!(parsed.positive, "(foo) and (bar)");
    }

    #[test]
    fn multi_line_prompt_block_rejoined() {
        let parsed = parse_annotation("first line\nsecond line\nSteps: 20, Seed: 5");
        assert_eq!(parsed.positive, "first line\nsecond line");
        assert_eq!(parsed.settings.len(), 2);
    }

    #[test]
    fn trailing_comma_survives_cleanup() {
        let parsed = parse_annotation("a cat, <lora:bestlora:0.8>\nSteps: 30");
        assert_eq!(parsed.positive, "a cat,");
        assert_eq!(parsed.style_refs, vec!["<lora:bestlora:0.8>"]);
    }
}
