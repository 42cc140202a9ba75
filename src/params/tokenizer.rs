//! Quote-aware tokenizer for the settings line of an annotation.

/// One `Key: Value` pair from a settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

/// Split a settings line into ordered key/value entries.
///
/// Commas inside double-quoted spans do not split; an unterminated quote
/// swallows the rest of the line as one value. Per segment, the first `:`
/// separates key from value; segments without a colon are dropped. A value
/// wrapped in exactly one matching pair of double quotes loses that pair.
/// Duplicate keys are preserved in order; the report layer applies last-wins.
pub fn tokenize_settings(line: &str) -> Vec<SettingEntry> {
    let mut entries = Vec::new();
    for segment in split_quote_aware(line) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some(colon) = segment.find(':') else {
            continue;
        };
        let key = segment[..colon].trim();
        let value = strip_outer_quotes(segment[colon + 1..].trim());
        entries.push(SettingEntry {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    entries
}

/// Split on commas that are outside double-quoted spans.
fn split_quote_aware(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&line[start..]);
    parts
}

/// Strip exactly one outer pair of matching double quotes.
fn strip_outer_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
