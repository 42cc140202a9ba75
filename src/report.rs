//! Ordered metadata report assembly and display styling.
//!
//! The report is a presentation-ready label to styled-value mapping. Style
//! tokens are opaque fragments concatenated around text: the CLI passes ANSI
//! escapes, a web front end would pass span markup. Escaping is supplied by
//! the caller and always runs before style tokens are inserted, so the tokens
//! themselves are never escaped.

use indexmap::IndexMap;

use crate::params::ParsedAnnotation;

/// Fixed message for the error pseudo-entry when nothing could be extracted.
pub const NO_METADATA_MESSAGE: &str = "No parameters or prompt sections in metadata";

/// Report label for the positive prompt.
pub const LABEL_PROMPT: &str = "Prompt";
/// Report label for the negative prompt (omitted when empty).
pub const LABEL_NEGATIVE: &str = "Negative prompt";
/// Report label for the joined style references (omitted when none).
pub const LABEL_STYLE_REFS: &str = "Style references";
/// Report label for the error pseudo-entry.
pub const LABEL_ERROR: &str = "Error";

/// Settings key whose value is rendered in the file style.
const MODEL_KEY: &str = "Model";

/// Ordered report: label to styled value. Order is significant: prompt,
/// negative prompt, style references, then settings in appearance order.
pub type MetadataReport = IndexMap<String, String>;

/// Named style tokens threaded explicitly into report construction; never
/// interpreted beyond concatenation.
#[derive(Debug, Clone, Default)]
pub struct StyleConfig {
    /// Applied to labels by the presentation layer.
    pub header: String,
    /// Closes any opened style.
    pub reset: String,
    /// Numeric setting values and style-reference weights.
    pub numeric: String,
    /// File-name values (model checkpoints, style-reference files).
    pub file: String,
    /// The error pseudo-entry.
    pub error: String,
}

impl StyleConfig {
    /// All tokens empty; values come out as plain escaped text.
    pub fn plain() -> Self {
        Self::default()
    }

    /// ANSI escape codes for terminal output.
    pub fn ansi() -> Self {
        Self {
            header: "\x1b[1;36m".to_string(),
            reset: "\x1b[0m".to_string(),
            numeric: "\x1b[33m".to_string(),
            file: "\x1b[35m".to_string(),
            error: "\x1b[1;31m".to_string(),
        }
    }
}

/// Assemble the ordered report from a parsed annotation.
///
/// `escape` and `is_numeric` come from the surrounding environment (identity
/// escaping is fine for terminals). Duplicate settings keys collapse
/// last-wins at their first position. A parse with no prompts, no references
/// and no settings yields the single error entry instead of an empty report.
pub fn build_report(
    parsed: &ParsedAnnotation,
    styles: &StyleConfig,
    escape: impl Fn(&str) -> String,
    is_numeric: impl Fn(&str) -> bool,
) -> MetadataReport {
    if parsed.positive.is_empty()
        && parsed.negative.is_empty()
        && parsed.style_refs.is_empty()
        && parsed.settings.is_empty()
    {
        return error_report(styles);
    }

    let mut report = MetadataReport::new();
    report.insert(LABEL_PROMPT.to_string(), escape(&parsed.positive));
    if !parsed.negative.is_empty() {
        report.insert(LABEL_NEGATIVE.to_string(), escape(&parsed.negative));
    }
    if !parsed.style_refs.is_empty() {
        let joined = parsed
            .style_refs
            .iter()
            .map(|r| format_style_ref(r, styles, &escape))
            .collect::<Vec<_>>()
            .join(", ");
        report.insert(LABEL_STYLE_REFS.to_string(), joined);
    }
    for entry in &parsed.settings {
        let styled = style_setting_value(&entry.key, &entry.value, styles, &escape, &is_numeric);
        report.insert(escape(&entry.key), styled);
    }
    report
}

/// The single-entry report used when no annotation was usable. Replaces the
/// whole report; never merged with partial data.
pub fn error_report(styles: &StyleConfig) -> MetadataReport {
    let mut report = MetadataReport::new();
    report.insert(
        LABEL_ERROR.to_string(),
        format!("{}{}{}", styles.error, NO_METADATA_MESSAGE, styles.reset),
    );
    report
}

/// Recolor a `<category:file:weight>` reference per component; anything not
/// matching that three-part shape passes through the escape function as-is,
/// angle brackets included.
fn format_style_ref(
    raw: &str,
    styles: &StyleConfig,
    escape: &impl Fn(&str) -> String,
) -> String {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    let parts: Vec<&str> = inner.split(':').collect();
    if let [category, file, weight] = parts[..] {
        format!(
            "{}:{}{}{}:{}{}{}",
            escape(category),
            styles.file,
            escape(file),
            styles.reset,
            styles.numeric,
            escape(weight),
            styles.reset,
        )
    } else {
        escape(raw)
    }
}

/// Type a setting value for display: numeric values get the numeric style,
/// the Model value gets the file style, everything else stays plain.
fn style_setting_value(
    key: &str,
    value: &str,
    styles: &StyleConfig,
    escape: &impl Fn(&str) -> String,
    is_numeric: &impl Fn(&str) -> bool,
) -> String {
    let escaped = escape(value);
    if is_numeric(value) {
        format!("{}{}{}", styles.numeric, escaped, styles.reset)
    } else if key == MODEL_KEY {
        format!("{}{}{}", styles.file, escaped, styles.reset)
    } else {
        escaped
    }
}
