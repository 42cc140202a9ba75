//! # genmeta
//!
//! Library to extract the generation metadata that AI image tools embed in
//! their output files (prompts, LoRA/style references, sampler settings) and
//! render it as an ordered, typed key/value report.
//!
//! Two sources are understood:
//!
//! - **PNG text chunks**: the caller supplies the chunk key/value map (any
//!   trusted PNG decoder can produce it; the CLI uses the `png` crate). The
//!   `"parameters"` key carries A1111-style plain text, the `"prompt"` key a
//!   ComfyUI workflow graph.
//! - **JPEG/EXIF**: the raw file bytes are scanned for the APP1 Exif payload
//!   and the TIFF `UserComment` tag is decoded.
//!
//! Corrupt or adversarial inputs never produce errors, only the "no metadata"
//! report: every structural failure in the EXIF/TIFF path is caught at the
//! extractor boundary so an image display built on top keeps working.
//!
//! ## Example
//!
//! ```
//! use genmeta::{inspect_jpeg, StyleConfig};
//!
//! let bytes = [0u8; 16]; // not a JPEG
//! let report = inspect_jpeg(&bytes, &StyleConfig::plain());
//! assert_eq!(report.get("Error").map(String::as_str),
//!            Some(genmeta::NO_METADATA_MESSAGE));
//! ```

pub mod exif;
pub mod params;
mod report;

use indexmap::IndexMap;

pub use exif::{annotation_from_jpeg, user_comment, ExifError};
pub use params::{parse_annotation, tokenize_settings, ParsedAnnotation, SettingEntry};
pub use report::{
    build_report, error_report, MetadataReport, StyleConfig, LABEL_ERROR, LABEL_NEGATIVE,
    LABEL_PROMPT, LABEL_STYLE_REFS, NO_METADATA_MESSAGE,
};

/// PNG text-chunk key carrying A1111-style parameter text.
pub const CHUNK_PARAMETERS: &str = "parameters";
/// PNG text-chunk key carrying a ComfyUI workflow graph.
pub const CHUNK_PROMPT: &str = "prompt";

/// File type hint for routing (by magic bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FileType {
    Png,
    Jpeg,
    Unknown,
}

impl FileType {
    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            FileType::Png => "PNG",
            FileType::Jpeg => "JPEG",
            FileType::Unknown => "unknown",
        }
    }
}

/// Detect file type from magic bytes.
#[inline]
pub fn detect_file_type(data: &[u8]) -> FileType {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return FileType::Png;
    }
    if data.starts_with(&[0xFF, 0xD8]) {
        return FileType::Jpeg;
    }
    FileType::Unknown
}

/// Annotation flavor, resolved once at ingestion. The try-parameters, else
/// try-prompt, else no-metadata chain is an explicit match, not runtime type
/// probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// A1111-style plain text, from the `"parameters"` chunk or the EXIF
    /// UserComment.
    PlainText(String),
    /// ComfyUI workflow JSON from the `"prompt"` chunk. Recognized so the
    /// fallback chain stays explicit; graph parsing itself is out of scope.
    GraphJson(String),
}

impl Annotation {
    /// Resolve the flavor from a PNG text-chunk map. `"parameters"` wins over
    /// `"prompt"`; absence of both is normal and yields `None`.
    pub fn from_chunks(chunks: &IndexMap<String, String>) -> Option<Annotation> {
        if let Some(text) = chunks.get(CHUNK_PARAMETERS) {
            return Some(Annotation::PlainText(text.clone()));
        }
        if let Some(json) = chunks.get(CHUNK_PROMPT) {
            return Some(Annotation::GraphJson(json.clone()));
        }
        None
    }

    /// Parse this annotation into prompts and settings. `None` when the text
    /// is empty or the flavor has no parser.
    pub fn parse(&self) -> Option<ParsedAnnotation> {
        match self {
            Annotation::PlainText(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| parse_annotation(text))
            }
            Annotation::GraphJson(_) => None,
        }
    }
}

/// Default numeric predicate for [`inspect_chunks`] / [`inspect_jpeg`].
fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.parse::<f64>().is_ok()
}

/// Build the report for an annotation, or the error report when there is
/// none. Identity escaping; bring your own via [`build_report`] when the
/// output surface needs it.
fn report_for(annotation: Option<Annotation>, styles: &StyleConfig) -> MetadataReport {
    match annotation.and_then(|a| a.parse()) {
        Some(parsed) => build_report(&parsed, styles, str::to_string, is_numeric),
        None => error_report(styles),
    }
}

/// Build a metadata report from a PNG text-chunk map.
pub fn inspect_chunks(chunks: &IndexMap<String, String>, styles: &StyleConfig) -> MetadataReport {
    report_for(Annotation::from_chunks(chunks), styles)
}

/// Build a metadata report from raw JPEG bytes via the EXIF UserComment.
pub fn inspect_jpeg(data: &[u8], styles: &StyleConfig) -> MetadataReport {
    report_for(
        annotation_from_jpeg(data).map(Annotation::PlainText),
        styles,
    )
}
