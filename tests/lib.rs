//! Top-level dispatch tests: file-type sniffing and the annotation
//! fallback chain over PNG chunk maps.

use genmeta::{
    detect_file_type, inspect_chunks, Annotation, FileType, StyleConfig, CHUNK_PARAMETERS,
    CHUNK_PROMPT, LABEL_ERROR, LABEL_PROMPT, NO_METADATA_MESSAGE,
};
use indexmap::IndexMap;

fn chunk_map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn detect_png() {
    let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    assert_eq!(detect_file_type(&data), FileType::Png);
}

#[test]
fn detect_jpeg() {
    assert_eq!(detect_file_type(&[0xFF, 0xD8, 0xFF, 0xE1]), FileType::Jpeg);
}

#[test]
fn detect_unknown() {
    assert_eq!(detect_file_type(&[0u8; 8]), FileType::Unknown);
    assert_eq!(detect_file_type(&[]), FileType::Unknown);
}

#[test]
fn parameters_chunk_produces_report() {
    let chunks = chunk_map(&[(CHUNK_PARAMETERS, "a boat\nSteps: 12")]);
    let report = inspect_chunks(&chunks, &StyleConfig::plain());
    assert_eq!(report.get(LABEL_PROMPT).map(String::as_str), Some("a boat"));
    assert_eq!(report.get("Steps").map(String::as_str), Some("12"));
}

#[test]
fn prompt_chunk_alone_is_graph_flavor() {
    let chunks = chunk_map(&[(CHUNK_PROMPT, "{\"3\":{\"class_type\":\"KSampler\"}}")]);
    assert!(matches!(
        Annotation::from_chunks(&chunks),
        Some(Annotation::GraphJson(_))
    ));
    // Graph parsing is out of scope: the report is the error entry.
    let report = inspect_chunks(&chunks, &StyleConfig::plain());
    assert_eq!(report.len(), 1);
    assert!(report.contains_key(LABEL_ERROR));
}

#[test]
fn missing_both_keys_reports_fixed_message() {
    let chunks = chunk_map(&[("Software", "some editor")]);
    let report = inspect_chunks(&chunks, &StyleConfig::plain());
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.get(LABEL_ERROR).map(String::as_str),
        Some(NO_METADATA_MESSAGE)
    );
}

#[test]
fn blank_parameters_chunk_reports_fixed_message() {
    let chunks = chunk_map(&[(CHUNK_PARAMETERS, "   \n  ")]);
    let report = inspect_chunks(&chunks, &StyleConfig::plain());
    assert_eq!(report.len(), 1);
    assert!(report.contains_key(LABEL_ERROR));
}
