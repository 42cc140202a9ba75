//! Generation-parameter text parsing.
//!
//! The annotation blob written by A1111-style tools has a fixed shape: prompt
//! lines, an optional "Negative prompt:" continuation, and a final settings
//! line of comma-separated `Key: Value` pairs where values may be quoted.
//! Parsing is a single pass over owned inputs with no shared state; each call
//! allocates its own output.

mod parser;
mod tokenizer;

pub use parser::{parse_annotation, ParsedAnnotation, NEGATIVE_MARKER};
pub use tokenizer::{tokenize_settings, SettingEntry};
