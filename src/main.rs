//! CLI for genmeta: show AI generation metadata embedded in PNG/JPEG files.

#![cfg(feature = "cli")]

use clap::Parser;
use genmeta::{
    detect_file_type, inspect_chunks, inspect_jpeg, FileType, MetadataReport, StyleConfig,
    LABEL_ERROR,
};
use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Parser)]
#[command(name = "genmeta")]
#[command(about = "Show AI generation metadata (prompts, LoRA refs, settings) from image files", long_about = None)]
struct Args {
    /// Path to a file or directory to inspect (use -d/--directory for a whole directory)
    path: Option<String>,

    /// Inspect a whole directory (optionally with -r to recurse into subdirectories)
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    directory: Option<String>,

    /// When inspecting a directory, recurse into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// File extensions to inspect (comma-separated). No-extension files are always inspected (type guessed from content). Use --all to ignore the filter.
    #[arg(short, long, default_value = "png,jpg,jpeg")]
    extensions: String,

    /// Inspect all files regardless of extension (type guessed from content)
    #[arg(long)]
    all: bool,

    /// Output JSON per file (one line per file unless --pretty)
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON (use with --json)
    #[arg(long)]
    pretty: bool,

    /// Quiet: only print files that carry metadata
    #[arg(short, long)]
    quiet: bool,

    /// Disable ANSI colors in human-readable output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let exts: std::collections::HashSet<String> = args
        .extensions
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .collect();

    let path_str = args
        .directory
        .as_ref()
        .or(args.path.as_ref())
        .ok_or("Missing path: give a file/directory as argument or use -d/--directory <DIR>")?;
    let path = Path::new(path_str.as_str());

    if !path.exists() {
        eprintln!("Not found: {}", path.display());
        std::process::exit(1);
    }

    if path.is_file() {
        if args.directory.is_some() {
            eprintln!("--directory expects a directory, not a file: {}", path.display());
            std::process::exit(1);
        }
        inspect_file(path, &args, &exts)?;
        return Ok(());
    }

    if path.is_dir() {
        if !args.quiet {
            eprintln!(
                "Inspecting directory: {} {}",
                path.display(),
                if args.recursive { "(recursive)" } else { "" }
            );
        }
        inspect_dir(path, &args, &exts)?;
        return Ok(());
    }

    eprintln!("Not a file or directory: {}", path.display());
    std::process::exit(1);
}

fn wanted(path: &Path, args: &Args, exts: &std::collections::HashSet<String>) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    // No extension => always inspect (type guessed from content).
    args.all || ext.is_empty() || exts.is_empty() || exts.contains(&ext)
}

fn inspect_file(
    path: &Path,
    args: &Args,
    exts: &std::collections::HashSet<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !wanted(path, args, exts) {
        if !args.quiet {
            eprintln!("Skip (extension): {}", path.display());
        }
        return Ok(());
    }
    let bytes = fs::read(path)?;
    let report = report_for_bytes(&bytes, args);
    print_report(path.display().to_string(), &report, args, &bytes)?;
    Ok(())
}

fn inspect_dir(
    dir: &Path,
    args: &Args,
    exts: &std::collections::HashSet<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let walker = if args.recursive {
        WalkDir::new(dir).into_iter()
    } else {
        WalkDir::new(dir).max_depth(1).into_iter()
    };

    let mut total = 0u64;
    let mut with_metadata = 0u64;

    for entry in walker.filter_entry(|e| !e.path().starts_with(".")) {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !wanted(path, args, exts) {
            continue;
        }
        total += 1;
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(_) => continue,
        };
        let report = report_for_bytes(&bytes, args);
        if !report.contains_key(LABEL_ERROR) {
            with_metadata += 1;
        }
        print_report(path.display().to_string(), &report, args, &bytes)?;
    }

    if !args.quiet {
        eprintln!("Inspected {} files, {} with metadata", total, with_metadata);
    }
    Ok(())
}

/// Route bytes by sniffed type. JSON output gets plain styles so values stay
/// machine-readable; human output gets ANSI unless --no-color.
fn report_for_bytes(bytes: &[u8], args: &Args) -> MetadataReport {
    let styles = if args.json || args.no_color {
        StyleConfig::plain()
    } else {
        StyleConfig::ansi()
    };
    match detect_file_type(bytes) {
        FileType::Png => {
            let chunks = png_text_chunks(bytes).unwrap_or_default();
            inspect_chunks(&chunks, &styles)
        }
        FileType::Jpeg => inspect_jpeg(bytes, &styles),
        FileType::Unknown => inspect_chunks(&IndexMap::new(), &styles),
    }
}

/// Collect tEXt/zTXt/iTXt chunk keys and values from a PNG stream.
fn png_text_chunks(bytes: &[u8]) -> Option<IndexMap<String, String>> {
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let mut reader = decoder.read_info().ok()?;
    // Pull chunks placed after the image data too.
    let _ = reader.finish();

    let info = reader.info();
    let mut chunks = IndexMap::new();
    for t in &info.uncompressed_latin1_text {
        chunks.insert(t.keyword.clone(), t.text.clone());
    }
    for t in &info.compressed_latin1_text {
        if let Ok(text) = t.get_text() {
            chunks.insert(t.keyword.clone(), text);
        }
    }
    for t in &info.utf8_text {
        if let Ok(text) = t.get_text() {
            chunks.insert(t.keyword.clone(), text);
        }
    }
    Some(chunks)
}

fn print_report(
    path: String,
    report: &MetadataReport,
    args: &Args,
    bytes: &[u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let no_metadata = report.contains_key(LABEL_ERROR);
    if args.quiet && no_metadata {
        return Ok(());
    }

    if args.json {
        let sha256 = sha256_hex(bytes);
        let mut out = IndexMap::<String, serde_json::Value>::new();
        out.insert("sha256".to_string(), serde_json::Value::String(sha256));
        out.insert("path".to_string(), serde_json::Value::String(path));
        out.insert(
            "format".to_string(),
            serde_json::Value::String(detect_file_type(bytes).label().to_string()),
        );
        out.insert(
            "size_bytes".to_string(),
            serde_json::to_value(bytes.len())?,
        );
        out.insert("metadata".to_string(), serde_json::to_value(report)?);
        let json_str = if args.pretty {
            serde_json::to_string_pretty(&out)?
        } else {
            serde_json::to_string(&out)?
        };
        println!("{}", json_str);
        return Ok(());
    }

    let styles = if args.no_color {
        StyleConfig::plain()
    } else {
        StyleConfig::ansi()
    };
    println!("{} ({} bytes, {})", path, bytes.len(), detect_file_type(bytes).label());
    if !args.quiet {
        println!("  sha256: {}", sha256_hex(bytes));
    }
    for (label, value) in report {
        if value.contains('\n') {
            println!("  {}{}{}:", styles.header, label, styles.reset);
            for line in value.lines() {
                println!("    {}", line);
            }
        } else {
            println!("  {}{}{}: {}", styles.header, label, styles.reset, value);
        }
    }
    Ok(())
}
