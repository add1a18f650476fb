//! CLI tool that builds the phone safety course deck.

use anyhow::{bail, Context, Result};
use clap::Parser;
use deck_core::{DeckScript, Theme};
use deck_pptx::{PptxParser, PptxWriter};
use std::fs;
use std::path::{Path, PathBuf};

/// Build the phone safety course presentation.
#[derive(Parser, Debug)]
#[command(name = "build-deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output presentation file
    #[arg(short, long, default_value = "Your_First_Phone_Elli.pptx")]
    output: PathBuf,

    /// File name of an earlier build to remove from the output directory
    #[arg(long, default_value = "Your_First_Phone_Ellianna.pptx")]
    legacy_name: String,

    /// Course script to render instead of the bundled course (JSON)
    #[arg(short, long)]
    content: Option<PathBuf>,

    /// Re-read the written file and verify its slide count
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let script = load_script(args.content.as_deref())?;
    let theme = Theme::default();
    let writer = PptxWriter::new()
        .with_application("build-deck")
        .with_font(theme.font.clone());

    let document = script.render(theme);
    log::debug!("Built {} slides", document.slide_count());

    remove_legacy_output(&args.output, &args.legacy_name)?;

    let size = writer
        .save(&document, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if args.check {
        verify_output(&args.output, document.slide_count())?;
    }

    println!("Saved to {}", args.output.display());
    println!("File size: {} bytes ({:.1} KB)", group_thousands(size), size as f64 / 1024.0);
    println!("Total slides: {}", document.slide_count());

    Ok(())
}

/// Load the course script from a file, or the bundled course.
fn load_script(path: Option<&Path>) -> Result<DeckScript> {
    match path {
        Some(path) => {
            log::debug!("Loading course script from {}", path.display());
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            DeckScript::from_json(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
        None => DeckScript::phone_safety_course().context("Bundled course script is invalid"),
    }
}

/// Delete an earlier build stored under its old name next to the output.
fn remove_legacy_output(output: &Path, legacy_name: &str) -> Result<()> {
    let legacy = output.with_file_name(legacy_name);
    if legacy == output || !legacy.exists() {
        return Ok(());
    }

    fs::remove_file(&legacy)
        .with_context(|| format!("Failed to remove {}", legacy.display()))?;
    log::info!("Removed old build {}", legacy.display());
    Ok(())
}

/// Re-open the written package and compare its slide count.
fn verify_output(path: &Path, expected_slides: usize) -> Result<()> {
    let deck = PptxParser::new()
        .open(path)
        .with_context(|| format!("Failed to re-read {}", path.display()))?;

    if deck.slide_count() != expected_slides {
        bail!(
            "{} has {} slides, expected {}",
            path.display(),
            deck.slide_count(),
            expected_slides
        );
    }
    log::debug!("Verified {} slides in {}", expected_slides, path.display());
    Ok(())
}

/// Format an integer with `,` between groups of three digits.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(123456), "123,456");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["build-deck"]);
        assert_eq!(args.output, PathBuf::from("Your_First_Phone_Elli.pptx"));
        assert_eq!(args.legacy_name, "Your_First_Phone_Ellianna.pptx");
        assert!(args.content.is_none());
        assert!(!args.check);
    }

    #[test]
    fn test_remove_legacy_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("new.pptx");
        let legacy = dir.path().join("old.pptx");
        fs::write(&legacy, b"stale").unwrap();

        remove_legacy_output(&output, "old.pptx").unwrap();
        assert!(!legacy.exists());

        // Absent legacy file is fine.
        remove_legacy_output(&output, "old.pptx").unwrap();
    }

    #[test]
    fn test_legacy_name_equal_to_output_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("same.pptx");
        fs::write(&output, b"current").unwrap();

        remove_legacy_output(&output, "same.pptx").unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_load_script_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        fs::write(
            &path,
            r#"{ "title": "Mini", "slides": [{ "kind": "discussion", "question": "?" }] }"#,
        )
        .unwrap();

        let script = load_script(Some(&path)).unwrap();
        assert_eq!(script.title, "Mini");
        assert_eq!(script.slides.len(), 1);

        assert!(load_script(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_verify_output_counts_slides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mini.pptx");
        let script = DeckScript::from_json(
            r#"{ "title": "Mini", "slides": [
                { "kind": "discussion", "question": "one" },
                { "kind": "content", "title": "two" }
            ] }"#,
        )
        .unwrap();
        PptxWriter::new()
            .save(&script.render(Theme::default()), &path)
            .unwrap();

        verify_output(&path, 2).unwrap();
        assert!(verify_output(&path, 3).is_err());
    }
}
