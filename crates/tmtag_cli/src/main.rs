//! Command-line front end for tag documents.
//!
//! # Responsibility
//! - Read a tag JSON file and write its PDF under the derived file name.
//! - Print aggregated totals or the raw layout for inspection.
//!
//! # Invariants
//! - File logging only starts when `TMTAG_LOG_DIR` is set.
//! - A failed generation never leaves a partial output file.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tmtag_core::{
    default_log_level, format_two_places, init_logging, DocumentService, LayoutConfig, TmTag,
};

const LOG_LEVEL_ENV: &str = "TMTAG_LOG_LEVEL";
const LOG_DIR_ENV: &str = "TMTAG_LOG_DIR";

#[derive(Parser, Debug)]
#[command(
    name = "tmtag",
    version,
    about = "Time-and-material tag totals and PDF generation",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the tag PDF.
    Generate(GenerateArgs),
    /// Print category and grand totals.
    Totals(TagArgs),
    /// Print the laid-out draw instructions.
    Layout(LayoutArgs),
}

#[derive(Args, Debug)]
struct TagArgs {
    /// Tag JSON file.
    #[arg(value_name = "TAG")]
    tag: PathBuf,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    input: TagArgs,

    /// Partial layout configuration JSON.
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Directory the PDF is written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    input: TagArgs,

    /// Partial layout configuration JSON.
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging_from_env()?;
    let cli = Cli::parse();
    let output = match &cli.command {
        Commands::Generate(args) => run_generate(args, cli.json)?,
        Commands::Totals(args) => run_totals(args, cli.json)?,
        Commands::Layout(args) => run_layout(args)?,
    };
    println!("{output}");
    Ok(())
}

fn init_logging_from_env() -> Result<()> {
    let Ok(dir) = std::env::var(LOG_DIR_ENV) else {
        return Ok(());
    };
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
    init_logging(&level, &dir).with_context(|| format!("invalid {LOG_DIR_ENV}/{LOG_LEVEL_ENV}"))
}

fn read_tag(path: &Path) -> Result<TmTag> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read tag file `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid tag JSON in `{}`", path.display()))
}

fn read_layout(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid layout JSON in `{}`", path.display()))
}

fn run_generate(args: &GenerateArgs, json_output: bool) -> Result<String> {
    let tag = read_tag(&args.input.tag)?;
    let service = DocumentService::pdf(read_layout(args.layout.as_deref())?);
    let document = service
        .generate(&tag, Utc::now())
        .context("document generation failed")?;

    if !args.out_dir.is_dir() {
        bail!("output directory `{}` does not exist", args.out_dir.display());
    }
    let path = args.out_dir.join(&document.file_name);
    fs::write(&path, &document.bytes)
        .with_context(|| format!("failed to write `{}`", path.display()))?;

    if json_output {
        return Ok(json!({
            "path": path.display().to_string(),
            "file_name": document.file_name,
            "pages": document.page_count,
            "bytes": document.bytes.len(),
        })
        .to_string());
    }
    Ok(format!(
        "wrote {} ({} page(s), {} bytes)",
        path.display(),
        document.page_count,
        document.bytes.len()
    ))
}

fn run_totals(args: &TagArgs, json_output: bool) -> Result<String> {
    let tag = read_tag(&args.tag)?;
    let totals = tag.category_totals();

    if json_output {
        return Ok(json!({
            "labor_hours": format_two_places(totals.labor),
            "materials": format_two_places(totals.materials),
            "equipment": format_two_places(totals.equipment),
            "other": format_two_places(totals.other),
            "grand_total": format_two_places(tag.grand_total()),
        })
        .to_string());
    }
    Ok([
        format!("Labor hours: {}", format_two_places(totals.labor)),
        format!("Materials:   {}", format_two_places(totals.materials)),
        format!("Equipment:   {}", format_two_places(totals.equipment)),
        format!("Other:       {}", format_two_places(totals.other)),
        format!("Grand total: {}", format_two_places(tag.grand_total())),
    ]
    .join("\n"))
}

fn run_layout(args: &LayoutArgs) -> Result<String> {
    let tag = read_tag(&args.input.tag)?;
    let service = DocumentService::pdf(read_layout(args.layout.as_deref())?);
    let document = service
        .assemble(&tag)
        .context("layout failed")?;
    let rendered = serde_json::to_string_pretty(&json!({
        "pages": document.page_count,
        "sections": document.sections,
        "instructions": document.instructions,
    }))?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::{
        run_generate, run_layout, run_totals, Cli, Commands, GenerateArgs, LayoutArgs, TagArgs,
    };
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;

    const TAG_JSON: &str = r#"{
        "dateOfWork": "03/02/2026",
        "laborEntries": [{ "name": "J. Garcia", "stHours": 8 }],
        "materialEntries": [{ "name": "Wire", "quantity": 2, "unitCost": 5 }]
    }"#;

    fn write_tag(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("tag.json");
        fs::write(&path, TAG_JSON).unwrap();
        path
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "tmtag", "generate", "tag.json", "--out-dir", "/tmp/out", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.input.tag, PathBuf::from("tag.json"));
                assert_eq!(args.out_dir, PathBuf::from("/tmp/out"));
                assert!(args.layout.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn generate_writes_dated_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenerateArgs {
            input: TagArgs {
                tag: write_tag(dir.path()),
            },
            layout: None,
            out_dir: dir.path().to_path_buf(),
        };
        let message = run_generate(&args, false).unwrap();
        let pdf = dir.path().join("TM_Tag_20260302.pdf");
        assert!(message.contains("TM_Tag_20260302.pdf"));
        assert!(fs::read(pdf).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn generate_rejects_missing_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = GenerateArgs {
            input: TagArgs {
                tag: write_tag(dir.path()),
            },
            layout: None,
            out_dir: dir.path().join("missing"),
        };
        assert!(run_generate(&args, false).is_err());
    }

    #[test]
    fn totals_include_labor_hours_in_grand_total() {
        let dir = tempfile::tempdir().unwrap();
        let args = TagArgs {
            tag: write_tag(dir.path()),
        };
        let output = run_totals(&args, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["labor_hours"], "8.00");
        assert_eq!(value["materials"], "10.00");
        assert_eq!(value["grand_total"], "18.00");
    }

    #[test]
    fn layout_lists_sections() {
        let dir = tempfile::tempdir().unwrap();
        let args = LayoutArgs {
            input: TagArgs {
                tag: write_tag(dir.path()),
            },
            layout: None,
        };
        let output = run_layout(&args).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["pages"], 1);
        assert_eq!(value["sections"][0]["kind"], "header");
        assert_eq!(value["sections"][1]["category"], "labor");
    }
}
