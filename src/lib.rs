use anyhow::{Context, Result};
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

mod config;
mod delete;
mod errors;
mod output;
mod parser;
mod resolver;
mod scanner;
mod usage;

pub use config::{Cli, ScanConfig};
pub use delete::{
    Confirm, DeletionFailure, DeletionFlow, DeletionOutcome, DeletionReport, DeletionState,
    LineConfirm, copy_file, delete_files, is_affirmative,
};
pub use errors::ScanError;
pub use output::{
    ConsoleProgress, NoProgress, ProgressSink, bytes_to_megabytes, print_deletion_report,
    print_human_report, relative_display, write_deletion_report, write_human_report,
};
pub use parser::{ExtractOptions, extract_references, extract_references_with, strip_comments};
pub use resolver::{is_excluded, resolve_unused};
pub use scanner::{CollectOptions, collect_files, has_allowed_extension};
pub use usage::{MatchMode, UsedAssets, resolve_lexically};

pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[".js", ".jsx", ".tsx"];
pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".json"];
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &["adaptive-icon.png", "icon.png", "splash.png"];

const FIRST_DELETE_PROMPT: &str = "Do you want to delete the original files? (Y/N) ";
const SECOND_DELETE_PROMPT: &str = "Are you sure you want to delete the original files? (Y/N) ";

static IMPORT_FROM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"import\s+.*?\s+from\s+['"](.*?)['"]"#).unwrap());
static REQUIRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"require\s*\(['"](.*?)['"]\)"#).unwrap());
// Either quote style, but the literal must open and close with the same one.
static INLINE_ASSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"'((?:\\.|[^'\\\n])*\.(?:png|jpg|jpeg|gif))'|"((?:\\.|[^"\\\n])*\.(?:png|jpg|jpeg|gif))""#,
    )
    .unwrap()
});

#[derive(Debug, Serialize)]
pub struct Report {
    pub root: PathBuf,
    pub match_mode: MatchMode,
    pub summary: ReportSummary,
    pub unused_assets: Vec<String>,
    #[serde(skip)]
    pub unused_asset_paths: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub total_source_files: usize,
    pub skipped_source_files: usize,
    pub total_asset_files: usize,
    pub used_identifiers: usize,
    pub unused_assets_count: usize,
    pub unused_size_bytes: u64,
    pub unused_size_mb: f64,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.show_folder_names);

    let config = ScanConfig::from_cli(&cli);
    let mut progress: Box<dyn ProgressSink> = if cli.json || cli.no_progress {
        Box::new(NoProgress)
    } else {
        Box::new(ConsoleProgress::stdout())
    };

    if !cli.json {
        println!("Project Directory: {}", config.root.display());
        println!("Scanning project files...");
    }
    let report = scan_project(&config, progress.as_mut())?;

    if cli.json {
        let encoded =
            serde_json::to_string_pretty(&report).context("Failed to encode report as JSON")?;
        println!("{encoded}");
        return Ok(());
    }

    print_human_report(&report)?;
    if report.unused_asset_paths.is_empty() {
        return Ok(());
    }

    let mut flow = DeletionFlow::new();
    if let Some(backup_dir) = &config.backup_dir {
        flow = flow.with_backup(backup_dir, &report.root);
    }

    let mut confirm = LineConfirm::new();
    match flow.run(&mut confirm, &report.unused_asset_paths)? {
        DeletionOutcome::Cancelled => println!("Deletion cancelled. No files were removed."),
        DeletionOutcome::Done(deletion) => print_deletion_report(&report.root, &deletion)?,
    }

    Ok(())
}

/// Scans `<root>/<src_dir>` for references and `<root>/<assets_dir>` for assets, and
/// returns the assets nothing appears to reference.
///
/// The report is fully computed before this returns; nothing on disk is modified.
pub fn scan_project(
    config: &ScanConfig,
    progress: &mut dyn ProgressSink,
) -> std::result::Result<Report, ScanError> {
    let root = fs::canonicalize(&config.root).map_err(|source| ScanError::ProjectRoot {
        path: config.root.clone(),
        source,
    })?;

    let collect = CollectOptions {
        show_folder_names: config.show_folder_names,
    };
    let source_files = collect_files(
        &root.join(&config.src_dir),
        &config.source_extensions,
        collect,
    )?;
    let asset_files = collect_files(
        &root.join(&config.assets_dir),
        &config.asset_extensions,
        collect,
    )?;
    info!(
        sources = source_files.len(),
        assets = asset_files.len(),
        "collected project files"
    );

    let extract = ExtractOptions {
        strip_comments: config.strip_comments,
    };
    let mut used = UsedAssets::new(config.match_mode);
    let mut skipped_source_files = 0usize;
    let total = source_files.len();

    for (index, file) in source_files.iter().enumerate() {
        match read_source(file) {
            Ok(source) => {
                let references = extract_references_with(&source, file, extract);
                debug!(
                    file = %file.display(),
                    references = references.len(),
                    "extracted references"
                );
                used.record(file, &references);
            }
            Err(err) if config.skip_unreadable => {
                warn!("Skipping unreadable source file: {err}");
                skipped_source_files += 1;
            }
            Err(err) => return Err(err),
        }
        progress.file_processed(index + 1, total);
    }
    progress.finish();

    let unused_asset_paths = resolve_unused(&asset_files, &used, &config.exclusions);
    let unused_size_bytes: u64 = unused_asset_paths.iter().map(|path| file_size(path)).sum();

    Ok(Report {
        match_mode: used.mode(),
        summary: ReportSummary {
            total_source_files: total,
            skipped_source_files,
            total_asset_files: asset_files.len(),
            used_identifiers: used.len(),
            unused_assets_count: unused_asset_paths.len(),
            unused_size_bytes,
            unused_size_mb: bytes_to_megabytes(unused_size_bytes),
        },
        unused_assets: unused_asset_paths
            .iter()
            .map(|path| relative_display(&root, path))
            .collect(),
        unused_asset_paths,
        root,
    })
}

fn read_source(path: &Path) -> std::result::Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|source| ScanError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_size(path: &Path) -> u64 {
    match fs::symlink_metadata(path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            warn!("Could not stat {}: {err}", path.display());
            0
        }
    }
}

fn init_tracing(verbose: bool, show_folder_names: bool) {
    let fallback = if verbose {
        "debug"
    } else if show_folder_names {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .init();
}
