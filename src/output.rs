use super::*;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::Stdout;

/// Receives one update per processed source file.
pub trait ProgressSink {
    fn file_processed(&mut self, processed: usize, total: usize);

    fn finish(&mut self) {}
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn file_processed(&mut self, _processed: usize, _total: usize) {}
}

/// Rewrites a single status line in place.
pub struct ConsoleProgress<W: Write> {
    out: W,
    drawn: bool,
}

impl ConsoleProgress<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out, drawn: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for ConsoleProgress<W> {
    fn file_processed(&mut self, processed: usize, total: usize) {
        let drawn = queue!(
            self.out,
            Clear(ClearType::CurrentLine),
            MoveToColumn(0),
            Print(format!("Processed {processed} of {total} code files."))
        )
        .and_then(|()| self.out.flush());

        match drawn {
            Ok(()) => self.drawn = true,
            Err(err) => debug!("progress line not drawn: {err}"),
        }
    }

    fn finish(&mut self) {
        if self.drawn {
            if let Err(err) = writeln!(self.out) {
                debug!("progress line not terminated: {err}");
            }
            self.drawn = false;
        }
    }
}

pub fn relative_display(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

pub fn print_human_report(report: &Report) -> io::Result<()> {
    write_human_report(&mut io::stdout().lock(), report)
}

pub fn write_human_report(out: &mut impl Write, report: &Report) -> io::Result<()> {
    writeln!(out, "Root: {}", report.root.display())?;
    writeln!(out, "\nSummary:")?;
    writeln!(
        out,
        "  - Source files scanned: {}",
        report.summary.total_source_files
    )?;
    if report.summary.skipped_source_files > 0 {
        writeln!(
            out,
            "  - Unreadable source files skipped: {}",
            report.summary.skipped_source_files
        )?;
    }
    writeln!(out, "  - Asset files: {}", report.summary.total_asset_files)?;
    writeln!(
        out,
        "  - Distinct references: {}",
        report.summary.used_identifiers
    )?;
    writeln!(out, "  - Match mode: {}", match_mode_label(report.match_mode))?;

    if report.unused_assets.is_empty() {
        writeln!(out, "\nNo unused assets found.")?;
        return Ok(());
    }

    writeln!(out, "\nUnused assets ({}):", report.unused_assets.len())?;
    for path in &report.unused_assets {
        writeln!(out, "  - {path}")?;
    }
    writeln!(
        out,
        "\nTotal size of unused files: {:.2} MB",
        report.summary.unused_size_mb
    )?;

    Ok(())
}

pub fn print_deletion_report(root: &Path, report: &DeletionReport) -> io::Result<()> {
    write_deletion_report(&mut io::stdout().lock(), root, report)
}

pub fn write_deletion_report(
    out: &mut impl Write,
    root: &Path,
    report: &DeletionReport,
) -> io::Result<()> {
    for path in &report.deleted {
        writeln!(out, "Deleted {}", relative_display(root, path))?;
    }
    for failure in &report.failed {
        writeln!(
            out,
            "Failed to delete {}: {}",
            relative_display(root, &failure.path),
            failure.reason
        )?;
    }
    writeln!(
        out,
        "\nDeleted {} of {} files.",
        report.deleted.len(),
        report.deleted.len() + report.failed.len()
    )?;

    Ok(())
}

fn match_mode_label(mode: MatchMode) -> &'static str {
    match mode {
        MatchMode::Path => "resolved path",
        MatchMode::Basename => "file name only",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(unused: &[&str], bytes: u64) -> Report {
        Report {
            root: PathBuf::from("/p"),
            match_mode: MatchMode::Path,
            summary: ReportSummary {
                total_source_files: 3,
                skipped_source_files: 0,
                total_asset_files: 4,
                used_identifiers: 7,
                unused_assets_count: unused.len(),
                unused_size_bytes: bytes,
                unused_size_mb: bytes_to_megabytes(bytes),
            },
            unused_assets: unused.iter().map(|s| s.to_string()).collect(),
            unused_asset_paths: unused.iter().map(|s| Path::new("/p").join(s)).collect(),
        }
    }

    fn render(report: &Report) -> String {
        let mut out = Vec::new();
        write_human_report(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn megabytes_use_binary_units() {
        assert_eq!(bytes_to_megabytes(1024 * 1024), 1.0);
        assert_eq!(bytes_to_megabytes(0), 0.0);
    }

    #[test]
    fn empty_report_says_nothing_is_unused() {
        let text = render(&report(&[], 0));
        assert!(text.contains("No unused assets found."));
        assert!(!text.contains("Total size"));
    }

    #[test]
    fn report_lists_paths_and_total_size() {
        let text = render(&report(&["assets/a.png", "assets/b.gif"], 3 * 1024 * 1024 / 2));
        assert!(text.contains("Unused assets (2):\n  - assets/a.png\n  - assets/b.gif\n"));
        assert!(text.contains("Total size of unused files: 1.50 MB"));
    }

    #[test]
    fn deletion_report_shows_each_outcome() {
        let report = DeletionReport {
            deleted: vec![PathBuf::from("/p/assets/a.png")],
            failed: vec![DeletionFailure {
                path: PathBuf::from("/p/assets/b.png"),
                reason: "Permission denied".to_string(),
            }],
        };
        let mut out = Vec::new();
        write_deletion_report(&mut out, Path::new("/p"), &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Deleted assets/a.png\n"));
        assert!(text.contains("Failed to delete assets/b.png: Permission denied\n"));
        assert!(text.contains("Deleted 1 of 2 files."));
    }

    #[test]
    fn console_progress_rewrites_one_line() {
        let mut progress = ConsoleProgress::new(Vec::new());
        progress.file_processed(1, 2);
        progress.file_processed(2, 2);
        progress.finish();

        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert!(text.contains("Processed 1 of 2 code files."));
        assert!(text.ends_with("Processed 2 of 2 code files.\n"));
    }
}
