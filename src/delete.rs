use super::*;
use std::io::Stdout;

/// Source of yes/no answers for the deletion gate.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Prompts on an output stream and reads one line per answer. `new()` uses the terminal.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl LineConfirm<io::StdinLock<'static>, Stdout> {
    pub fn new() -> Self {
        Self::with_io(io::stdin().lock(), io::stdout())
    }
}

impl Default for LineConfirm<io::StdinLock<'static>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // EOF answers "no".
            writeln!(self.output)?;
            return Ok(false);
        }
        Ok(is_affirmative(&line))
    }
}

/// Only a lone `y`/`Y` (line ending aside) is a yes.
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(['\r', '\n'])
        .eq_ignore_ascii_case("y")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    AwaitingFirstConfirmation,
    AwaitingSecondConfirmation,
    Deleting,
    Cancelled,
    Done,
}

impl DeletionState {
    /// Next state after an answer; states that are not waiting on a prompt stay put.
    pub fn on_answer(self, affirmative: bool) -> Self {
        match (self, affirmative) {
            (DeletionState::AwaitingFirstConfirmation, true) => {
                DeletionState::AwaitingSecondConfirmation
            }
            (DeletionState::AwaitingSecondConfirmation, true) => DeletionState::Deleting,
            (
                DeletionState::AwaitingFirstConfirmation
                | DeletionState::AwaitingSecondConfirmation,
                false,
            ) => DeletionState::Cancelled,
            (other, _) => other,
        }
    }

    pub fn prompt(self) -> Option<&'static str> {
        match self {
            DeletionState::AwaitingFirstConfirmation => Some(FIRST_DELETE_PROMPT),
            DeletionState::AwaitingSecondConfirmation => Some(SECOND_DELETE_PROMPT),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DeletionState::Cancelled | DeletionState::Done)
    }
}

#[derive(Debug)]
pub enum DeletionOutcome {
    Cancelled,
    Done(DeletionReport),
}

#[derive(Debug, Default)]
pub struct DeletionReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<DeletionFailure>,
}

#[derive(Debug)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug)]
struct BackupTarget {
    dir: PathBuf,
    root: PathBuf,
}

/// Two confirmations, then one pass over the whole list. A "no" at either prompt ends
/// the flow with nothing touched; once deleting starts it runs to the end of the list.
#[derive(Debug)]
pub struct DeletionFlow {
    state: DeletionState,
    backup: Option<BackupTarget>,
}

impl Default for DeletionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl DeletionFlow {
    pub fn new() -> Self {
        Self {
            state: DeletionState::AwaitingFirstConfirmation,
            backup: None,
        }
    }

    /// Copy each file to `dir`, under its path relative to `root`, before removing it.
    pub fn with_backup(mut self, dir: &Path, root: &Path) -> Self {
        self.backup = Some(BackupTarget {
            dir: dir.to_path_buf(),
            root: root.to_path_buf(),
        });
        self
    }

    pub fn state(&self) -> DeletionState {
        self.state
    }

    pub fn run(
        mut self,
        confirm: &mut dyn Confirm,
        unused: &[PathBuf],
    ) -> std::result::Result<DeletionOutcome, ScanError> {
        while let Some(prompt) = self.state.prompt() {
            let answer = confirm.confirm(prompt).map_err(ScanError::Prompt)?;
            self.state = self.state.on_answer(answer);
        }

        match self.state {
            DeletionState::Deleting => {
                let report = match &self.backup {
                    Some(backup) => delete_with_backup(unused, backup),
                    None => delete_files(unused),
                };
                Ok(DeletionOutcome::Done(report))
            }
            _ => {
                info!("Deletion cancelled");
                Ok(DeletionOutcome::Cancelled)
            }
        }
    }
}

/// Removes each file independently; one failure never stops the rest.
pub fn delete_files(paths: &[PathBuf]) -> DeletionReport {
    let mut report = DeletionReport::default();
    for path in paths {
        remove_one(path, &mut report);
    }
    report
}

fn delete_with_backup(paths: &[PathBuf], backup: &BackupTarget) -> DeletionReport {
    let mut report = DeletionReport::default();

    for path in paths {
        let rel = path
            .strip_prefix(&backup.root)
            .ok()
            .map(Path::to_path_buf)
            .or_else(|| path.file_name().map(PathBuf::from))
            .unwrap_or_else(|| path.clone());
        let destination = backup.dir.join(rel);

        if is_same_file(path, &destination) {
            warn!(
                "Backup of {} would overwrite itself; keeping it",
                path.display()
            );
            report.failed.push(DeletionFailure {
                path: path.clone(),
                reason: "backup destination is the file itself".to_string(),
            });
            continue;
        }

        if let Err(err) = copy_file(path, &destination) {
            tracing::error!(
                "Error copying file {} to {}: {err}",
                path.display(),
                destination.display()
            );
            report.failed.push(DeletionFailure {
                path: path.clone(),
                reason: format!("backup copy failed: {err}"),
            });
            continue;
        }

        remove_one(path, &mut report);
    }

    report
}

fn is_same_file(source: &Path, destination: &Path) -> bool {
    if resolve_lexically(Path::new(""), &source.to_string_lossy())
        == resolve_lexically(Path::new(""), &destination.to_string_lossy())
    {
        return true;
    }
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn remove_one(path: &Path, report: &mut DeletionReport) {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Deleted {}", path.display());
            report.deleted.push(path.to_path_buf());
        }
        Err(err) => {
            warn!("Failed to delete {}: {err}", path.display());
            report.failed.push(DeletionFailure {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
        }
    }
}

/// Copies `source` to `destination`, creating missing parent directories.
pub fn copy_file(source: &Path, destination: &Path) -> io::Result<u64> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, destination)
}
