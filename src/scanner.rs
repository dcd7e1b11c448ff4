use super::*;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Log each folder as it is entered.
    pub show_folder_names: bool,
}

/// Recursively collects every regular file under `directory` whose extension is one of
/// `extensions` (dot-prefixed, case-sensitive).
///
/// Symlinks are neither followed nor reported, so link cycles cannot trap the walk.
/// Entries are visited in file-name order, which keeps repeated runs stable.
pub fn collect_files<S: AsRef<str>>(
    directory: &Path,
    extensions: &[S],
    options: CollectOptions,
) -> std::result::Result<Vec<PathBuf>, ScanError> {
    let meta = fs::metadata(directory).map_err(|source| ScanError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: directory.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ScanError::DirectoryUnreadable {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| directory.to_path_buf()),
            source: io::Error::from(err),
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if options.show_folder_names && entry.depth() > 0 {
                info!("Checking folder: {}", entry.path().display());
            }
            continue;
        }

        if file_type.is_file() && has_allowed_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

pub fn has_allowed_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    extensions
        .iter()
        .any(|allowed| allowed.as_ref().strip_prefix('.') == Some(ext))
}
