use super::*;

/// How a reference and an asset file are reduced to a comparison key.
///
/// `Path` compares absolute, lexically resolved paths: `a/logo.png` and `b/logo.png` are
/// different assets, and only references that resolve to the exact file count.
/// `Basename` compares bare file names: any `logo.png` reference keeps every `logo.png`
/// in the tree, trading missed unused assets for fewer wrongly flagged ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Path,
    Basename,
}

/// Used-asset identifiers accumulated across the source tree. Grows while scanning and
/// is only read afterwards.
#[derive(Debug)]
pub struct UsedAssets {
    mode: MatchMode,
    keys: HashSet<String>,
}

impl UsedAssets {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            keys: HashSet::new(),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Folds the references extracted from `source_path` into the set.
    pub fn record(&mut self, source_path: &Path, references: &[String]) {
        let base_dir = source_path.parent().unwrap_or(Path::new(""));

        for reference in references {
            let key = match self.mode {
                MatchMode::Path => Some(
                    resolve_lexically(base_dir, reference)
                        .to_string_lossy()
                        .into_owned(),
                ),
                MatchMode::Basename => basename(reference).map(str::to_string),
            };
            if let Some(key) = key {
                self.keys.insert(key);
            }
        }
    }

    /// Comparison key for an asset file on disk.
    pub fn key_for(&self, asset: &Path) -> Option<String> {
        match self.mode {
            MatchMode::Path => Some(
                resolve_lexically(Path::new(""), &asset.to_string_lossy())
                    .to_string_lossy()
                    .into_owned(),
            ),
            MatchMode::Basename => asset
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string),
        }
    }

    pub fn contains(&self, asset: &Path) -> bool {
        self.key_for(asset)
            .is_some_and(|key| self.keys.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn basename(reference: &str) -> Option<&str> {
    reference
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Resolves `reference` against `base_dir` into an absolute path, folding `.` and `..`
/// segments without touching the filesystem. An absolute `reference` ignores `base_dir`.
pub fn resolve_lexically(base_dir: &Path, reference: &str) -> PathBuf {
    let joined = base_dir.join(reference);
    let absolute = std::path::absolute(&joined).unwrap_or(joined);

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn resolve_lexically_folds_dot_segments() {
        assert_eq!(
            resolve_lexically(Path::new("/p/src/screens"), "../../assets/./a.png"),
            PathBuf::from("/p/assets/a.png")
        );
        assert_eq!(
            resolve_lexically(Path::new("/p/src"), "/abs/b.png"),
            PathBuf::from("/abs/b.png")
        );
        assert_eq!(
            resolve_lexically(Path::new("/"), "../../c.png"),
            PathBuf::from("/c.png")
        );
    }

    #[test]
    fn path_mode_resolves_every_reference_against_the_source_dir() {
        let mut used = UsedAssets::new(MatchMode::Path);
        used.record(
            Path::new("/p/src/app.js"),
            &refs(&["../assets/logo.png", "react", "/p/assets/bg.jpg"]),
        );

        assert!(used.contains(Path::new("/p/assets/logo.png")));
        assert!(used.contains(Path::new("/p/assets/bg.jpg")));
        assert!(used.contains(Path::new("/p/src/react")));
        assert!(!used.contains(Path::new("/p/other/logo.png")));
        assert_eq!(used.len(), 3);
    }

    #[test]
    fn basename_mode_ignores_directories() {
        let mut used = UsedAssets::new(MatchMode::Basename);
        used.record(
            Path::new("/p/src/app.js"),
            &refs(&["../assets/a/logo.png", "./", "react"]),
        );

        // Same file name elsewhere in the tree counts as used: a deliberate false negative.
        assert!(used.contains(Path::new("/p/assets/b/logo.png")));
        assert!(used.contains(Path::new("/p/assets/a/logo.png")));
        assert!(!used.contains(Path::new("/p/assets/a/other.png")));
        assert_eq!(used.len(), 2);
    }

    #[test]
    fn path_keys_for_assets_are_normalized() {
        let used = UsedAssets::new(MatchMode::Path);
        assert_eq!(
            used.key_for(Path::new("/p/src/../assets/x.png")).as_deref(),
            Some("/p/assets/x.png")
        );
    }
}
