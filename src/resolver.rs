use super::*;

/// Asset files absent from `used` whose file name is not in `exclusions`, in the order
/// they were collected.
pub fn resolve_unused<S: AsRef<str>>(
    all_assets: &[PathBuf],
    used: &UsedAssets,
    exclusions: &[S],
) -> Vec<PathBuf> {
    all_assets
        .iter()
        .filter(|asset| !used.contains(asset))
        .filter(|asset| !is_excluded(asset, exclusions))
        .cloned()
        .collect()
}

/// Exclusions match on the base file name only, whatever directory the asset is in.
pub fn is_excluded<S: AsRef<str>>(path: &Path, exclusions: &[S]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| exclusions.iter().any(|excluded| excluded.as_ref() == name))
}
