use super::*;

#[derive(Parser, Debug)]
#[command(name = "assetsweep")]
#[command(version)]
#[command(
    about = "Find image and animation assets that nothing in a JS project's source tree references"
)]
pub struct Cli {
    /// Project root; expects source files and assets in subdirectories beneath it
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Source directory, relative to the project root
    #[arg(long, default_value = "src")]
    pub src_dir: PathBuf,

    /// Assets directory, relative to the project root
    #[arg(long, default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Source file extensions (repeatable or comma-separated), e.g. --source-ext .js,.tsx
    #[arg(long = "source-ext", value_delimiter = ',')]
    pub source_extensions: Vec<String>,

    /// Asset file extensions (repeatable or comma-separated)
    #[arg(long = "asset-ext", value_delimiter = ',')]
    pub asset_extensions: Vec<String>,

    /// File names that are never reported or deleted, wherever they live
    #[arg(long = "exclude", value_delimiter = ',')]
    pub exclusions: Vec<String>,

    /// How references are compared against asset files
    #[arg(long = "match", value_enum, default_value_t = MatchMode::Path)]
    pub match_mode: MatchMode,

    /// Log every folder visited while collecting files
    #[arg(long)]
    pub show_folder_names: bool,

    /// Ignore references that only appear inside comments
    #[arg(long)]
    pub strip_comments: bool,

    /// Log and skip unreadable source files instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Copy each unused asset here (keeping its project-relative path) before deleting it
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Emit JSON output; never prompts or deletes
    #[arg(long)]
    pub json: bool,

    /// Do not print the per-file progress line
    #[arg(long)]
    pub no_progress: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything a scan needs, independent of how it was obtained.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub src_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub source_extensions: Vec<String>,
    pub asset_extensions: Vec<String>,
    pub exclusions: Vec<String>,
    pub match_mode: MatchMode,
    pub show_folder_names: bool,
    pub strip_comments: bool,
    pub skip_unreadable: bool,
    pub backup_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            src_dir: PathBuf::from("src"),
            assets_dir: PathBuf::from("assets"),
            source_extensions: to_owned_list(DEFAULT_SOURCE_EXTENSIONS),
            asset_extensions: to_owned_list(DEFAULT_ASSET_EXTENSIONS),
            exclusions: to_owned_list(DEFAULT_EXCLUDED_FILES),
            match_mode: MatchMode::default(),
            show_folder_names: false,
            strip_comments: false,
            skip_unreadable: false,
            backup_dir: None,
        }
    }
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();

        Self {
            root: cli.root.clone(),
            src_dir: cli.src_dir.clone(),
            assets_dir: cli.assets_dir.clone(),
            source_extensions: extensions_or(&cli.source_extensions, defaults.source_extensions),
            asset_extensions: extensions_or(&cli.asset_extensions, defaults.asset_extensions),
            exclusions: if cli.exclusions.is_empty() {
                defaults.exclusions
            } else {
                cli.exclusions
                    .iter()
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            },
            match_mode: cli.match_mode,
            show_folder_names: cli.show_folder_names,
            strip_comments: cli.strip_comments,
            skip_unreadable: cli.skip_unreadable,
            backup_dir: cli.backup_dir.clone(),
        }
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn extensions_or(raw: &[String], fallback: Vec<String>) -> Vec<String> {
    let normalized: Vec<String> = raw
        .iter()
        .map(|v| normalize_extension(v))
        .filter(|v| v.len() > 1)
        .collect();

    if normalized.is_empty() {
        fallback
    } else {
        normalized
    }
}

fn normalize_extension(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with('.') {
        trimmed.to_string()
    } else {
        format!(".{trimmed}")
    }
}
