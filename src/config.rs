use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_INPUT_FILE: &str = "dataset_annonces.csv.tar.gz";
pub const DEFAULT_CHUNK_SIZE: usize = 50_000;
pub const DEFAULT_BATCH_SIZE: usize = 5_000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./listings.sqlite?mode=rwc";
pub const DEFAULT_BIENICI_API_URL: &str = "https://www.bienici.com/realEstateAd.json";

/// How raw amenity flags (ELEVATOR, GARDEN, ...) are turned into tri-state booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanMode {
    /// Any present value counts as `true`, including the text "False".
    /// Matches how the reference dataset has always been loaded.
    #[default]
    Legacy,
    /// Recognised true/false spellings map to `Some(bool)`, anything else to `None`.
    Strict,
}

impl FromStr for BooleanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(BooleanMode::Legacy),
            "strict" => Ok(BooleanMode::Strict),
            other => Err(format!("unknown boolean mode '{}' (expected legacy or strict)", other)),
        }
    }
}

impl fmt::Display for BooleanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanMode::Legacy => write!(f, "legacy"),
            BooleanMode::Strict => write!(f, "strict"),
        }
    }
}

/// Settings for one import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// CSV file or archive (.tar.gz, .tgz, .zip) holding one.
    pub file: PathBuf,
    /// Records read into memory at once.
    pub chunk_size: usize,
    /// Records written per insert transaction.
    pub batch_size: usize,
    pub boolean_mode: BooleanMode,
    /// Where archive entries are extracted; defaults to the archive's directory.
    pub work_dir: Option<PathBuf>,
    /// Hide the progress bar.
    pub quiet: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_INPUT_FILE),
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            boolean_mode: BooleanMode::default(),
            work_dir: None,
            quiet: false,
        }
    }
}

impl ImportConfig {
    /// Defaults overridden by `IMPORT_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(size) = env_parse::<usize>("IMPORT_CHUNK_SIZE") {
            config.chunk_size = size;
        }
        if let Some(size) = env_parse::<usize>("IMPORT_BATCH_SIZE") {
            config.batch_size = size;
        }
        if let Some(mode) = env_parse::<BooleanMode>("IMPORT_BOOLEAN_MODE") {
            config.boolean_mode = mode;
        }
        if let Ok(dir) = env::var("IMPORT_WORK_DIR") {
            if !dir.is_empty() {
                config.work_dir = Some(PathBuf::from(dir));
            }
        }

        config.normalized()
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self.normalized()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self.normalized()
    }

    pub fn with_boolean_mode(mut self, mode: BooleanMode) -> Self {
        self.boolean_mode = mode;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    // Zero sizes would never make progress.
    fn normalized(mut self) -> Self {
        if self.chunk_size == 0 {
            warn!("chunk size 0 is invalid; using {}", DEFAULT_CHUNK_SIZE);
            self.chunk_size = DEFAULT_CHUNK_SIZE;
        }
        if self.batch_size == 0 {
            warn!("batch size 0 is invalid; using {}", DEFAULT_BATCH_SIZE);
            self.batch_size = DEFAULT_BATCH_SIZE;
        }
        self
    }
}

/// `DATABASE_URL`, or a local SQLite file when unset.
pub fn database_url() -> String {
    env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

pub fn bienici_api_url() -> String {
    env::var("BIENICI_API_URL")
        .ok()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BIENICI_API_URL.to_string())
}

fn env_parse<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_dataset_settings() {
        let config = ImportConfig::default();
        assert_eq!(config.file, PathBuf::from("dataset_annonces.csv.tar.gz"));
        assert_eq!(config.chunk_size, 50_000);
        assert_eq!(config.batch_size, 5_000);
        assert_eq!(config.boolean_mode, BooleanMode::Legacy);
    }

    #[test]
    fn zero_sizes_are_replaced() {
        let config = ImportConfig::default().with_chunk_size(0).with_batch_size(0);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn boolean_mode_parses() {
        assert_eq!("STRICT".parse::<BooleanMode>(), Ok(BooleanMode::Strict));
        assert_eq!("legacy".parse::<BooleanMode>(), Ok(BooleanMode::Legacy));
        assert!("fuzzy".parse::<BooleanMode>().is_err());
    }
}
