use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const DEFAULT_LOG_FILE: &str = "logs/easy_rider.log";

/// Environment-driven settings. Call [`dotenvy::dotenv`] first so a local
/// `.env` file is honoured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `LOG_FILE_PATH`: JSON log file, rotated daily.
    pub log_file_path: PathBuf,
    /// `EASY_RIDER_CSV`: where `report` appends tallies when `--csv` is absent.
    pub tally_csv: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Settings {
            log_file_path: lookup("LOG_FILE_PATH")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                .into(),
            tally_csv: lookup("EASY_RIDER_CSV")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// CSV file for the tally: an explicit path wins over `EASY_RIDER_CSV`.
    pub fn tally_target(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.tally_csv.clone())
    }

    pub fn log_dir(&self) -> &Path {
        self.log_file_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("logs"))
    }

    pub fn log_file_name(&self) -> &OsStr {
        self.log_file_path
            .file_name()
            .unwrap_or(OsStr::new("easy_rider.log"))
    }
}
