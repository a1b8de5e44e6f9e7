use std::path::PathBuf;

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Directory holding the per-image detection result files.
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from `MIEN_*` environment variables with defaults.
    ///
    /// `MIEN_DATA_DIR` overrides the conventional `results` directory
    /// under the current working directory.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("MIEN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("results"));

        Self { data_dir }
    }
}
