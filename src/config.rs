//! Location of the reference tables on disk.

use std::path::PathBuf;

use serde::Deserialize;

/// Environment variable overriding [`DataConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "ANTHRO_DATA_DIR";

/// Where the three reference tables live.
///
/// # Examples
///
/// ```
/// use anthro_score::DataConfig;
///
/// let config = DataConfig::default();
/// assert!(config.height_path().ends_with("data/height_data.csv"));
/// assert!(config.params_path().ends_with("data/para.csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the tables.
    pub data_dir: PathBuf,
    /// Height quantile table (values in meters).
    pub height_file: String,
    /// Weight quantile table (values in kilograms).
    pub weight_file: String,
    /// Height-adjusted-weight polynomial coefficients.
    pub params_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            height_file: "height_data.csv".into(),
            weight_file: "weight_data.csv".into(),
            params_file: "para.csv".into(),
        }
    }
}

impl DataConfig {
    /// Default layout rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Default layout, with `data_dir` taken from `ANTHRO_DATA_DIR` when set.
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::with_data_dir(dir),
            _ => Self::default(),
        }
    }

    pub fn height_path(&self) -> PathBuf {
        self.data_dir.join(&self.height_file)
    }

    pub fn weight_path(&self) -> PathBuf {
        self.data_dir.join(&self.weight_file)
    }

    pub fn params_path(&self) -> PathBuf {
        self.data_dir.join(&self.params_file)
    }
}
