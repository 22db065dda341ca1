//! JSON persistence for benchmark result records.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::error::RecorderError;
use crate::schema::ResultSet;

/// Directory for auto-named result and comparison files.
pub const OUTPUT_DIR: &str = "output";

/// Writes a result set as pretty-printed JSON.
///
/// With no explicit path the file lands in `output/`, named from the run
/// label and wall-clock time so consecutive runs never collide:
/// `output/mysql_perf_<label>_<timestamp>.json`.
pub fn save_result_set(set: &ResultSet, path: Option<&Path>) -> Result<PathBuf, RecorderError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let safe_label: String = set
                .label
                .chars()
                .map(|c| if c == ' ' || c == '/' { '_' } else { c })
                .collect();
            let stamp = Utc::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(OUTPUT_DIR).join(format!("mysql_perf_{safe_label}_{stamp}.json"))
        }
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(set)?;
    fs::write(&path, json)?;
    info!(path = %path.display(), "results saved");
    Ok(path)
}

/// Loads a previously saved result set.
pub fn load_result_set(path: &Path) -> Result<ResultSet, RecorderError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
