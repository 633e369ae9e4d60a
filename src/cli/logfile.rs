//! Numbered log files: `semantic_search_log/search_<N>.log`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_DIR: &str = "semantic_search_log";

const PREFIX: &str = "search_";
const SUFFIX: &str = ".log";

/// Next free `search_<N>.log` in `dir`: one past the highest existing number, or 1.
///
/// Creates `dir` if needed. Names that do not parse as `search_<N>.log` are ignored.
pub fn next_log_filename(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let mut max_num = 0u64;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        if let Some(num) = name.to_str().and_then(log_number) {
            max_num = max_num.max(num);
        }
    }

    Ok(dir.join(format!("{PREFIX}{}{SUFFIX}", max_num + 1)))
}

/// `next_log_filename` in [`DEFAULT_LOG_DIR`] under the working directory.
pub fn default_log_path() -> io::Result<PathBuf> {
    next_log_filename(Path::new(DEFAULT_LOG_DIR))
}

fn log_number(name: &str) -> Option<u64> {
    name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?.parse().ok()
}
