use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".bills_core";
const GROUPS_DIR: &str = "groups";
const HISTORY_DIR: &str = "history";

/// Returns the application-specific data directory, defaulting to `~/.bills_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BILLS_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding one JSON file per plan group, under `base`.
pub fn groups_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(GROUPS_DIR)
}

/// Directory holding append-only history snapshots, under `base`.
pub fn history_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(HISTORY_DIR)
}
