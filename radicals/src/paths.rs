use std::path::PathBuf;

use crate::constants::{DEFAULT_RAW_FILE, DEFAULT_SNAPSHOT_FILE};

/// Overrides the raw composition table location.
pub const RAW_PATH_ENV: &str = "RADICALS_JSON";
/// Overrides the snapshot location.
pub const SNAPSHOT_PATH_ENV: &str = "RADICALS_SNAPSHOT";

fn from_env_or(var: &str, fallback: &str) -> PathBuf {
    match std::env::var_os(var) {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => PathBuf::from(fallback),
    }
}

/// Location of the raw composition table, `$RADICALS_JSON` or `rads.json`.
pub fn raw_table_path() -> PathBuf {
    from_env_or(RAW_PATH_ENV, DEFAULT_RAW_FILE)
}

/// Location of the graph snapshot, `$RADICALS_SNAPSHOT` or `radicals.snapshot`.
pub fn snapshot_path() -> PathBuf {
    from_env_or(SNAPSHOT_PATH_ENV, DEFAULT_SNAPSHOT_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_when_unset() {
        let path = from_env_or("RADICALS_TEST_SURELY_UNSET_VARIABLE", "fallback.json");
        assert_eq!(path, PathBuf::from("fallback.json"));
    }
}
