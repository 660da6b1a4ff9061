use std::path::PathBuf;

pub const ROOT_DIR: &str = ".bugdeck";

/// Returns the root bugdeck directory path.
///
/// Resolution order:
/// 1. `BUGDECK_ROOT` environment variable (if set)
/// 2. Current working directory + `.bugdeck`
pub fn bugdeck_root() -> PathBuf {
    if let Ok(root) = std::env::var("BUGDECK_ROOT") {
        PathBuf::from(root)
    } else {
        PathBuf::from(ROOT_DIR)
    }
}

/// Returns the directory holding persisted grid state (filters, columns).
pub fn state_dir() -> PathBuf {
    bugdeck_root().join("state")
}
