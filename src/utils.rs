use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "memopad-dev",
            Profile::Prod => "memopad",
        }
    }
}

/// Get the configuration directory path for the application.
/// If profile is Dev, uses "memopad-dev" instead of "memopad".
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "memopad", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for the application.
/// If profile is Dev, uses "memopad-dev" instead of "memopad".
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "memopad", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Current UTC time as an RFC 3339 string with microsecond precision.
/// The fixed width keeps lexicographic order equal to chronological order,
/// which the memo listing relies on.
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_path_leaves_absolute_paths_alone() {
        assert_eq!(expand_path("/tmp/memos.db"), PathBuf::from("/tmp/memos.db"));
    }

    #[test]
    fn expand_path_resolves_home_prefix() {
        let expanded = expand_path("~/memos.db");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("memos.db"));
    }

    #[test]
    fn timestamps_sort_lexicographically() {
        let a = current_timestamp();
        let b = current_timestamp();
        assert!(a <= b);
    }
}
