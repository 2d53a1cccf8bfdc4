//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;

/// Per-user data directory holding settings.json and logs/
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn get_logs_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_is_app_scoped() {
        assert!(get_data_dir().ends_with(APP_NAME));
        assert_eq!(get_logs_dir(&get_data_dir()), get_data_dir().join("logs"));
    }
}
