use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediPort";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that overrides the portal API base URL.
pub const API_URL_ENV: &str = "MEDIPORT_API_URL";

/// Fixed remote host used when no override is supplied.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mediport.health";

/// Portal API base URL: `MEDIPORT_API_URL` when set, fixed default otherwise.
/// Trailing slashes are stripped so path joining stays uniform.
pub fn api_base_url() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Get the application data directory
/// ~/MediPort/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MediPort")
}

/// Path of the persisted session token. One token value, key-named
/// for this application only.
pub fn session_token_path() -> PathBuf {
    app_data_dir().join("session.token")
}

/// Get the exports directory (generated treatment PDFs)
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,mediport=debug"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("MediPort"));
    }

    #[test]
    fn session_token_under_app_data() {
        let path = session_token_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("session.token"));
    }

    #[test]
    fn exports_dir_under_app_data() {
        let exports = exports_dir();
        assert!(exports.starts_with(app_data_dir()));
        assert!(exports.ends_with("exports"));
    }

    #[test]
    fn default_base_url_has_no_trailing_slash() {
        assert!(!DEFAULT_API_BASE_URL.ends_with('/'));
    }

    #[test]
    fn app_name_is_mediport() {
        assert_eq!(APP_NAME, "MediPort");
    }
}
