use std::path::PathBuf;

/// Gets the value of an environment variable.
pub fn get_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Returns the user's home directory, read from `HOME` (or `USERPROFILE` on Windows).
pub fn home_dir() -> Option<PathBuf> {
    get_env("HOME").or_else(|| get_env("USERPROFILE")).filter(|h| !h.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_missing() {
        assert_eq!(get_env("WARDEN_TEST_DEFINITELY_UNSET"), None);
    }
}
