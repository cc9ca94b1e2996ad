//! Unified path management for CareNest storage.
//!
//! # Directory Structure
//!
//! ```text
//! <base>/                      # ~/.local/share/carenest by default
//! ├── config.toml              # Application configuration
//! ├── device_storage.json      # Device-local key/value store
//! ├── bookings/                # One JSON file per user
//! │   └── <user-id>.json
//! └── conversations/           # One JSON file per conversation
//!     └── <conversation-id>.json
//! ```

use carenest_core::{CareNestError, Result};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the base directory.
pub const HOME_ENV: &str = "CARENEST_HOME";

const APP_DIR: &str = "carenest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareNestPaths {
    base: PathBuf,
}

impl CareNestPaths {
    /// Uses `base` as the root of all storage.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolves the base directory from `CARENEST_HOME`, falling back to the
    /// platform data directory.
    pub fn default_location() -> Result<Self> {
        if let Some(custom) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(PathBuf::from(custom)));
        }
        dirs::data_dir()
            .map(|dir| Self::new(dir.join(APP_DIR)))
            .ok_or_else(|| CareNestError::config("Cannot find a data directory for this platform"))
    }

    /// `explicit` when given, otherwise `default_location`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_location(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.toml")
    }

    pub fn device_storage_file(&self) -> PathBuf {
        self.base.join("device_storage.json")
    }

    pub fn bookings_dir(&self) -> PathBuf {
        self.base.join("bookings")
    }

    pub fn conversations_dir(&self) -> PathBuf {
        self.base.join("conversations")
    }
}

/// Maps an identifier onto a file stem that is safe on every platform.
///
/// ASCII alphanumerics and `-` pass through; every other byte becomes
/// `_xx` (lowercase hex). Distinct ids always get distinct stems.
pub fn file_stem_for(id: &str) -> String {
    if id.is_empty() {
        return "_".to_string();
    }
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_custom_base() {
        let paths = CareNestPaths::new("/tmp/carenest-test");
        assert_eq!(paths.config_file(), Path::new("/tmp/carenest-test/config.toml"));
        assert_eq!(paths.bookings_dir(), Path::new("/tmp/carenest-test/bookings"));
        assert_eq!(
            paths.device_storage_file(),
            Path::new("/tmp/carenest-test/device_storage.json")
        );
    }

    #[test]
    fn test_explicit_path_wins() {
        let paths = CareNestPaths::resolve(Some(Path::new("/srv/care"))).unwrap();
        assert_eq!(paths.base_dir(), Path::new("/srv/care"));
    }

    #[test]
    fn test_file_stem_sanitizes() {
        assert_eq!(file_stem_for("user-42"), "user-42");
        assert_eq!(file_stem_for("a/b..c"), "a_2fb_2e_2ec");
        assert_eq!(file_stem_for(""), "_");
    }

    #[test]
    fn test_file_stem_keeps_ids_apart() {
        assert_ne!(file_stem_for("alice.b"), file_stem_for("alice_b"));
        assert_ne!(file_stem_for("a_2eb"), file_stem_for("a.b"));
        assert_eq!(file_stem_for("alice_b"), "alice_5fb");
    }
}
