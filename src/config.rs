// ── Window configuration ──────────────────────────────────────────────────────
//
// A small JSON description of the window an application opens.  Every field
// is optional in the file; missing ones take the defaults below.
// No `unsafe`, pure safe Rust + serde_json.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::framebuffer::MAX_EXTENT;

/// Environment variable the demo reads a config path from.
pub const CONFIG_ENV: &str = "TWH_CONFIG";

/// Title, client-area size and clear color of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// `0xRRGGBB`.
    pub clear_color: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "twh".to_owned(),
            width: 800,
            height: 600,
            clear_color: 0xff8800,
        }
    }
}

impl WindowConfig {
    /// Parse a JSON document.  Unknown keys are ignored.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Reject sizes no window can have.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 || width > MAX_EXTENT || height > MAX_EXTENT {
            return Err(Error::InvalidSize { width, height });
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = WindowConfig::from_json_str("{}").expect("parse");
        assert_eq!(config, WindowConfig::default());
        assert_eq!(config.title, "twh");
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.clear_color, 0xff8800);
    }

    #[test]
    fn present_fields_override_defaults() {
        let json = r#"{"title":"viewer","width":320,"clear_color":255}"#;
        let config = WindowConfig::from_json_str(json).expect("parse");
        assert_eq!(config.title, "viewer");
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600, "missing height keeps its default");
        assert_eq!(config.clear_color, 0x0000ff);
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = WindowConfig {
            title: "round".to_owned(),
            width: 64,
            height: 48,
            clear_color: 0x123456,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(WindowConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = WindowConfig::from_json_str(r#"{"width":0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidSize { width: 0, height: 600 }));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = WindowConfig::from_json_str(r#"{"width":"wide"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("twh-config-that-does-not-exist.json");
        let err = WindowConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn load_reads_a_file() {
        let path = std::env::temp_dir().join(format!("twh-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"title":"from disk","height":100}"#).expect("write");
        let config = WindowConfig::load(&path);
        let _ = fs::remove_file(&path);
        let config = config.expect("load");
        assert_eq!(config.title, "from disk");
        assert_eq!(config.height, 100);
    }
}
