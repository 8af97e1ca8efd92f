// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Loading configuration documents from disk.

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::switch_config::SwitchConfig;

/// Errors which can occur while loading a configuration document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a configuration document from JSON text.
pub fn from_json(text: &str) -> Result<SwitchConfig, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a configuration document, returning it together with the
/// raw text it was parsed from.
pub fn load_file(path: impl AsRef<Path>) -> Result<(SwitchConfig, String), LoadError> {
    let path = path.as_ref();
    debug!("Loading switch config from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let config = from_json(&text)?;
    Ok((config, text))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_json_accepts_empty_document() {
        let cfg = from_json("{}").unwrap();
        assert_eq!(cfg, SwitchConfig::default());
    }

    #[test]
    fn from_json_rejects_malformed_text() {
        assert!(matches!(from_json("{"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn load_file_returns_config_and_raw_text() {
        let path = std::env::temp_dir().join("switch-config-loader-test.json");
        let text = r#"{"default_vlan": 5}"#;
        std::fs::write(&path, text).unwrap();
        let (cfg, raw) = load_file(&path).unwrap();
        assert_eq!(cfg.default_vlan, 5);
        assert_eq!(raw, text);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_file_reports_missing_file() {
        let missing = std::env::temp_dir().join("no-such-switch-config.json");
        assert!(matches!(load_file(&missing), Err(LoadError::Io(_))));
    }
}
