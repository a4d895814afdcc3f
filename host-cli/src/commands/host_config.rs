use std::fs;
use std::path::Path;

use serde::Deserialize;
use shared::error::SharedError;
use shared::schema::DeviceState;

use crate::constants::{DEFAULT_ADDRESS, DEFAULT_LABEL, DEFAULT_XPUB};

/// Settings of the simulated wallet the demo talks to.
///
/// Every field is optional in the JSON file; missing fields fall back to an
/// unlocked device without a PIN that exports [`DEFAULT_XPUB`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub label: Option<String>,
    pub xpub: String,
    pub address: String,
    /// Keypad positions the device accepts as its PIN.
    pub pin: Option<String>,
    pub passphrase_protection: bool,
    /// Hex session fingerprint reported after the passphrase was entered.
    pub session_state: Option<DeviceState>,
    /// Require a button press on the device before exporting.
    pub confirm_on_device: bool,
    /// Whether the device is attached when the demo starts.
    pub connected: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            label: Some(DEFAULT_LABEL.into()),
            xpub: DEFAULT_XPUB.into(),
            address: DEFAULT_ADDRESS.into(),
            pin: None,
            passphrase_protection: false,
            session_state: None,
            confirm_on_device: false,
            connected: true,
        }
    }
}

impl HostConfig {
    pub fn load(path: &Path) -> Result<Self, SharedError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            SharedError::Transport(format!(
                "failed to read device config from '{}': {err}",
                path.display()
            ))
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|err| SharedError::Transport(format!("invalid device config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SharedError> {
        if let Some(pin) = &self.pin
            && (pin.is_empty() || !pin.chars().all(|ch| matches!(ch, '1'..='9')))
        {
            return Err(SharedError::Transport(
                "device PIN must be a non-empty string of keypad positions 1-9".into(),
            ));
        }
        if self.xpub.trim().is_empty() {
            return Err(SharedError::Transport("device xpub must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn missing_fields_use_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("device.json");
        fs::write(&path, json!({ "pin": "1234" }).to_string()).expect("write config");

        let config = HostConfig::load(&path).expect("load config");
        assert_eq!(config.pin.as_deref(), Some("1234"));
        assert_eq!(config.xpub, DEFAULT_XPUB);
        assert!(config.connected);
        assert!(!config.passphrase_protection);
    }

    #[test]
    fn session_state_is_read_as_hex() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("device.json");
        fs::write(&path, json!({ "session_state": "c0ffee" }).to_string()).expect("write config");

        let config = HostConfig::load(&path).expect("load config");
        assert_eq!(config.session_state, Some(DeviceState::new([0xc0, 0xff, 0xee])));

        fs::write(&path, json!({ "session_state": "not hex" }).to_string()).expect("write config");
        let err = HostConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid device config"));
    }

    #[test]
    fn rejects_pin_outside_keypad() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("device.json");
        fs::write(&path, json!({ "pin": "1230" }).to_string()).expect("write config");

        let err = HostConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("keypad positions"));
    }

    #[test]
    fn reports_unreadable_file() {
        let dir = tempdir().expect("tempdir");
        let err = HostConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read device config"));
    }

    #[test]
    fn reports_malformed_json() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("device.json");
        fs::write(&path, "{ pin: ").expect("write config");
        let err = HostConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid device config"));
    }
}
