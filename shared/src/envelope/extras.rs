use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use zeroize::Zeroize;

use crate::error::SharedError;

/// Key under which the relay receives its typed request.
pub const EXTRA_REQUEST: &str = "request";
/// Key under which the relay returns its typed result.
pub const EXTRA_RESULT: &str = "result";
/// Key under which the relay reports a device or relay failure.
pub const EXTRA_FAILURE: &str = "failure";
/// Key for the PIN digits returned by the PIN screen.
pub const EXTRA_PIN_ENCODED: &str = "pin_encoded";
/// Key for the text returned by the passphrase screen.
pub const EXTRA_PASSPHRASE: &str = "passphrase";
/// Key for the PIN context handed to the PIN screen at launch.
pub const EXTRA_PIN_MATRIX_REQUEST_TYPE: &str = "pin_matrix_request_type";
/// Key for the device session state reported while the relay ran.
pub const EXTRA_STATE: &str = "state";

/// String-keyed payload attached to a screen launch or a screen result.
///
/// Structured values are stored as JSON text. Every value is wiped when the
/// bag is dropped since PIN digits and passphrases travel through it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Extras {
    values: BTreeMap<&'static str, String>,
}

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.put_string(key, value);
        self
    }

    pub fn put_string(&mut self, key: &'static str, value: impl Into<String>) {
        if let Some(mut previous) = self.values.insert(key, value.into()) {
            previous.zeroize();
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Remove a value, handing ownership (and the duty to wipe it) to the caller.
    pub fn take_string(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn put_json<T>(&mut self, key: &'static str, value: &T) -> Result<(), SharedError>
    where
        T: Serialize,
    {
        let encoded =
            serde_json::to_string(value).map_err(|source| SharedError::Encode { key, source })?;
        self.put_string(key, encoded);
        Ok(())
    }

    pub fn get_json<T>(&self, key: &'static str) -> Result<Option<T>, SharedError>
    where
        T: DeserializeOwned,
    {
        match self.values.get(key) {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|source| SharedError::Decode { key, source }),
            None => Ok(None),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Zeroize for Extras {
    fn zeroize(&mut self) {
        for value in self.values.values_mut() {
            value.zeroize();
        }
        self.values.clear();
    }
}

impl Drop for Extras {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// Values may hold secrets, so only the keys are printed.
impl fmt::Debug for Extras {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
