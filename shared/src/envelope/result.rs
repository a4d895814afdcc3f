use serde::{Deserialize, Serialize};

use crate::schema::{Address, Features, PublicKey};

/// Typed result returned by the device interaction relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceResult {
    Initialize(Features),
    GetPublicKey(PublicKey),
    GetAddress(Address),
}

impl DeviceResult {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceResult::Initialize(_) => "Initialize",
            DeviceResult::GetPublicKey(_) => "GetPublicKey",
            DeviceResult::GetAddress(_) => "GetAddress",
        }
    }

    /// Extended public key carried by a `GetPublicKey` result.
    pub fn xpub(&self) -> Option<&str> {
        match self {
            DeviceResult::GetPublicKey(key) => Some(&key.xpub),
            _ => None,
        }
    }
}
