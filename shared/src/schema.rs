use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::SharedError;
use crate::path::DerivationPath;

/// Reason the device is asking for a PIN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinMatrixRequestType {
    /// Unlock with the PIN already set on the device.
    Current,
    /// First entry of a new PIN.
    NewFirst,
    /// Second entry of a new PIN, used to confirm the first one.
    NewSecond,
}

/// Why the device waits for a physical button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonRequestType {
    Other,
    ConfirmOutput,
    Address,
    PublicKey,
}

/// Error categories reported by the device in a `Failure` message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCode {
    UnexpectedMessage,
    ButtonExpected,
    DataError,
    ActionCancelled,
    PinExpected,
    PinCancelled,
    PinInvalid,
    InvalidSignature,
    ProcessError,
    NotInitialized,
    FirmwareError,
}

impl FailureCode {
    pub fn label(self) -> &'static str {
        match self {
            FailureCode::UnexpectedMessage => "unexpected message",
            FailureCode::ButtonExpected => "button expected",
            FailureCode::DataError => "data error",
            FailureCode::ActionCancelled => "action cancelled",
            FailureCode::PinExpected => "PIN expected",
            FailureCode::PinCancelled => "PIN cancelled",
            FailureCode::PinInvalid => "PIN invalid",
            FailureCode::InvalidSignature => "invalid signature",
            FailureCode::ProcessError => "process error",
            FailureCode::NotInitialized => "device not initialized",
            FailureCode::FirmwareError => "firmware error",
        }
    }
}

/// Failure reported by the device or synthesised by the relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub code: FailureCode,
    pub message: String,
}

impl Failure {
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(self.code.label())
        } else {
            write!(f, "{}: {}", self.code.label(), self.message)
        }
    }
}

/// Fingerprint of the device session, derived by the device from the
/// passphrase in use. Written as lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceState(Vec<u8>);

impl DeviceState {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl FromStr for DeviceState {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SharedError::InvalidState {
                value: trimmed.to_owned(),
                reason: "empty".into(),
            });
        }
        hex::decode(trimmed)
            .map(Self)
            .map_err(|err| SharedError::InvalidState {
                value: trimmed.to_owned(),
                reason: err.to_string(),
            })
    }
}

impl TryFrom<String> for DeviceState {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceState> for String {
    fn from(value: DeviceState) -> Self {
        value.to_string()
    }
}

/// Device description returned for `Initialize`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub vendor: String,
    pub label: Option<String>,
    pub major_version: u32,
    pub minor_version: u32,
    pub patch_version: u32,
    pub initialized: bool,
    pub pin_protection: bool,
    pub passphrase_protection: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPublicKey {
    pub address_n: DerivationPath,
    pub coin_name: Option<String>,
    pub show_display: bool,
}

impl GetPublicKey {
    pub fn new(address_n: DerivationPath) -> Self {
        Self {
            address_n,
            coin_name: None,
            show_display: false,
        }
    }
}

/// Extended public key exported by the device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub xpub: String,
    pub path: DerivationPath,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAddress {
    pub address_n: DerivationPath,
    pub coin_name: Option<String>,
    pub show_display: bool,
}

impl GetAddress {
    pub fn new(address_n: DerivationPath) -> Self {
        Self {
            address_n,
            coin_name: None,
            show_display: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
}

/// Messages exchanged between the relay and the device.
///
/// The set is closed: every message kind the relay understands has its own
/// variant so callers match exhaustively instead of downcasting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceMessage {
    Initialize,
    Features(Features),
    GetPublicKey(GetPublicKey),
    PublicKey(PublicKey),
    GetAddress(GetAddress),
    Address(Address),
    PinMatrixRequest(PinMatrixRequestType),
    PinMatrixAck { pin: String },
    PassphraseRequest,
    PassphraseAck { passphrase: String },
    /// Session fingerprint reported once the passphrase was accepted.
    PassphraseStateRequest { state: DeviceState },
    PassphraseStateAck,
    ButtonRequest(ButtonRequestType),
    ButtonAck,
    Cancel,
    /// Forget the cached PIN and passphrase.
    ClearSession,
    Success,
    Failure(Failure),
}

impl DeviceMessage {
    /// Short message name, safe to log because it never includes payload data.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceMessage::Initialize => "Initialize",
            DeviceMessage::Features(_) => "Features",
            DeviceMessage::GetPublicKey(_) => "GetPublicKey",
            DeviceMessage::PublicKey(_) => "PublicKey",
            DeviceMessage::GetAddress(_) => "GetAddress",
            DeviceMessage::Address(_) => "Address",
            DeviceMessage::PinMatrixRequest(_) => "PinMatrixRequest",
            DeviceMessage::PinMatrixAck { .. } => "PinMatrixAck",
            DeviceMessage::PassphraseRequest => "PassphraseRequest",
            DeviceMessage::PassphraseAck { .. } => "PassphraseAck",
            DeviceMessage::PassphraseStateRequest { .. } => "PassphraseStateRequest",
            DeviceMessage::PassphraseStateAck => "PassphraseStateAck",
            DeviceMessage::ButtonRequest(_) => "ButtonRequest",
            DeviceMessage::ButtonAck => "ButtonAck",
            DeviceMessage::Cancel => "Cancel",
            DeviceMessage::ClearSession => "ClearSession",
            DeviceMessage::Success => "Success",
            DeviceMessage::Failure(_) => "Failure",
        }
    }

    /// Wipe secret payloads carried by acknowledgement messages.
    pub fn zeroize_secrets(&mut self) {
        match self {
            DeviceMessage::PinMatrixAck { pin } => pin.zeroize(),
            DeviceMessage::PassphraseAck { passphrase } => passphrase.zeroize(),
            _ => {}
        }
    }
}
