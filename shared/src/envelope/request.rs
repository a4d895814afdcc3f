use serde::{Deserialize, Serialize};

use crate::path::DerivationPath;
use crate::schema::{DeviceMessage, DeviceState, GetAddress, GetPublicKey};

use super::result::DeviceResult;

/// Operation a request asks the device to perform.
///
/// One variant per supported operation; the relay derives the device message
/// and the expected result kind from the variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceOperation {
    Initialize,
    GetPublicKey(GetPublicKey),
    GetAddress(GetAddress),
    /// Ask the device for an address and have the user compare it with `address`.
    CheckAddress {
        message: GetAddress,
        address: String,
    },
}

/// Typed request handed to the device interaction relay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRequest {
    pub operation: DeviceOperation,
    /// Session the caller expects the device to be in. When the device
    /// reports a different one the relay clears the session and fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<DeviceState>,
}

impl From<DeviceOperation> for DeviceRequest {
    fn from(operation: DeviceOperation) -> Self {
        Self {
            operation,
            state: None,
        }
    }
}

impl DeviceRequest {
    pub fn initialize() -> Self {
        DeviceOperation::Initialize.into()
    }

    pub fn get_public_key(path: impl Into<DerivationPath>) -> Self {
        DeviceOperation::GetPublicKey(GetPublicKey::new(path.into())).into()
    }

    pub fn get_address(path: impl Into<DerivationPath>) -> Self {
        DeviceOperation::GetAddress(GetAddress::new(path.into())).into()
    }

    pub fn check_address(path: impl Into<DerivationPath>, address: impl Into<String>) -> Self {
        let mut message = GetAddress::new(path.into());
        message.show_display = true;
        DeviceOperation::CheckAddress {
            message,
            address: address.into(),
        }
        .into()
    }

    /// Pin the request to a known device session.
    pub fn with_state(mut self, state: Option<DeviceState>) -> Self {
        self.state = state;
        self
    }

    pub fn name(&self) -> &'static str {
        match self.operation {
            DeviceOperation::Initialize => "Initialize",
            DeviceOperation::GetPublicKey(_) => "GetPublicKey",
            DeviceOperation::GetAddress(_) => "GetAddress",
            DeviceOperation::CheckAddress { .. } => "CheckAddress",
        }
    }

    /// Message sent to the device to start this operation.
    pub fn message(&self) -> DeviceMessage {
        match &self.operation {
            DeviceOperation::Initialize => DeviceMessage::Initialize,
            DeviceOperation::GetPublicKey(message) => DeviceMessage::GetPublicKey(message.clone()),
            DeviceOperation::GetAddress(message) | DeviceOperation::CheckAddress { message, .. } => {
                DeviceMessage::GetAddress(message.clone())
            }
        }
    }

    /// Address the user is expected to confirm, when the request carries one.
    pub fn expected_address(&self) -> Option<&str> {
        match &self.operation {
            DeviceOperation::CheckAddress { address, .. } => Some(address),
            _ => None,
        }
    }

    /// Convert a device reply into the result this request waits for.
    ///
    /// Returns `None` when the reply is not the terminal message of this
    /// operation.
    pub fn result_from(&self, message: &DeviceMessage) -> Option<DeviceResult> {
        match (&self.operation, message) {
            (DeviceOperation::Initialize, DeviceMessage::Features(features)) => {
                Some(DeviceResult::Initialize(features.clone()))
            }
            (DeviceOperation::GetPublicKey(_), DeviceMessage::PublicKey(key)) => {
                Some(DeviceResult::GetPublicKey(key.clone()))
            }
            (
                DeviceOperation::GetAddress(_) | DeviceOperation::CheckAddress { .. },
                DeviceMessage::Address(address),
            ) => Some(DeviceResult::GetAddress(address.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Address, Features, PublicKey};

    #[test]
    fn public_key_request_targets_given_path() {
        let request = DeviceRequest::get_public_key([44, 0, 0]);
        match request.message() {
            DeviceMessage::GetPublicKey(message) => {
                assert_eq!(message.address_n.indices(), &[44, 0, 0]);
                assert!(!message.show_display);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn check_address_shows_on_device() {
        let request = DeviceRequest::check_address([44, 0, 0, 0, 0], "1BoatSLRHtKNngkdXEeobR76b53LETtpyT");
        assert_eq!(
            request.expected_address(),
            Some("1BoatSLRHtKNngkdXEeobR76b53LETtpyT")
        );
        match request.message() {
            DeviceMessage::GetAddress(message) => assert!(message.show_display),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn only_matching_reply_resolves_request() {
        let request = DeviceRequest::get_public_key([44, 0, 0]);
        let key = PublicKey {
            xpub: String::from("xpub-test"),
            path: DerivationPath::from([44, 0, 0]),
        };
        assert_eq!(
            request.result_from(&DeviceMessage::PublicKey(key.clone())),
            Some(DeviceResult::GetPublicKey(key))
        );
        assert_eq!(
            request.result_from(&DeviceMessage::Address(Address {
                address: String::from("addr"),
            })),
            None
        );
        assert_eq!(
            DeviceRequest::initialize().result_from(&DeviceMessage::Features(Features::default())),
            Some(DeviceResult::Initialize(Features::default()))
        );
    }

    #[test]
    fn state_travels_with_the_request() {
        let state = DeviceState::new([0xde, 0xad]);
        let request = DeviceRequest::get_public_key([44, 0, 0]).with_state(Some(state.clone()));
        assert_eq!(request.state.as_ref(), Some(&state));

        let encoded = serde_json::to_string(&request).expect("encode");
        assert!(encoded.contains("\"dead\""));
        let decoded: DeviceRequest = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, request);
    }

    #[test]
    fn stateless_request_omits_the_field() {
        let encoded = serde_json::to_string(&DeviceRequest::initialize()).expect("encode");
        assert!(!encoded.contains("state"));
    }
}
