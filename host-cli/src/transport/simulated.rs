use shared::error::SharedError;
use shared::schema::{
    Address, ButtonRequestType, DeviceMessage, Failure, FailureCode, Features,
    PinMatrixRequestType, PublicKey,
};
use zeroize::Zeroize;

use super::DeviceTransport;
use crate::commands::host_config::HostConfig;
use crate::constants::{DEVICE_VENDOR, DEVICE_VERSION};

/// What the simulated device waits for before it answers the pending request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Awaiting {
    Nothing,
    Pin,
    Passphrase,
    PassphraseState,
    Button,
}

/// Wallet stand-in answering from a [`HostConfig`].
///
/// It walks through the same PIN, passphrase and button prompts a real device
/// would, but derives nothing: the exported key and address come straight
/// from the configuration.
pub struct SimulatedDevice {
    config: HostConfig,
    connected: bool,
    unlocked: bool,
    passphrase_cached: bool,
    state_acknowledged: bool,
    button_confirmed: bool,
    awaiting: Awaiting,
    pending: Option<DeviceMessage>,
}

impl SimulatedDevice {
    pub fn new(config: HostConfig) -> Self {
        let connected = config.connected;
        Self {
            config,
            connected,
            unlocked: false,
            passphrase_cached: false,
            state_acknowledged: false,
            button_confirmed: false,
            awaiting: Awaiting::Nothing,
            pending: None,
        }
    }

    fn features(&self) -> Features {
        let (major_version, minor_version, patch_version) = DEVICE_VERSION;
        Features {
            vendor: DEVICE_VENDOR.into(),
            label: self.config.label.clone(),
            major_version,
            minor_version,
            patch_version,
            initialized: true,
            pin_protection: self.config.pin.is_some(),
            passphrase_protection: self.config.passphrase_protection,
        }
    }

    fn start(&mut self, message: DeviceMessage) -> DeviceMessage {
        self.button_confirmed = false;
        self.pending = Some(message);
        self.advance()
    }

    /// Ask for the next missing authorisation or answer the pending request.
    fn advance(&mut self) -> DeviceMessage {
        if self.config.pin.is_some() && !self.unlocked {
            self.awaiting = Awaiting::Pin;
            return DeviceMessage::PinMatrixRequest(PinMatrixRequestType::Current);
        }
        if self.config.passphrase_protection && !self.passphrase_cached {
            self.awaiting = Awaiting::Passphrase;
            return DeviceMessage::PassphraseRequest;
        }
        if self.passphrase_cached
            && !self.state_acknowledged
            && let Some(state) = &self.config.session_state
        {
            self.awaiting = Awaiting::PassphraseState;
            return DeviceMessage::PassphraseStateRequest {
                state: state.clone(),
            };
        }
        if self.config.confirm_on_device && !self.button_confirmed {
            self.awaiting = Awaiting::Button;
            let kind = match self.pending {
                Some(DeviceMessage::GetAddress(_)) => ButtonRequestType::Address,
                _ => ButtonRequestType::PublicKey,
            };
            return DeviceMessage::ButtonRequest(kind);
        }

        self.awaiting = Awaiting::Nothing;
        match self.pending.take() {
            Some(DeviceMessage::GetPublicKey(request)) => DeviceMessage::PublicKey(PublicKey {
                xpub: self.config.xpub.clone(),
                path: request.address_n,
            }),
            Some(DeviceMessage::GetAddress(_)) => DeviceMessage::Address(Address {
                address: self.config.address.clone(),
            }),
            _ => unexpected("nothing to answer"),
        }
    }

    fn check_prompt(&self, awaiting: Awaiting) -> Result<(), DeviceMessage> {
        if self.awaiting == awaiting {
            Ok(())
        } else {
            Err(unexpected("acknowledgement without a prompt"))
        }
    }

    fn check_pin(&mut self, mut pin: String) -> DeviceMessage {
        let accepted = self.config.pin.as_deref() == Some(pin.as_str());
        pin.zeroize();
        if accepted {
            self.unlocked = true;
            self.advance()
        } else {
            log::debug!("simulated device rejected the PIN");
            self.reset_conversation();
            DeviceMessage::Failure(Failure::new(FailureCode::PinInvalid, "PIN invalid"))
        }
    }

    fn clear_session(&mut self) {
        self.unlocked = false;
        self.passphrase_cached = false;
        self.state_acknowledged = false;
        self.reset_conversation();
    }

    fn reset_conversation(&mut self) {
        self.awaiting = Awaiting::Nothing;
        self.pending = None;
    }
}

fn unexpected(message: &str) -> DeviceMessage {
    DeviceMessage::Failure(Failure::new(FailureCode::UnexpectedMessage, message))
}

impl DeviceTransport for SimulatedDevice {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), SharedError> {
        self.connected = true;
        Ok(())
    }

    fn call(&mut self, message: &DeviceMessage) -> Result<DeviceMessage, SharedError> {
        if !self.connected {
            return Err(SharedError::Transport("device is not connected".into()));
        }
        log::debug!("simulated device received {}", message.name());

        let reply = match message.clone() {
            DeviceMessage::Initialize => {
                self.reset_conversation();
                DeviceMessage::Features(self.features())
            }
            request @ (DeviceMessage::GetPublicKey(_) | DeviceMessage::GetAddress(_)) => {
                self.start(request)
            }
            DeviceMessage::PinMatrixAck { mut pin } => match self.check_prompt(Awaiting::Pin) {
                Ok(()) => self.check_pin(pin),
                Err(reply) => {
                    pin.zeroize();
                    reply
                }
            },
            DeviceMessage::PassphraseAck { mut passphrase } => {
                passphrase.zeroize();
                match self.check_prompt(Awaiting::Passphrase) {
                    Ok(()) => {
                        self.passphrase_cached = true;
                        self.advance()
                    }
                    Err(reply) => reply,
                }
            }
            DeviceMessage::PassphraseStateAck => {
                match self.check_prompt(Awaiting::PassphraseState) {
                    Ok(()) => {
                        self.state_acknowledged = true;
                        self.advance()
                    }
                    Err(reply) => reply,
                }
            }
            DeviceMessage::ClearSession => {
                log::debug!("simulated device cleared its session");
                self.clear_session();
                DeviceMessage::Success
            }
            DeviceMessage::ButtonAck => match self.check_prompt(Awaiting::Button) {
                Ok(()) => {
                    self.button_confirmed = true;
                    self.advance()
                }
                Err(reply) => reply,
            },
            DeviceMessage::Cancel => {
                self.reset_conversation();
                DeviceMessage::Failure(Failure::new(FailureCode::ActionCancelled, ""))
            }
            other => unexpected(other.name()),
        };
        Ok(reply)
    }
}
