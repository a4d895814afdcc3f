//! Device interaction relay.
//!
//! The relay receives one typed [`DeviceRequest`], walks the device through
//! the conversation (PIN, passphrase and button prompts included) and finishes
//! with an [`ActivityResult`]. It never touches the transport itself: every
//! entry point returns [`RelayEffect`]s that the host executes, feeding the
//! device replies and screen results back in.

use shared::envelope::{self, ActivityResult, DeviceRequest, DeviceResult, Extras};
use shared::schema::{DeviceMessage, DeviceState, Failure, FailureCode, PinMatrixRequestType};

use crate::error::{self, IntentError};

/// Conversation state of the relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayState {
    /// Waiting for the device to be plugged in and permitted.
    Disconnected,
    /// Request sent, waiting for the device to answer.
    Connected,
    PinMatrixRequest,
    PassphraseRequest,
    ButtonRequest,
    /// Result delivered; further events are ignored.
    Finished,
}

/// Action the host must perform on behalf of the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayEffect {
    ShowConnectDialog,
    ShowLoadingDialog,
    /// Ask the user to confirm on the device, optionally showing the address
    /// they are expected to compare.
    ShowButtonDialog {
        address: Option<String>,
    },
    Send(DeviceMessage),
    LaunchPinEntry(PinMatrixRequestType),
    LaunchPassphraseEntry,
    Finish(ActivityResult),
}

pub struct DeviceRelay {
    request: DeviceRequest,
    state: RelayState,
    session: Option<DeviceState>,
}

impl DeviceRelay {
    /// Start handling `request`. When the device is already connected the
    /// request goes out immediately.
    pub fn open(request: DeviceRequest, device_connected: bool) -> (Self, Vec<RelayEffect>) {
        log::debug!("relay opened for {}", request.name());
        let mut relay = Self {
            request,
            state: RelayState::Disconnected,
            session: None,
        };
        let effects = if device_connected {
            relay.connect()
        } else {
            vec![RelayEffect::ShowConnectDialog]
        };
        (relay, effects)
    }

    /// Start from a launch payload built by [`envelope::request_extras`].
    pub fn from_extras(
        extras: &Extras,
        device_connected: bool,
    ) -> Result<(Self, Vec<RelayEffect>), IntentError> {
        let request = envelope::request_from(extras)?
            .ok_or(IntentError::MissingExtra(envelope::extras::EXTRA_REQUEST))?;
        Ok(Self::open(request, device_connected))
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn request(&self) -> &DeviceRequest {
        &self.request
    }

    /// Session state the device reported after the passphrase, if any.
    pub fn session(&self) -> Option<&DeviceState> {
        self.session.as_ref()
    }

    pub fn on_connection_changed(&mut self, connected: bool) -> Vec<RelayEffect> {
        match (self.state, connected) {
            (RelayState::Finished, _) => Vec::new(),
            (RelayState::Disconnected, true) => self.connect(),
            // Still detached after a connect attempt: ask again.
            (RelayState::Disconnected, false) => vec![RelayEffect::ShowConnectDialog],
            (_, true) => Vec::new(),
            (_, false) => {
                log::info!("device disconnected during {}", self.request.name());
                self.state = RelayState::Disconnected;
                vec![RelayEffect::ShowConnectDialog]
            }
        }
    }

    /// The user dismissed the connect dialog.
    pub fn on_dialog_cancelled(&mut self) -> Vec<RelayEffect> {
        if self.state != RelayState::Disconnected {
            return Vec::new();
        }
        log::debug!("connect dialog cancelled");
        self.state = RelayState::Finished;
        vec![RelayEffect::Finish(ActivityResult::cancelled())]
    }

    pub fn on_device_message(&mut self, message: DeviceMessage) -> Vec<RelayEffect> {
        if matches!(self.state, RelayState::Finished | RelayState::Disconnected) {
            log::warn!("dropping {} received while {:?}", message.name(), self.state);
            return Vec::new();
        }
        log::debug!("device replied {}", message.name());

        match message {
            DeviceMessage::PinMatrixRequest(kind) => {
                self.state = RelayState::PinMatrixRequest;
                vec![RelayEffect::LaunchPinEntry(kind)]
            }
            DeviceMessage::PassphraseRequest => {
                self.state = RelayState::PassphraseRequest;
                vec![RelayEffect::LaunchPassphraseEntry]
            }
            DeviceMessage::PassphraseStateRequest { state } => self.verify_session(state),
            DeviceMessage::ButtonRequest(_) => {
                self.state = RelayState::ButtonRequest;
                vec![
                    RelayEffect::ShowButtonDialog {
                        address: self.request.expected_address().map(str::to_owned),
                    },
                    RelayEffect::Send(DeviceMessage::ButtonAck),
                ]
            }
            DeviceMessage::Failure(failure) => {
                log::warn!("device reported failure: {failure}");
                self.finish_failure(failure)
            }
            other => match self.request.result_from(&other) {
                Some(result) => self.finish_result(result),
                None => {
                    let failure = Failure::new(
                        FailureCode::UnexpectedMessage,
                        format!(
                            "{} does not answer {}",
                            other.name(),
                            self.request.name()
                        ),
                    );
                    log::warn!("unexpected device reply: {failure}");
                    self.finish_failure(failure)
                }
            },
        }
    }

    /// Resume after the PIN screen closed.
    pub fn on_pin_result(&mut self, result: ActivityResult) -> Vec<RelayEffect> {
        if self.state != RelayState::PinMatrixRequest {
            log::warn!("ignoring PIN result while {:?}", self.state);
            return Vec::new();
        }
        match error::pin_result(result) {
            Ok(pin) => self.acknowledge(DeviceMessage::PinMatrixAck { pin }),
            Err(err) => {
                log::debug!("PIN entry ended without a PIN: {err}");
                self.cancel_on_device()
            }
        }
    }

    /// Resume after the passphrase screen closed.
    pub fn on_passphrase_result(&mut self, result: ActivityResult) -> Vec<RelayEffect> {
        if self.state != RelayState::PassphraseRequest {
            log::warn!("ignoring passphrase result while {:?}", self.state);
            return Vec::new();
        }
        match error::passphrase_result(result) {
            Ok(passphrase) => self.acknowledge(DeviceMessage::PassphraseAck { passphrase }),
            Err(err) => {
                log::debug!("passphrase entry ended without a passphrase: {err}");
                self.cancel_on_device()
            }
        }
    }

    fn connect(&mut self) -> Vec<RelayEffect> {
        self.state = RelayState::Connected;
        vec![
            RelayEffect::ShowLoadingDialog,
            RelayEffect::Send(self.request.message()),
        ]
    }

    fn acknowledge(&mut self, ack: DeviceMessage) -> Vec<RelayEffect> {
        self.state = RelayState::Connected;
        vec![RelayEffect::ShowLoadingDialog, RelayEffect::Send(ack)]
    }

    fn verify_session(&mut self, reported: DeviceState) -> Vec<RelayEffect> {
        let mismatch = self
            .request
            .state
            .as_ref()
            .is_some_and(|expected| *expected != reported);
        log::debug!("device reported session {reported}");
        self.session = Some(reported);

        if !mismatch {
            self.state = RelayState::Connected;
            return vec![RelayEffect::Send(DeviceMessage::PassphraseStateAck)];
        }

        log::warn!("device session differs from the requested one, clearing it");
        let failure = Failure::new(
            FailureCode::DataError,
            "device session does not match the requested state",
        );
        let mut effects = vec![RelayEffect::Send(DeviceMessage::ClearSession)];
        effects.extend(self.finish_failure(failure));
        effects
    }

    fn cancel_on_device(&mut self) -> Vec<RelayEffect> {
        self.state = RelayState::Finished;
        vec![
            RelayEffect::Send(DeviceMessage::Cancel),
            RelayEffect::Finish(ActivityResult::cancelled()),
        ]
    }

    fn finish_result(&mut self, result: DeviceResult) -> Vec<RelayEffect> {
        if let (Some(expected), DeviceResult::GetAddress(address)) =
            (self.request.expected_address(), &result)
            && expected != address.address
        {
            let failure = Failure::new(
                FailureCode::DataError,
                format!(
                    "device shows {} but {expected} was expected",
                    address.address
                ),
            );
            return self.finish_failure(failure);
        }

        self.state = RelayState::Finished;
        log::info!("{} completed", self.request.name());
        match ActivityResult::with_result(&result) {
            Ok(activity) => {
                let activity = match &self.session {
                    Some(session) => activity.with_state(session),
                    None => activity,
                };
                vec![RelayEffect::Finish(activity)]
            }
            Err(err) => {
                log::error!("failed to encode {} result: {err}", result.name());
                vec![RelayEffect::Finish(ActivityResult::cancelled())]
            }
        }
    }

    fn finish_failure(&mut self, failure: Failure) -> Vec<RelayEffect> {
        self.state = RelayState::Finished;
        match ActivityResult::with_failure(&failure) {
            Ok(activity) => vec![RelayEffect::Finish(activity)],
            Err(err) => {
                log::error!("failed to encode failure: {err}");
                vec![RelayEffect::Finish(ActivityResult::cancelled())]
            }
        }
    }
}
