use shared::envelope::{ActivityResult, DeviceRequest, DeviceResult};
use shared::schema::DeviceState;

use super::{Screen, UiEffect};
use crate::error::{self, IntentError};
use crate::ui::input::UiCommand;
use crate::ui::render::{ExportView, NoticeView, ViewContent};

/// Account path whose extended public key the export screen requests.
pub const EXPORT_XPUB_PATH: [u32; 3] = [44, 0, 0];

/// Modal notice shown once the relay answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportNotice {
    PublicKey(String),
    Failure(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    AwaitingRelay,
    Notice(ExportNotice),
}

/// Screen with a single export button displaying the returned xpub.
#[derive(Debug)]
pub struct ExportScreen {
    state: ExportState,
    session: Option<DeviceState>,
}

impl Default for ExportScreen {
    fn default() -> Self {
        Self::open()
    }
}

impl ExportScreen {
    pub fn open() -> Self {
        Self::for_session(None)
    }

    /// Export screen whose requests are pinned to a device session.
    pub fn for_session(session: Option<DeviceState>) -> Self {
        Self {
            state: ExportState::Idle,
            session,
        }
    }

    pub fn state(&self) -> &ExportState {
        &self.state
    }

    /// The request issued by one press of the export button.
    pub fn request(&self) -> DeviceRequest {
        DeviceRequest::get_public_key(EXPORT_XPUB_PATH).with_state(self.session.clone())
    }

    /// Resume after the relay finished.
    ///
    /// A plain cancellation returns to the idle state silently; relay
    /// failures and unexpected payloads are shown as an error notice.
    pub fn on_relay_result(&mut self, result: &ActivityResult) -> UiEffect {
        if self.state != ExportState::AwaitingRelay {
            log::warn!("export screen received a relay result it did not ask for");
            return UiEffect::None;
        }

        self.state = match error::device_result(result) {
            Ok(DeviceResult::GetPublicKey(key)) => {
                log::info!("public key exported for {}", key.path);
                ExportState::Notice(ExportNotice::PublicKey(key.xpub))
            }
            Ok(other) => {
                let err = IntentError::UnexpectedResult {
                    expected: "GetPublicKey",
                    actual: other.name(),
                };
                log::warn!("export failed: {err}");
                ExportState::Notice(ExportNotice::Failure(err.to_string()))
            }
            Err(IntentError::UserCancelled) => {
                log::debug!("export cancelled");
                ExportState::Idle
            }
            Err(err) => {
                log::warn!("export failed: {err}");
                ExportState::Notice(ExportNotice::Failure(err.to_string()))
            }
        };
        UiEffect::None
    }

    fn to_view(&self) -> ExportView {
        let notice = match &self.state {
            ExportState::Notice(ExportNotice::PublicKey(xpub)) => Some(NoticeView {
                message: xpub.clone(),
                is_error: false,
            }),
            ExportState::Notice(ExportNotice::Failure(message)) => Some(NoticeView {
                message: message.clone(),
                is_error: true,
            }),
            _ => None,
        };
        ExportView {
            export_enabled: self.state == ExportState::Idle,
            busy: self.state == ExportState::AwaitingRelay,
            notice,
        }
    }
}

impl Screen for ExportScreen {
    fn apply_command(&mut self, command: UiCommand) -> UiEffect {
        match (&self.state, command) {
            (ExportState::Idle, UiCommand::Confirm) => {
                self.state = ExportState::AwaitingRelay;
                UiEffect::LaunchRelay(self.request())
            }
            (ExportState::Notice(_), UiCommand::Confirm | UiCommand::Cancel) => {
                self.state = ExportState::Idle;
                UiEffect::None
            }
            _ => UiEffect::None,
        }
    }

    fn render(&self) -> ViewContent {
        ViewContent::Export(self.to_view())
    }

    // The export screen lives for the whole session.
    fn is_finished(&self) -> bool {
        false
    }
}
