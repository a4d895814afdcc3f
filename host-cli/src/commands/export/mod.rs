use std::io::{BufRead, Write};

use intents::ui::{ExportNotice, ExportScreen, ExportState, Screen, UiCommand, UiEffect, ViewContent};
use shared::error::SharedError;
use shared::schema::DeviceState;

use crate::commands::DeviceTransport;
use crate::commands::relay::drive_relay;
use crate::terminal::Terminal;

/// Press the export button once and show what came back.
///
/// A relay failure is shown as an error notice and also fails the command; a
/// plain cancellation leaves the screen idle and succeeds.
pub fn run<T, R, W>(
    transport: &mut T,
    terminal: &mut Terminal<R, W>,
    session: Option<DeviceState>,
) -> Result<(), SharedError>
where
    T: DeviceTransport + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut screen = ExportScreen::for_session(session);
    show(&screen, terminal)?;

    let request = match screen.apply_command(UiCommand::Confirm) {
        UiEffect::LaunchRelay(request) => request,
        other => {
            return Err(SharedError::Interaction(format!(
                "export button produced {other:?}"
            )));
        }
    };
    show(&screen, terminal)?;

    let result = drive_relay(request, transport, terminal)?;
    screen.on_relay_result(&result);

    match screen.state() {
        ExportState::Idle => terminal.print_line("Export cancelled."),
        ExportState::Notice(ExportNotice::Failure(message)) => {
            let message = message.clone();
            show(&screen, terminal)?;
            Err(SharedError::Interaction(message))
        }
        _ => show(&screen, terminal),
    }
}

fn show<R: BufRead, W: Write>(
    screen: &ExportScreen,
    terminal: &mut Terminal<R, W>,
) -> Result<(), SharedError> {
    match screen.render() {
        ViewContent::Export(view) => terminal.show_export(&view),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{printed, terminal};
    use crate::transport::memory::MemoryDeviceTransport;
    use shared::schema::{
        DeviceMessage, Failure, FailureCode, PinMatrixRequestType, PublicKey,
    };

    const XPUB: &str = "xpub6CUGRUonZSQ4TWtTMmzXdrXDtypWKiKrhko4egpiMZbpiaQL2jkwSB1icqYh2cfDfVxdx4df189oLKnC5fSwqPfgyP3hooxujYzAu3fDVmz";

    #[test]
    fn prints_exported_xpub() {
        let mut device = MemoryDeviceTransport::new();
        device.queue_reply(DeviceMessage::PinMatrixRequest(PinMatrixRequestType::Current));
        device.queue_reply(DeviceMessage::PublicKey(PublicKey {
            xpub: XPUB.into(),
            path: [44, 0, 0].into(),
        }));
        let mut terminal = terminal("159\n");

        run(&mut device, &mut terminal, None).expect("export succeeds");

        let output = printed(&terminal);
        assert!(output.contains("Ready to export"));
        assert!(output.contains(&format!("Public key: {XPUB}")));
    }

    #[test]
    fn cancellation_is_not_an_error() {
        let mut device = MemoryDeviceTransport::new();
        device.queue_reply(DeviceMessage::PassphraseRequest);
        device.queue_reply(DeviceMessage::Failure(Failure::new(
            FailureCode::ActionCancelled,
            "",
        )));
        let mut terminal = terminal("");

        run(&mut device, &mut terminal, None).expect("cancel is not an error");
        assert!(printed(&terminal).contains("Export cancelled."));
    }

    #[test]
    fn device_failure_is_reported() {
        let mut device = MemoryDeviceTransport::new();
        device.queue_reply(DeviceMessage::Failure(Failure::new(
            FailureCode::NotInitialized,
            "Device not initialized",
        )));
        let mut terminal = terminal("");

        let err = run(&mut device, &mut terminal, None).unwrap_err();
        assert!(err.to_string().contains("Device not initialized"));
        assert!(printed(&terminal).contains("Error: "));
    }
}
